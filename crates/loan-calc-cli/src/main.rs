mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::eligibility::EligibilityArgs;
use commands::emi::{EmiArgs, MoratoriumArgs, ScheduleArgs};
use commands::insurance::TermPremiumArgs;

/// Loan and insurance calculators
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan and insurance calculators",
    long_about = "A CLI for the loan calculators behind the website: reducing-balance EMI, \
                  EMI after a moratorium, amortization schedules, indicative term insurance \
                  premiums and FOIR-based home-loan eligibility. All amounts use decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the EMI, total payable and total interest of a loan
    Emi(EmiArgs),
    /// Calculate the EMI after a moratorium with capitalised interest
    Moratorium(MoratoriumArgs),
    /// Build a month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Estimate an indicative term insurance premium
    TermPremium(TermPremiumArgs),
    /// Calculate home-loan eligibility from income and obligations
    Eligibility(EligibilityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Moratorium(args) => commands::emi::run_moratorium(args),
        Commands::Schedule(args) => commands::emi::run_schedule(args),
        Commands::TermPremium(args) => commands::insurance::run_term_premium(args),
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

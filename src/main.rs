use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use mortgage::calendar::RemainingDays;
use mortgage::mortgage::Comparison;
use mortgage::profile::{Profile, Prompter};
use mortgage::report::Report;
use simple_logger::SimpleLogger;
use std::io;

/// Project a repayment mortgage with annual overpayments
#[derive(Parser)]
#[command(name = "mortgage", version)]
struct Cli {
    /// Use a predefined profile or enter the terms by hand
    #[arg(short, long, value_enum, default_value_t = Profile::UserInput)]
    profile: Profile,

    /// Count a start date on the 1st as a whole month of interest
    #[arg(long)]
    full_month_stub: bool,

    /// Also print every month of the selected projection
    #[arg(long)]
    schedule: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level.into())
        .init()
        .context("failed to start logging")?;

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let mut terms = cli
        .profile
        .collect(&mut prompter)
        .context("could not collect mortgage terms")?;
    if cli.full_month_stub {
        terms = terms.with_remaining_days(RemainingDays::FullMonth);
    }

    let comparison = Comparison::project(&terms).context("projection failed")?;
    print!("{}", Report::new(&comparison)?);

    if cli.schedule {
        println!("Monthly schedule:");
        for statement in comparison.selected.statements()? {
            println!("{}", statement);
        }
    }
    Ok(())
}

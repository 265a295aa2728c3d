pub mod commands;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "ndawonga",
    about = "Ndawonga site backend operator CLI",
    long_about = "Apply migrations, load demo content, inspect configuration, and run the quote estimator.",
    after_help = "Examples:\n  ndawonga migrate\n  ndawonga config\n  ndawonga estimate --type \"Road Construction\" --area 100 --complexity high"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load and verify demo projects, tenders, team members and documents")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Estimate a project cost with the configured pricing table")]
    Estimate {
        #[arg(long = "type", default_value = "", help = "Project category, e.g. \"Road Construction\"")]
        project_type: String,
        #[arg(long, allow_negative_numbers = true, help = "Area in square metres")]
        area: Decimal,
        #[arg(long, default_value = "medium", help = "Complexity level: low, medium or high")]
        complexity: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Estimate { project_type, area, complexity } => {
            commands::estimate::run(&project_type, area, &complexity)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

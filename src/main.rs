// Veil - Structured Data Anonymization Tool
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use veil::cli::{Cli, Commands};

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Exit codes: 0 success, 1 parse/config/masking failure, 2 invalid
    // arguments (clap exits with 2 on its own for malformed command lines)
    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let log_level = cli.log_level.as_deref().unwrap_or("warn");
    match &cli.command {
        Commands::Anonymize(args) => args.execute(log_level),
        Commands::ValidateConfig(args) => args.execute(log_level),
        Commands::Init(args) => args.execute(log_level),
    }
}

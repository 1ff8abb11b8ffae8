//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Veil - Structured Data Anonymization Tool
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a JSON, CSV, or XML document
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Validate a rule configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Write a sample configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_anonymize() {
        let cli = Cli::parse_from([
            "veil",
            "anonymize",
            "in.json",
            "out.json",
            "--config",
            "veil.toml",
        ]);
        assert!(matches!(cli.command, Commands::Anonymize(_)));
    }

    #[test]
    fn test_cli_parse_anonymize_with_format() {
        let cli = Cli::parse_from([
            "veil",
            "anonymize",
            "in.dat",
            "out.dat",
            "--config",
            "veil.toml",
            "--format",
            "csv",
        ]);
        let Commands::Anonymize(args) = cli.command else {
            panic!("expected anonymize");
        };
        assert_eq!(args.format, Some(crate::adapters::Format::Csv));
    }

    #[test]
    fn test_cli_anonymize_requires_config() {
        let result = Cli::try_parse_from(["veil", "anonymize", "in.json", "out.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["veil", "validate-config", "--config", "rules.toml"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["veil", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["veil", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "veil",
            "anonymize",
            "in",
            "out",
            "--config",
            "c.toml",
            "--format",
            "yaml",
        ]);
        assert!(result.is_err());
    }
}

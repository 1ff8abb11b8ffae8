//! Anonymize command implementation
//!
//! Loads the rule configuration, anonymizes one document, and writes the
//! result. Output is written only after the whole document has been
//! processed, so a failed run never leaves a partially anonymized file
//! behind.

use crate::adapters::Format;
use crate::anonymization::Engine;
use crate::config::load_config;
use crate::logging::init_logging;
use clap::Args;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Path to the input document
    pub input: PathBuf,

    /// Path to write the anonymized document, or `-` for stdout
    pub output: PathBuf,

    /// Path to the rule configuration file
    #[arg(short, long, env = "VEIL_CONFIG")]
    pub config: PathBuf,

    /// Document format (inferred from the input extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Print the masking report as JSON to stderr
    #[arg(long)]
    pub report: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command, returning the process exit code.
    pub fn execute(&self, log_level: &str) -> anyhow::Result<i32> {
        let config = match load_config(&self.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(1);
            }
        };

        let _guard = init_logging(log_level, &config.logging)?;

        let Some(format) = self.format.or_else(|| Format::from_extension(&self.input)) else {
            eprintln!(
                "❌ cannot infer a format from '{}'; pass --format <json|csv|xml>",
                self.input.display()
            );
            return Ok(2);
        };

        let mut engine = match Engine::from_config(&config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(1);
            }
        };

        let raw = match fs::read(&self.input) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("❌ failed to read {}: {e}", self.input.display());
                return Ok(1);
            }
        };

        tracing::info!(
            input = %self.input.display(),
            format = %format,
            rules = config.rules.len(),
            "anonymizing document"
        );

        let masked = match engine.anonymize(&raw, format) {
            Ok(masked) => masked,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(1);
            }
        };

        let to_stdout = self.output.as_os_str() == "-";
        if to_stdout {
            std::io::stdout().write_all(&masked)?;
        } else {
            fs::write(&self.output, &masked)?;
        }

        if self.report {
            eprintln!("{}", serde_json::to_string_pretty(engine.report())?);
        }

        let summary = engine.report().summary();
        if to_stdout {
            eprintln!("✅ {summary}");
        } else {
            println!("✅ {} → {} ({summary})", self.input.display(), self.output.display());
        }
        Ok(0)
    }
}

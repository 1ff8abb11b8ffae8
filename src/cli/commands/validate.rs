//! Validate config command implementation
//!
//! Loads the configuration and resolves the full rule set, so unknown
//! strategies, bad regexes, and out-of-range options all surface here.

use crate::anonymization::RuleSet;
use crate::config::load_config;
use crate::logging::init_logging;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the rule configuration file
    #[arg(short, long, env = "VEIL_CONFIG")]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate-config command, returning the process exit code.
    pub fn execute(&self, log_level: &str) -> anyhow::Result<i32> {
        println!("🔍 Validating configuration file: {}", self.config.display());

        let config = match load_config(&self.config) {
            Ok(config) => {
                println!("✅ Configuration file loaded");
                config
            }
            Err(e) => {
                println!("❌ {e}");
                return Ok(1);
            }
        };

        let _guard = init_logging(log_level, &config.logging)?;

        match RuleSet::from_config(&config.rules, config.anonymization.seed) {
            Ok(ruleset) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Rules: {}", ruleset.len());
                for (rule, declared) in ruleset.iter().zip(&config.rules) {
                    println!(
                        "    #{} {:?} '{}' → {}",
                        rule.id() + 1,
                        declared.match_type,
                        rule.pattern(),
                        rule.strategy()
                    );
                }
                println!("  On error: {:?}", config.anonymization.on_error);
                println!("  Registry scope: {:?}", config.anonymization.registry_scope);
                Ok(0)
            }
            Err(e) => {
                println!("❌ {e}");
                Ok(1)
            }
        }
    }
}

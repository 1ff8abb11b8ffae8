//! Init command implementation
//!
//! Writes a commented sample configuration file as a starting point.

use crate::config::LoggingConfig;
use crate::logging::init_logging;
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Sample configuration written by `veil init`.
pub const SAMPLE_CONFIG: &str = r#"# Veil configuration file
# Rules are applied in declaration order; the first matching rule wins.

[anonymization]
# Seed mixed into generated fake values. Runs with the same seed, rules,
# and input produce byte-identical output.
seed = 0
# fallback: failed fields are replaced with fallback_token and recorded
# fail: the run aborts on the first masking failure
on_error = "fallback"
# per_run: repeated values map consistently across all documents of a run
# per_document: the mapping resets for every document
registry_scope = "per_run"
fallback_token = "***"

[csv]
# delimiter = ";"
infer_numbers = false

[logging]
enabled = false
path = "./logs"
rotation = "daily"

[[rules]]
match_type = "exact"
pattern = "email"
strategy = "fake"
[rules.options]
category = "email"

[[rules]]
match_type = "exact"
pattern = "name"
strategy = "fake"
[rules.options]
category = "name"

[[rules]]
match_type = "exact"
pattern = "ssn"
strategy = "partial"
[rules.options]
keep_suffix = 4
mask_char = "X"

[[rules]]
match_type = "regex"
pattern = "(?i)(customer|account)_id"
strategy = "hash"
[rules.options]
digest_len = 16

[[rules]]
match_type = "regex"
pattern = "(?i)phone|mobile"
strategy = "redact"
[rules.options]
token = "[PHONE]"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(default_value = "veil.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command, returning the process exit code.
    pub fn execute(&self, log_level: &str) -> anyhow::Result<i32> {
        let _guard = init_logging(log_level, &LoggingConfig::default())?;

        if self.path.exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.path.display());
            println!("   Use --force to overwrite");
            return Ok(1);
        }

        match fs::write(&self.path, SAMPLE_CONFIG) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.path.display());
                println!();
                println!("Next steps:");
                println!("  1. Edit {} to match your field names", self.path.display());
                println!("  2. Validate: veil validate-config --config {}", self.path.display());
                println!(
                    "  3. Anonymize: veil anonymize input.json output.json --config {}",
                    self.path.display()
                );
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file: {e}");
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::RuleSet;
    use crate::config::VeilConfig;

    #[test]
    fn test_sample_config_parses_and_resolves() {
        let config: VeilConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());

        let ruleset = RuleSet::from_config(&config.rules, config.anonymization.seed).unwrap();
        assert_eq!(ruleset.len(), 5);
    }
}

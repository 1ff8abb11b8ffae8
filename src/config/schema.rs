//! Configuration schema types
//!
//! This module defines the configuration structure for Veil. The rule set,
//! engine behavior, CSV dialect, and logging settings all come from one TOML
//! document.

use serde::{Deserialize, Serialize};

/// How the engine reacts when a masking strategy fails on a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the field in the report and fall back to the redaction token
    #[default]
    Fallback,
    /// Abort the run on the first masking failure
    Fail,
}

/// Lifetime of the consistency registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistryScope {
    /// Replacements are shared across every document of one run
    #[default]
    PerRun,
    /// The registry is cleared before each document
    PerDocument,
}

/// How a rule's pattern is matched against field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Exact equality against the field's simple name
    Exact,
    /// Regular expression tested against the simple name, then the full path
    Regex,
}

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Engine-level settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// CSV dialect settings
    #[serde(default)]
    pub csv: CsvConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Masking rules, in precedence order (first match wins)
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl VeilConfig {
    /// Validates structural configuration values.
    ///
    /// Strategy names and per-strategy options are resolved separately when
    /// the rule set is built, so that unknown strategies fail at load time
    /// with an error naming the offender.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        self.csv.validate()?;
        self.logging.validate()?;

        if self.rules.is_empty() {
            tracing::warn!("configuration declares no rules; documents will pass through unchanged");
        }

        for (idx, rule) in self.rules.iter().enumerate() {
            rule.validate()
                .map_err(|e| format!("rule #{}: {}", idx + 1, e))?;
        }

        Ok(())
    }
}

/// Engine-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Seed mixed into every generated fake value; two runs with the same
    /// seed, rules, and input produce byte-identical output
    #[serde(default)]
    pub seed: u64,

    /// Reaction to per-field masking failures
    #[serde(default)]
    pub on_error: ErrorPolicy,

    /// Lifetime of the consistency registry
    #[serde(default)]
    pub registry_scope: RegistryScope,

    /// Token used when a failed field falls back to redaction
    #[serde(default = "default_fallback_token")]
    pub fallback_token: String,
}

fn default_fallback_token() -> String {
    "***".to_string()
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            on_error: ErrorPolicy::Fallback,
            registry_scope: RegistryScope::PerRun,
            fallback_token: default_fallback_token(),
        }
    }
}

/// CSV dialect settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CsvConfig {
    /// Field delimiter; sniffed from the header line when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,

    /// Parse numeric-looking cells as numbers instead of strings
    #[serde(default)]
    pub infer_numbers: bool,
}

impl CsvConfig {
    /// Validate the CSV dialect settings
    pub fn validate(&self) -> Result<(), String> {
        if let Some(d) = self.delimiter {
            if !d.is_ascii() || d == '"' || d == '\n' || d == '\r' {
                return Err(format!("invalid CSV delimiter: {d:?}"));
            }
        }
        Ok(())
    }

    /// Delimiter as a byte, if configured
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.map(|d| d as u8)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to console output
    #[serde(default)]
    pub enabled: bool,

    /// Directory for rotated log files
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Rotation schedule: "daily" or "hourly"
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    /// Validate the logging settings
    pub fn validate(&self) -> Result<(), String> {
        match self.rotation.as_str() {
            "daily" | "hourly" => Ok(()),
            other => Err(format!(
                "invalid log rotation '{other}': must be 'daily' or 'hourly'"
            )),
        }
    }
}

/// One masking rule as declared in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// How `pattern` is matched
    pub match_type: MatchType,

    /// Field name or regular expression
    pub pattern: String,

    /// Masking strategy name: redact, fake, hash, or partial
    pub strategy: String,

    /// Strategy-specific options
    #[serde(default)]
    pub options: RuleOptions,
}

impl RuleConfig {
    /// Validate the parts of a rule that don't require strategy resolution
    pub fn validate(&self) -> Result<(), String> {
        if self.pattern.is_empty() {
            return Err("pattern must not be empty".to_string());
        }
        if self.strategy.is_empty() {
            return Err("strategy must not be empty".to_string());
        }
        Ok(())
    }
}

/// Strategy-specific rule options
///
/// A single bag of optional knobs; each strategy reads the ones it knows and
/// the resolver rejects out-of-range values at load time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuleOptions {
    /// redact: replacement token (default `***`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// fake: semantic category of the generated value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// hash: digest length in hex characters, 1..=64 (default 16)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_len: Option<usize>,

    /// hash: optional salt prepended to the hashed value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    /// partial: number of leading characters to keep (default 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_prefix: Option<usize>,

    /// partial: number of trailing characters to keep (default 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_suffix: Option<usize>,

    /// partial: masking character (default `*`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_char: Option<char>,

    /// fake/partial: allow replacing non-string scalars with strings
    #[serde(default)]
    pub coerce: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VeilConfig {
            anonymization: AnonymizationConfig::default(),
            csv: CsvConfig::default(),
            logging: LoggingConfig::default(),
            rules: Vec::new(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.anonymization.fallback_token, "***");
        assert_eq!(config.anonymization.on_error, ErrorPolicy::Fallback);
        assert_eq!(config.anonymization.registry_scope, RegistryScope::PerRun);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let rule = RuleConfig {
            match_type: MatchType::Exact,
            pattern: String::new(),
            strategy: "redact".to_string(),
            options: RuleOptions::default(),
        };
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_invalid_delimiter_rejected() {
        let csv = CsvConfig {
            delimiter: Some('"'),
            infer_numbers: false,
        };
        assert!(csv.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let logging = LoggingConfig {
            enabled: true,
            path: "./logs".to_string(),
            rotation: "weekly".to_string(),
        };
        assert!(logging.validate().is_err());
    }

    #[test]
    fn test_rule_config_from_toml() {
        let toml = r#"
            match_type = "regex"
            pattern = ".*mail.*"
            strategy = "fake"

            [options]
            category = "email"
        "#;
        let rule: RuleConfig = toml::from_str(toml).unwrap();
        assert_eq!(rule.match_type, MatchType::Regex);
        assert_eq!(rule.options.category.as_deref(), Some("email"));
        assert!(!rule.options.coerce);
    }
}

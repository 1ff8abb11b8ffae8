//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ErrorPolicy, VeilConfig};
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`VeilConfig`]
/// 4. Applies environment variable overrides (`VEIL_*` prefix)
/// 5. Validates structural configuration values
///
/// Strategy resolution (unknown strategy or fake category names) happens
/// when the rule set is built from the loaded config, still before any
/// document is read.
///
/// # Errors
///
/// Returns a [`VeilError::Config`] if the file cannot be read, the TOML is
/// malformed, a referenced environment variable is unset, or validation
/// fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Config(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VeilConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| VeilError::Config(format!("configuration validation failed: {e}")))?;

    tracing::debug!(
        rules = config.rules.len(),
        path = %path.display(),
        "configuration loaded"
    );

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Referencing an unset variable is a
/// configuration error listing every missing name.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid substitution pattern");
    let mut result = String::with_capacity(input.len());
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let substituted = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing_vars.push(var_name.to_string());
                    String::new()
                }
            }
        });
        result.push_str(&substituted);
        result.push('\n');
    }

    if missing_vars.is_empty() {
        Ok(result)
    } else {
        missing_vars.sort();
        missing_vars.dedup();
        Err(VeilError::Config(format!(
            "environment variable(s) not set: {}",
            missing_vars.join(", ")
        )))
    }
}

/// Applies `VEIL_*` environment variable overrides to a loaded config
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    if let Ok(val) = std::env::var("VEIL_SEED") {
        config.anonymization.seed = val
            .parse()
            .map_err(|_| VeilError::Config(format!("invalid VEIL_SEED value: {val}")))?;
    }

    if let Ok(val) = std::env::var("VEIL_ON_ERROR") {
        config.anonymization.on_error = match val.to_lowercase().as_str() {
            "fallback" => ErrorPolicy::Fallback,
            "fail" => ErrorPolicy::Fail,
            _ => {
                return Err(VeilError::Config(format!(
                    "invalid VEIL_ON_ERROR value: {val}"
                )))
            }
        };
    }

    if let Ok(val) = std::env::var("VEIL_LOG_ENABLED") {
        config.logging.enabled = val
            .parse()
            .map_err(|_| VeilError::Config(format!("invalid VEIL_LOG_ENABLED value: {val}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(
            r#"
            [[rules]]
            match_type = "exact"
            pattern = "email"
            strategy = "redact"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].pattern, "email");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/veil.toml").unwrap_err();
        assert!(matches!(err, VeilError::Config(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("rules = not toml");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, VeilError::Config(_)));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("VEIL_TEST_SALT", "pepper");
        let input = "salt = \"${VEIL_TEST_SALT}\"";
        let output = substitute_env_vars(input).unwrap();
        assert!(output.contains("pepper"));
        std::env::remove_var("VEIL_TEST_SALT");
    }

    #[test]
    fn test_env_substitution_missing_var() {
        let input = "salt = \"${VEIL_DEFINITELY_NOT_SET_XYZ}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("VEIL_DEFINITELY_NOT_SET_XYZ"));
    }

    #[test]
    fn test_env_substitution_skips_comments() {
        let input = "# uses ${VEIL_NOT_SET_IN_COMMENT}\nseed = 1";
        let output = substitute_env_vars(input).unwrap();
        assert!(output.contains("${VEIL_NOT_SET_IN_COMMENT}"));
    }

    #[test]
    fn test_empty_pattern_rejected_at_load() {
        let file = write_config(
            r#"
            [[rules]]
            match_type = "exact"
            pattern = ""
            strategy = "redact"
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("rule #1"));
    }
}

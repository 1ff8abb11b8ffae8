//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_*` environment variable overrides
//! - Default values for optional settings
//! - Type-safe configuration structs
//!
//! The configuration file carries both the engine settings and the ordered
//! rule set; see [`schema::VeilConfig`].

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    AnonymizationConfig, CsvConfig, ErrorPolicy, LoggingConfig, MatchType, RegistryScope,
    RuleConfig, RuleOptions, VeilConfig,
};

// Veil - Structured Data Anonymization Tool
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - Rule-Driven Data Anonymization
//!
//! Veil anonymizes structured records (JSON, CSV, XML) by replacing
//! sensitive field values with realistic-looking but meaningless
//! substitutes, driven by a declarative rule set that matches fields by
//! exact name or regular expression.
//!
//! ## Architecture
//!
//! Veil follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - The core engine: rules, generators, traversal,
//!   consistency registry, report
//! - [`adapters`] - Format boundaries (JSON, CSV, XML) around the generic
//!   traversal tree
//! - [`domain`] - Core domain types, the traversal tree, and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::adapters::Format;
//! use veil::anonymization::Engine;
//! use veil::config::load_config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("veil.toml")?;
//!     let mut engine = Engine::from_config(&config)?;
//!
//!     let raw = std::fs::read("records.json")?;
//!     let masked = engine.anonymize(&raw, Format::Json)?;
//!     std::fs::write("records.masked.json", masked)?;
//!
//!     println!("{}", engine.report().summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Structure preservation**: object keys, array lengths and order, and
//!   XML element/attribute hierarchy never change; only matched scalar leaf
//!   values do.
//! - **Determinism**: for a fixed input, rule set, and seed, two runs
//!   produce byte-identical output.
//! - **Consistency**: within one run (or one document, configurable),
//!   repeated occurrences of the same original value under the same rule
//!   map to the same replacement.
//! - **No partial output**: parse and configuration errors abort before
//!   anything is written; per-field masking failures either abort or fall
//!   back to a fixed token recorded in the [`anonymization::MaskingReport`].
//!
//! ## Error Handling
//!
//! Veil uses the [`domain::VeilError`] type for all errors:
//!
//! ```rust,no_run
//! use veil::domain::VeilError;
//!
//! fn example() -> Result<(), VeilError> {
//!     let config = veil::config::load_config("veil.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;

//! Anonymization core
//!
//! This module holds the rule-driven masking engine and everything it
//! composes:
//!
//! - **Rules** ([`rules`]): declarative matchers resolved into concrete
//!   generators at load time, with first-match-wins precedence
//! - **Generators** ([`generators`]): the closed set of masking strategies
//!   (redact, fake, hash, partial)
//! - **Registry** ([`registry`]): the scoped memo that keeps repeated
//!   original values mapping to the same replacement
//! - **Engine** ([`engine`]): the recursive traversal that ties it together
//! - **Report** ([`report`]): per-run visibility into masked fields and
//!   fallbacks
//!
//! # Usage
//!
//! ```rust,ignore
//! use veil::anonymization::Engine;
//! use veil::adapters::Format;
//! use veil::config::load_config;
//!
//! let config = load_config("veil.toml")?;
//! let mut engine = Engine::from_config(&config)?;
//! let masked = engine.anonymize(&raw_bytes, Format::Json)?;
//! ```

pub mod engine;
pub mod generators;
pub mod registry;
pub mod report;
pub mod rules;

// Re-export main types
pub use engine::{Engine, EngineOptions};
pub use generators::{FakeCategory, Generator, StrategyKind};
pub use registry::ConsistencyRegistry;
pub use report::{FieldFallback, MaskingReport};
pub use rules::{NameMatcher, Rule, RuleId, RuleSet};

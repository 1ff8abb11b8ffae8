//! Value generation strategies
//!
//! Each masking strategy is a [`Generator`] resolved from its configuration
//! name once at rule-set load time, so an unknown strategy fails before any
//! document is read.

pub mod fake;
pub mod hash;
pub mod partial;
pub mod redact;

pub use fake::{FakeCategory, FakeGenerator};
pub use hash::HashGenerator;
pub use partial::PartialGenerator;
pub use redact::RedactGenerator;

use crate::anonymization::registry::ConsistencyRegistry;
use crate::anonymization::rules::RuleId;
use crate::config::RuleConfig;
use crate::domain::context::FieldContext;
use crate::domain::errors::{MaskingError, VeilError};
use crate::domain::node::Scalar;
use crate::domain::result::Result;
use std::fmt;

/// Closed set of masking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Replace with a fixed token
    Redact,
    /// Replace with a realistic synthetic value
    Fake,
    /// Replace with a deterministic digest-derived string
    Hash,
    /// Mask all but a configured prefix/suffix
    Partial,
}

impl StrategyKind {
    /// Canonical configuration name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Redact => "redact",
            StrategyKind::Fake => "fake",
            StrategyKind::Hash => "hash",
            StrategyKind::Partial => "partial",
        }
    }

    /// Parse a configuration strategy name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "redact" => Some(StrategyKind::Redact),
            "fake" => Some(StrategyKind::Fake),
            "hash" => Some(StrategyKind::Hash),
            "partial" => Some(StrategyKind::Partial),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for masking strategy implementations
///
/// Generators are pure given (original, context, registry): the same inputs
/// always produce the same replacement, which keeps whole runs
/// byte-reproducible.
pub trait Generator: Send + Sync + fmt::Debug {
    /// The strategy this generator implements.
    fn kind(&self) -> StrategyKind;

    /// Produce the replacement for one scalar field.
    fn generate(
        &self,
        original: &Scalar,
        ctx: &FieldContext<'_>,
        registry: &mut ConsistencyRegistry,
    ) -> std::result::Result<Scalar, MaskingError>;
}

/// Resolve a rule's strategy name and options into a concrete generator.
///
/// # Errors
///
/// Returns a [`VeilError::Config`] naming the unknown strategy, unknown fake
/// category, or out-of-range option value.
pub fn resolve(rule_id: RuleId, config: &RuleConfig, seed: u64) -> Result<Box<dyn Generator>> {
    let kind = StrategyKind::parse(&config.strategy).ok_or_else(|| {
        VeilError::Config(format!(
            "unknown strategy '{}' (expected one of: redact, fake, hash, partial)",
            config.strategy
        ))
    })?;

    match kind {
        StrategyKind::Redact => Ok(Box::new(redact::RedactGenerator::from_options(
            &config.options,
        ))),
        StrategyKind::Fake => Ok(Box::new(fake::FakeGenerator::from_options(
            rule_id,
            &config.options,
            seed,
        )?)),
        StrategyKind::Hash => Ok(Box::new(hash::HashGenerator::from_options(&config.options)?)),
        StrategyKind::Partial => Ok(Box::new(partial::PartialGenerator::from_options(
            &config.options,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchType, RuleOptions};

    fn rule_config(strategy: &str) -> RuleConfig {
        RuleConfig {
            match_type: MatchType::Exact,
            pattern: "email".to_string(),
            strategy: strategy.to_string(),
            options: RuleOptions::default(),
        }
    }

    #[test]
    fn test_strategy_round_trip() {
        for kind in [
            StrategyKind::Redact,
            StrategyKind::Fake,
            StrategyKind::Hash,
            StrategyKind::Partial,
        ] {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_strategy_named_in_error() {
        let err = resolve(0, &rule_config("scramble"), 0).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("scramble"));
        assert!(message.contains("redact"));
    }

    #[test]
    fn test_known_strategies_resolve() {
        assert_eq!(
            resolve(0, &rule_config("redact"), 0).unwrap().kind(),
            StrategyKind::Redact
        );
        assert_eq!(
            resolve(0, &rule_config("hash"), 0).unwrap().kind(),
            StrategyKind::Hash
        );
        assert_eq!(
            resolve(0, &rule_config("partial"), 0).unwrap().kind(),
            StrategyKind::Partial
        );
    }
}

//! Fixed-token redaction strategy

use super::{Generator, StrategyKind};
use crate::anonymization::registry::ConsistencyRegistry;
use crate::config::RuleOptions;
use crate::domain::context::FieldContext;
use crate::domain::errors::MaskingError;
use crate::domain::node::Scalar;

const DEFAULT_TOKEN: &str = "***";

/// Replaces every matched value with a fixed configured token.
///
/// Idempotent by construction, so it never touches the consistency registry.
#[derive(Debug)]
pub struct RedactGenerator {
    token: String,
}

impl RedactGenerator {
    /// Create a generator with an explicit token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Build from rule options, defaulting the token to `***`.
    pub fn from_options(options: &RuleOptions) -> Self {
        Self::new(options.token.clone().unwrap_or_else(|| DEFAULT_TOKEN.to_string()))
    }
}

impl Generator for RedactGenerator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Redact
    }

    fn generate(
        &self,
        _original: &Scalar,
        _ctx: &FieldContext<'_>,
        _registry: &mut ConsistencyRegistry,
    ) -> Result<Scalar, MaskingError> {
        Ok(Scalar::String(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::ScalarType;

    fn ctx<'a>(scalar_type: ScalarType) -> FieldContext<'a> {
        FieldContext {
            name: "email",
            path: "user.email",
            scalar_type,
        }
    }

    #[test]
    fn test_redacts_to_default_token() {
        let generator = RedactGenerator::from_options(&RuleOptions::default());
        let mut registry = ConsistencyRegistry::default();
        let out = generator
            .generate(
                &Scalar::String("a@x.com".to_string()),
                &ctx(ScalarType::String),
                &mut registry,
            )
            .unwrap();
        assert_eq!(out, Scalar::String("***".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_custom_token() {
        let generator = RedactGenerator::new("[REDACTED]");
        let mut registry = ConsistencyRegistry::default();
        let out = generator
            .generate(
                &Scalar::Number(serde_json::Number::from(7)),
                &ctx(ScalarType::Number),
                &mut registry,
            )
            .unwrap();
        assert_eq!(out, Scalar::String("[REDACTED]".to_string()));
    }
}

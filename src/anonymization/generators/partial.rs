//! Partial masking strategy

use super::{Generator, StrategyKind};
use crate::anonymization::registry::ConsistencyRegistry;
use crate::config::RuleOptions;
use crate::domain::context::FieldContext;
use crate::domain::errors::MaskingError;
use crate::domain::node::Scalar;

const DEFAULT_MASK_CHAR: char = '*';

/// Masks all but a configured prefix and/or suffix of the original value.
///
/// When the kept lengths meet or exceed the value's length the value is
/// fully masked rather than rejected; the clamp keeps short values from
/// leaking through a `keep_suffix` sized for longer ones.
#[derive(Debug)]
pub struct PartialGenerator {
    keep_prefix: usize,
    keep_suffix: usize,
    mask_char: char,
    coerce: bool,
}

impl PartialGenerator {
    /// Build from rule options.
    pub fn from_options(options: &RuleOptions) -> Self {
        Self {
            keep_prefix: options.keep_prefix.unwrap_or(0),
            keep_suffix: options.keep_suffix.unwrap_or(0),
            mask_char: options.mask_char.unwrap_or(DEFAULT_MASK_CHAR),
            coerce: options.coerce,
        }
    }

    fn mask(&self, value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        let len = chars.len();

        // clamp: keeping more than the value holds masks everything
        if self.keep_prefix + self.keep_suffix >= len {
            return std::iter::repeat(self.mask_char).take(len).collect();
        }

        let mut out = String::with_capacity(len);
        out.extend(&chars[..self.keep_prefix]);
        out.extend(std::iter::repeat(self.mask_char).take(len - self.keep_prefix - self.keep_suffix));
        out.extend(&chars[len - self.keep_suffix..]);
        out
    }
}

impl Generator for PartialGenerator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Partial
    }

    fn generate(
        &self,
        original: &Scalar,
        ctx: &FieldContext<'_>,
        _registry: &mut ConsistencyRegistry,
    ) -> Result<Scalar, MaskingError> {
        match original {
            Scalar::String(s) => Ok(Scalar::String(self.mask(s))),
            other if self.coerce => Ok(Scalar::String(self.mask(&other.lexical()))),
            other => Err(MaskingError::TypeMismatch {
                strategy: "partial",
                actual: other.scalar_type().to_string(),
                path: ctx.path.to_string(),
            }),
        }
    }
}

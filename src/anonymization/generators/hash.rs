//! Deterministic hashing strategy

use super::{Generator, StrategyKind};
use crate::anonymization::registry::ConsistencyRegistry;
use crate::config::RuleOptions;
use crate::domain::context::FieldContext;
use crate::domain::errors::{MaskingError, VeilError};
use crate::domain::node::Scalar;
use crate::domain::result::Result;
use sha2::{Digest, Sha256};

const DEFAULT_DIGEST_LEN: usize = 16;
const MAX_DIGEST_LEN: usize = 64;

/// Replaces values with a truncated hex SHA-256 digest.
///
/// The same original always yields the same output, across documents and
/// across runs, so the consistency registry is bypassed. The output is
/// always a string; for numeric fields this is a deliberate, engine-visible
/// type coercion.
#[derive(Debug)]
pub struct HashGenerator {
    digest_len: usize,
    salt: Option<String>,
}

impl HashGenerator {
    /// Build from rule options, validating the digest length.
    pub fn from_options(options: &RuleOptions) -> Result<Self> {
        let digest_len = options.digest_len.unwrap_or(DEFAULT_DIGEST_LEN);
        if digest_len == 0 || digest_len > MAX_DIGEST_LEN {
            return Err(VeilError::Config(format!(
                "digest_len must be between 1 and {MAX_DIGEST_LEN}, got {digest_len}"
            )));
        }
        Ok(Self {
            digest_len,
            salt: options.salt.clone(),
        })
    }

    fn digest(&self, input: &str) -> String {
        let mut hasher = Sha256::new();
        if let Some(ref salt) = self.salt {
            hasher.update(salt.as_bytes());
        }
        hasher.update(input.as_bytes());
        let result = hasher.finalize();
        let mut hex = format!("{result:x}");
        hex.truncate(self.digest_len);
        hex
    }
}

impl Generator for HashGenerator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hash
    }

    fn generate(
        &self,
        original: &Scalar,
        _ctx: &FieldContext<'_>,
        _registry: &mut ConsistencyRegistry,
    ) -> std::result::Result<Scalar, MaskingError> {
        let lexical = original.lexical();
        let mut out = self.digest(&lexical);
        // a value equal to its own truncated digest must still change
        if out == lexical {
            out = self.digest(&out);
        }
        Ok(Scalar::String(out))
    }
}

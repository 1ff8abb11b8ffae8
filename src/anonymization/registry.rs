//! Consistency registry
//!
//! Memoizes generated replacements so that repeated occurrences of the same
//! original value under the same rule map to the same substitute. Keyed by
//! (rule identity, original lexical form); the hash strategy bypasses the
//! registry entirely because it is consistent by construction.

use crate::config::RegistryScope;
use crate::domain::node::Scalar;
use std::collections::HashMap;

use super::rules::RuleId;

/// Scoped memo from (rule, original value) to generated replacement.
#[derive(Debug)]
pub struct ConsistencyRegistry {
    entries: HashMap<(RuleId, String), Scalar>,
    scope: RegistryScope,
}

impl ConsistencyRegistry {
    /// Create an empty registry with the given scope.
    pub fn new(scope: RegistryScope) -> Self {
        Self {
            entries: HashMap::new(),
            scope,
        }
    }

    /// The configured scope.
    pub fn scope(&self) -> RegistryScope {
        self.scope
    }

    /// Look up a previously generated replacement.
    pub fn lookup(&self, rule: RuleId, original: &str) -> Option<&Scalar> {
        self.entries.get(&(rule, original.to_string()))
    }

    /// Record a freshly generated replacement.
    pub fn record(&mut self, rule: RuleId, original: String, replacement: Scalar) {
        self.entries.insert((rule, original), replacement);
    }

    /// Number of memoized replacements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Called by the engine at each document boundary; clears the memo only
    /// in per-document scope.
    pub fn begin_document(&mut self) {
        if self.scope == RegistryScope::PerDocument {
            self.entries.clear();
        }
    }
}

impl Default for ConsistencyRegistry {
    fn default() -> Self {
        Self::new(RegistryScope::PerRun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_after_record() {
        let mut registry = ConsistencyRegistry::default();
        registry.record(0, "john".to_string(), Scalar::String("mark".to_string()));

        assert_eq!(
            registry.lookup(0, "john"),
            Some(&Scalar::String("mark".to_string()))
        );
        assert_eq!(registry.lookup(1, "john"), None);
        assert_eq!(registry.lookup(0, "jane"), None);
    }

    #[test]
    fn test_per_run_scope_survives_document_boundary() {
        let mut registry = ConsistencyRegistry::new(RegistryScope::PerRun);
        registry.record(0, "a".to_string(), Scalar::String("b".to_string()));
        registry.begin_document();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_per_document_scope_clears_at_boundary() {
        let mut registry = ConsistencyRegistry::new(RegistryScope::PerDocument);
        registry.record(0, "a".to_string(), Scalar::String("b".to_string()));
        registry.begin_document();
        assert!(registry.is_empty());
    }
}

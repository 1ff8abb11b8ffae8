//! Masking run reporting
//!
//! Records what the engine did to each document: how many fields were
//! masked per strategy and every per-field fallback, so no output is ever
//! produced with the engine unaware of which fields succeeded.

use super::generators::StrategyKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of one engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingReport {
    /// Documents processed
    pub documents: usize,

    /// Total fields altered (including fallbacks)
    pub fields_masked: usize,

    /// Successfully masked fields by strategy name
    pub masked_by_strategy: HashMap<String, usize>,

    /// Fields that fell back to the redaction token
    pub fallbacks: Vec<FieldFallback>,

    /// When the run started
    pub started_at: DateTime<Utc>,
}

/// One field that could not be masked with its configured strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFallback {
    /// Dotted path of the field
    pub path: String,

    /// The strategy that failed
    pub strategy: String,

    /// Why it failed
    pub reason: String,
}

impl MaskingReport {
    /// Create an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            documents: 0,
            fields_masked: 0,
            masked_by_strategy: HashMap::new(),
            fallbacks: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Record one successfully masked field.
    pub fn record_masked(&mut self, strategy: StrategyKind) {
        self.fields_masked += 1;
        *self
            .masked_by_strategy
            .entry(strategy.as_str().to_string())
            .or_insert(0) += 1;
    }

    /// Record a field that fell back to the redaction token.
    pub fn record_fallback(
        &mut self,
        path: impl Into<String>,
        strategy: StrategyKind,
        reason: impl Into<String>,
    ) {
        self.fields_masked += 1;
        self.fallbacks.push(FieldFallback {
            path: path.into(),
            strategy: strategy.as_str().to_string(),
            reason: reason.into(),
        });
    }

    /// Record a completed document.
    pub fn add_document(&mut self) {
        self.documents += 1;
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "masked {} field(s) across {} document(s), {} fallback(s)",
            self.fields_masked,
            self.documents,
            self.fallbacks.len()
        )
    }
}

impl Default for MaskingReport {
    fn default() -> Self {
        Self::new()
    }
}

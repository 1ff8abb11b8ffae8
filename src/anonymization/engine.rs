//! Traversal and masking engine
//!
//! The [`Engine`] is the single entry point of the core:
//! raw bytes in, anonymized raw bytes out. It walks the generic traversal
//! tree depth-first, building the dotted path incrementally, consults the
//! rule set at every scalar, and rebuilds the tree with replacements
//! substituted in place. The input tree is never mutated.
//!
//! Traversal order is fixed (object entries in encounter order, array
//! elements by index), so output is byte-reproducible for a given input,
//! rule set, and seed.

use crate::adapters::{xml, CsvAdapter, Format, FormatAdapter, JsonAdapter, XmlAdapter};
use crate::anonymization::registry::ConsistencyRegistry;
use crate::anonymization::report::MaskingReport;
use crate::anonymization::rules::RuleSet;
use crate::config::{ErrorPolicy, RegistryScope, VeilConfig};
use crate::domain::context::FieldContext;
use crate::domain::node::{Node, Scalar};
use crate::domain::result::Result;

/// Engine behavior knobs independent of the rule set.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Reaction to per-field masking failures
    pub on_error: ErrorPolicy,
    /// Token written when a failed field falls back to redaction
    pub fallback_token: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Fallback,
            fallback_token: "***".to_string(),
        }
    }
}

/// Rule-driven anonymization engine.
///
/// Owns the resolved rule set, the consistency registry, and the masking
/// report for one run. Processing is synchronous and single-threaded: the
/// walk is a pure in-memory computation with I/O confined to the callers of
/// [`anonymize`](Engine::anonymize).
#[derive(Debug)]
pub struct Engine {
    ruleset: RuleSet,
    registry: ConsistencyRegistry,
    options: EngineOptions,
    report: MaskingReport,
    json: JsonAdapter,
    csv: CsvAdapter,
    xml: XmlAdapter,
}

impl Engine {
    /// Build an engine from a loaded configuration.
    ///
    /// Resolves every rule's strategy here, so unknown strategies fail
    /// before any document is read.
    pub fn from_config(config: &VeilConfig) -> Result<Self> {
        let ruleset = RuleSet::from_config(&config.rules, config.anonymization.seed)?;
        tracing::debug!(rules = ruleset.len(), "rule set resolved");
        Ok(Self {
            ruleset,
            registry: ConsistencyRegistry::new(config.anonymization.registry_scope),
            options: EngineOptions {
                on_error: config.anonymization.on_error,
                fallback_token: config.anonymization.fallback_token.clone(),
            },
            report: MaskingReport::new(),
            json: JsonAdapter::new(),
            csv: CsvAdapter::new(&config.csv),
            xml: XmlAdapter::new(),
        })
    }

    /// Build an engine with default options around an existing rule set.
    pub fn new(ruleset: RuleSet) -> Self {
        Self {
            ruleset,
            registry: ConsistencyRegistry::new(RegistryScope::PerRun),
            options: EngineOptions::default(),
            report: MaskingReport::new(),
            json: JsonAdapter::new(),
            csv: CsvAdapter::default(),
            xml: XmlAdapter::new(),
        }
    }

    /// Replace the engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Anonymize one document: parse, walk, serialize.
    ///
    /// # Errors
    ///
    /// Parse errors and (with `on_error = "fail"`) masking errors abort
    /// with no output produced.
    pub fn anonymize(&mut self, raw: &[u8], format: Format) -> Result<Vec<u8>> {
        self.registry.begin_document();

        let tree = self.adapter(format).parse(raw)?;
        let masked = self.anonymize_node(&tree)?;
        let out = self.adapter(format).serialize(&masked, raw)?;

        self.report.add_document();
        tracing::info!(
            format = %format,
            bytes_in = raw.len(),
            bytes_out = out.len(),
            "document anonymized"
        );
        Ok(out)
    }

    /// Anonymize an already-parsed traversal tree.
    ///
    /// Returns a newly constructed tree; the input is untouched.
    pub fn anonymize_node(&mut self, node: &Node) -> Result<Node> {
        let Self {
            ruleset,
            registry,
            options,
            report,
            ..
        } = self;
        walk(node, "", "", ruleset, registry, options, report)
    }

    /// The masking report accumulated so far.
    pub fn report(&self) -> &MaskingReport {
        &self.report
    }

    /// The consistency registry (mainly useful to tests).
    pub fn registry(&self) -> &ConsistencyRegistry {
        &self.registry
    }

    fn adapter(&self, format: Format) -> &dyn FormatAdapter {
        match format {
            Format::Json => &self.json,
            Format::Csv => &self.csv,
            Format::Xml => &self.xml,
        }
    }
}

fn walk(
    node: &Node,
    path: &str,
    name: &str,
    ruleset: &RuleSet,
    registry: &mut ConsistencyRegistry,
    options: &EngineOptions,
    report: &mut MaskingReport,
) -> Result<Node> {
    match node {
        Node::Object(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, child) in entries {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                // text chunks of mixed XML content answer to their element's name
                let child_name = if key == xml::TEXT_KEY { name } else { key.as_str() };
                out.push((
                    key.clone(),
                    walk(child, &child_path, child_name, ruleset, registry, options, report)?,
                ));
            }
            Ok(Node::Object(out))
        }
        Node::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, child) in items.iter().enumerate() {
                // root-level arrays are collections of records: the record
                // index contributes no path segment, so a CSV cell's path is
                // its column header
                let child_path = if path.is_empty() {
                    String::new()
                } else {
                    format!("{path}[{idx}]")
                };
                out.push(walk(child, &child_path, name, ruleset, registry, options, report)?);
            }
            Ok(Node::Array(out))
        }
        Node::Scalar(scalar) => {
            if path.is_empty() {
                // a bare scalar document has no addressable field
                return Ok(node.clone());
            }
            mask_scalar(scalar, path, name, ruleset, registry, options, report)
        }
    }
}

fn mask_scalar(
    scalar: &Scalar,
    path: &str,
    name: &str,
    ruleset: &RuleSet,
    registry: &mut ConsistencyRegistry,
    options: &EngineOptions,
    report: &mut MaskingReport,
) -> Result<Node> {
    let Some(rule) = ruleset.match_field(path, name) else {
        return Ok(Node::Scalar(scalar.clone()));
    };

    let ctx = FieldContext {
        name,
        path,
        scalar_type: scalar.scalar_type(),
    };

    match rule.generator().generate(scalar, &ctx, registry) {
        Ok(replacement) => {
            tracing::trace!(path, strategy = %rule.strategy(), "field masked");
            report.record_masked(rule.strategy());
            Ok(Node::Scalar(replacement))
        }
        Err(err) => match options.on_error {
            ErrorPolicy::Fail => Err(err.into()),
            ErrorPolicy::Fallback => {
                tracing::warn!(
                    path,
                    strategy = %rule.strategy(),
                    error = %err,
                    "masking failed, falling back to redaction token"
                );
                report.record_fallback(path, rule.strategy(), err.to_string());
                Ok(Node::Scalar(Scalar::String(options.fallback_token.clone())))
            }
        },
    }
}

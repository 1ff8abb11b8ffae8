//! Rule set and rule matching
//!
//! Rules are declared in configuration as (match_type, pattern, strategy,
//! options) and resolved here into compiled matchers and concrete value
//! generators. Resolution happens once per run; matching afterwards is a
//! pure function of (path, name, rule set).

use crate::anonymization::generators::{self, Generator, StrategyKind};
use crate::config::{MatchType, RuleConfig};
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fmt;

/// Identity of a rule within its rule set: the declaration index.
///
/// Used as the rule component of consistency-registry keys and fake-value
/// seeds, so two rules with identical patterns still map values
/// independently.
pub type RuleId = usize;

/// How a rule recognizes a field.
pub enum NameMatcher {
    /// Exact equality against the field's simple name
    Exact(String),
    /// Regular expression tested against the simple name, then the full path
    Pattern(Regex),
}

impl NameMatcher {
    /// Tests follow a fixed order: exact name equality, regex against the
    /// name, regex against the path. The first passing test wins.
    fn matches(&self, path: &str, name: &str) -> bool {
        match self {
            NameMatcher::Exact(expected) => expected == name,
            NameMatcher::Pattern(re) => re.is_match(name) || re.is_match(path),
        }
    }
}

impl fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMatcher::Exact(s) => write!(f, "Exact({s:?})"),
            NameMatcher::Pattern(re) => write!(f, "Pattern({:?})", re.as_str()),
        }
    }
}

/// One resolved masking rule.
pub struct Rule {
    id: RuleId,
    pattern: String,
    matcher: NameMatcher,
    generator: Box<dyn Generator>,
}

impl Rule {
    /// The rule's identity (declaration index).
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// The declared pattern, for reporting.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The resolved strategy.
    pub fn strategy(&self) -> StrategyKind {
        self.generator.kind()
    }

    /// The resolved value generator.
    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    /// Whether this rule applies to the field at (path, name).
    pub fn matches(&self, path: &str, name: &str) -> bool {
        self.matcher.matches(path, name)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("matcher", &self.matcher)
            .field("strategy", &self.strategy().as_str())
            .finish()
    }
}

/// Ordered, immutable collection of resolved rules.
///
/// Declaration order is precedence order: the first rule that matches a
/// field wins, which keeps precedence explicit and auditable.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set from loaded rule configurations.
    ///
    /// Compiles regex patterns and resolves strategy names into concrete
    /// generators. `seed` is mixed into every fake generator.
    ///
    /// # Errors
    ///
    /// Returns a [`VeilError::Config`] for an invalid regex, an unknown
    /// strategy, an unknown fake category, or an out-of-range option,
    /// naming the offending rule.
    pub fn from_config(configs: &[RuleConfig], seed: u64) -> Result<Self> {
        let mut rules = Vec::with_capacity(configs.len());

        for (id, config) in configs.iter().enumerate() {
            let matcher = match config.match_type {
                MatchType::Exact => NameMatcher::Exact(config.pattern.clone()),
                MatchType::Regex => {
                    let re = Regex::new(&config.pattern).map_err(|e| {
                        VeilError::Config(format!(
                            "rule #{}: invalid regex '{}': {e}",
                            id + 1,
                            config.pattern
                        ))
                    })?;
                    NameMatcher::Pattern(re)
                }
            };

            let generator = generators::resolve(id, config, seed).map_err(|e| match e {
                VeilError::Config(msg) => VeilError::Config(format!("rule #{}: {msg}", id + 1)),
                other => other,
            })?;

            rules.push(Rule {
                id,
                pattern: config.pattern.clone(),
                matcher,
                generator,
            });
        }

        Ok(Self { rules })
    }

    /// Find the applicable rule for a field, if any.
    ///
    /// First-in-declaration-order wins when several rules match.
    pub fn match_field(&self, path: &str, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(path, name))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over rules in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

//! Realistic fake-value strategy
//!
//! Replacements come from the `fake` crate, driven by a `StdRng` seeded from
//! the run seed, the rule identity, and the original value. Seeding from the
//! original makes independent runs byte-identical while the consistency
//! registry keeps repeated occurrences aligned within one run.

use super::{Generator, StrategyKind};
use crate::anonymization::registry::ConsistencyRegistry;
use crate::anonymization::rules::RuleId;
use crate::config::RuleOptions;
use crate::domain::context::FieldContext;
use crate::domain::errors::{MaskingError, VeilError};
use crate::domain::node::Scalar;
use crate::domain::result::Result;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{FreeEmail, IPv4, Username};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// How many reseeded attempts to make before giving up on producing a
/// replacement distinct from the original.
const MAX_ATTEMPTS: u64 = 16;

/// Semantic categories of generated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeCategory {
    Name,
    FirstName,
    LastName,
    Email,
    Username,
    Phone,
    Address,
    City,
    Company,
    Ssn,
    Date,
    Ipv4,
    Number,
    Text,
}

impl FakeCategory {
    /// Parse a configuration category name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "username" => Some(Self::Username),
            "phone" => Some(Self::Phone),
            "address" => Some(Self::Address),
            "city" => Some(Self::City),
            "company" => Some(Self::Company),
            "ssn" => Some(Self::Ssn),
            "date" => Some(Self::Date),
            "ipv4" => Some(Self::Ipv4),
            "number" => Some(Self::Number),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Username => "username",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Company => "company",
            Self::Ssn => "ssn",
            Self::Date => "date",
            Self::Ipv4 => "ipv4",
            Self::Number => "number",
            Self::Text => "text",
        }
    }

    fn sample(&self, rng: &mut StdRng) -> String {
        match self {
            Self::Name => Name().fake_with_rng(rng),
            Self::FirstName => FirstName().fake_with_rng(rng),
            Self::LastName => LastName().fake_with_rng(rng),
            Self::Email => FreeEmail().fake_with_rng(rng),
            Self::Username => Username().fake_with_rng(rng),
            Self::Phone => PhoneNumber().fake_with_rng(rng),
            Self::Address => {
                let number: String = BuildingNumber().fake_with_rng(rng);
                let street: String = StreetName().fake_with_rng(rng);
                format!("{number} {street}")
            }
            Self::City => CityName().fake_with_rng(rng),
            Self::Company => CompanyName().fake_with_rng(rng),
            Self::Ssn => format!(
                "{:03}-{:02}-{:04}",
                rng.gen_range(100..900),
                rng.gen_range(10..100),
                rng.gen_range(1000..10000)
            ),
            Self::Date => format!(
                "{:04}-{:02}-{:02}",
                rng.gen_range(1950..2005),
                rng.gen_range(1..13),
                rng.gen_range(1..29)
            ),
            Self::Ipv4 => IPv4().fake_with_rng(rng),
            // Number is shape-preserving and handled by the generator itself
            Self::Number => String::new(),
            Self::Text => Sentence(4..9).fake_with_rng(rng),
        }
    }
}

/// Generates realistic synthetic values of a configured category.
#[derive(Debug)]
pub struct FakeGenerator {
    rule_id: RuleId,
    category: FakeCategory,
    seed: u64,
    coerce: bool,
}

impl FakeGenerator {
    /// Build from rule options, validating the category name.
    pub fn from_options(rule_id: RuleId, options: &RuleOptions, seed: u64) -> Result<Self> {
        let name = options.category.as_deref().ok_or_else(|| {
            VeilError::Config("fake strategy requires an options.category".to_string())
        })?;
        let category = FakeCategory::parse(name).ok_or_else(|| {
            VeilError::Config(format!(
                "unknown fake category '{name}' (expected one of: name, first_name, \
                 last_name, email, username, phone, address, city, company, ssn, date, \
                 ipv4, number, text)"
            ))
        })?;
        Ok(Self {
            rule_id,
            category,
            seed,
            coerce: options.coerce,
        })
    }

    /// The configured category.
    pub fn category(&self) -> FakeCategory {
        self.category
    }

    fn rng_for(&self, lexical: &str, attempt: u64) -> StdRng {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update((self.rule_id as u64).to_le_bytes());
        hasher.update(lexical.as_bytes());
        hasher.update(attempt.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        StdRng::seed_from_u64(u64::from_le_bytes(bytes))
    }

    fn candidate(&self, rng: &mut StdRng, original: &Scalar, lexical: &str) -> Scalar {
        if self.category == FakeCategory::Number {
            let digits = numeric_replacement(rng, lexical);
            return match original {
                Scalar::Number(_) => match serde_json::Number::from_str(&digits) {
                    Ok(n) => Scalar::Number(n),
                    Err(_) => Scalar::String(digits),
                },
                _ => Scalar::String(digits),
            };
        }
        Scalar::String(self.category.sample(rng))
    }
}

impl Generator for FakeGenerator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fake
    }

    fn generate(
        &self,
        original: &Scalar,
        ctx: &FieldContext<'_>,
        registry: &mut ConsistencyRegistry,
    ) -> std::result::Result<Scalar, MaskingError> {
        let lexical = original.lexical();

        if let Some(existing) = registry.lookup(self.rule_id, &lexical) {
            return Ok(existing.clone());
        }

        // textual categories only fit string fields unless coercion is on;
        // the number category adapts to both strings and numbers
        let type_compatible = match original {
            Scalar::String(_) => true,
            Scalar::Number(_) => self.category == FakeCategory::Number,
            Scalar::Bool(_) | Scalar::Null => false,
        };
        if !type_compatible && !self.coerce {
            return Err(MaskingError::TypeMismatch {
                strategy: "fake",
                actual: original.scalar_type().to_string(),
                path: ctx.path.to_string(),
            });
        }

        for attempt in 0..MAX_ATTEMPTS {
            let mut rng = self.rng_for(&lexical, attempt);
            let candidate = self.candidate(&mut rng, original, &lexical);
            if candidate.lexical() != lexical {
                registry.record(self.rule_id, lexical, candidate.clone());
                return Ok(candidate);
            }
        }

        Err(MaskingError::NonIdentity {
            path: ctx.path.to_string(),
        })
    }
}

/// Generate a number with the same sign and digit shape as `lexical`.
///
/// Plain integers keep their digit count, plain decimals keep both the
/// integer and fraction digit counts. Anything else (scientific notation,
/// non-numeric text) falls back to an eight-digit integer.
fn numeric_replacement(rng: &mut StdRng, lexical: &str) -> String {
    let (sign, rest) = match lexical.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", lexical),
    };

    let body = if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
        random_digits(rng, rest.len())
    } else if let Some((int_part, frac_part)) = rest.split_once('.') {
        if !int_part.is_empty()
            && int_part.bytes().all(|b| b.is_ascii_digit())
            && !frac_part.is_empty()
            && frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            format!(
                "{}.{}",
                random_digits(rng, int_part.len()),
                uniform_digits(rng, frac_part.len())
            )
        } else {
            random_digits(rng, 8)
        }
    } else {
        random_digits(rng, 8)
    };

    format!("{sign}{body}")
}

/// Random digit string of the given length with no leading zero (unless the
/// length is one), preserving the original's length class.
fn random_digits(rng: &mut StdRng, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for i in 0..len {
        let digit = if i == 0 && len > 1 {
            rng.gen_range(1..10u8)
        } else {
            rng.gen_range(0..10u8)
        };
        out.push((b'0' + digit) as char);
    }
    out
}

/// Random digit string that may have leading zeros (fraction part).
fn uniform_digits(rng: &mut StdRng, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push((b'0' + rng.gen_range(0..10u8)) as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::ScalarType;

    fn generator(category: &str) -> FakeGenerator {
        FakeGenerator::from_options(
            1,
            &RuleOptions {
                category: Some(category.to_string()),
                ..RuleOptions::default()
            },
            42,
        )
        .unwrap()
    }

    fn ctx<'a>(scalar_type: ScalarType) -> FieldContext<'a> {
        FieldContext {
            name: "field",
            path: "record.field",
            scalar_type,
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = FakeGenerator::from_options(
            0,
            &RuleOptions {
                category: Some("quantum".to_string()),
                ..RuleOptions::default()
            },
            0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("quantum"));
    }

    #[test]
    fn test_missing_category_rejected() {
        let err = FakeGenerator::from_options(0, &RuleOptions::default(), 0).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let a = generator("name");
        let b = generator("name");
        let mut reg_a = ConsistencyRegistry::default();
        let mut reg_b = ConsistencyRegistry::default();
        let original = Scalar::String("John Doe".to_string());

        let out_a = a
            .generate(&original, &ctx(ScalarType::String), &mut reg_a)
            .unwrap();
        let out_b = b
            .generate(&original, &ctx(ScalarType::String), &mut reg_b)
            .unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = generator("name");
        let b = FakeGenerator::from_options(
            1,
            &RuleOptions {
                category: Some("name".to_string()),
                ..RuleOptions::default()
            },
            43,
        )
        .unwrap();
        let mut reg_a = ConsistencyRegistry::default();
        let mut reg_b = ConsistencyRegistry::default();
        let original = Scalar::String("John Doe".to_string());

        let out_a = a
            .generate(&original, &ctx(ScalarType::String), &mut reg_a)
            .unwrap();
        let out_b = b
            .generate(&original, &ctx(ScalarType::String), &mut reg_b)
            .unwrap();
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn test_registry_reuses_replacement() {
        let generator = generator("email");
        let mut registry = ConsistencyRegistry::default();
        let original = Scalar::String("a@x.com".to_string());

        let first = generator
            .generate(&original, &ctx(ScalarType::String), &mut registry)
            .unwrap();
        let second = generator
            .generate(&original, &ctx(ScalarType::String), &mut registry)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replacement_never_equals_original() {
        let generator = generator("email");
        let mut registry = ConsistencyRegistry::default();
        let original = Scalar::String("jane.doe@example.com".to_string());
        let out = generator
            .generate(&original, &ctx(ScalarType::String), &mut registry)
            .unwrap();
        assert_ne!(out, original);
    }

    #[test]
    fn test_number_category_preserves_integer_shape() {
        let generator = generator("number");
        let mut registry = ConsistencyRegistry::default();
        let original = Scalar::Number(serde_json::Number::from(12345));
        let out = generator
            .generate(&original, &ctx(ScalarType::Number), &mut registry)
            .unwrap();

        match out {
            Scalar::Number(n) => {
                let lexical = n.to_string();
                assert_eq!(lexical.len(), 5);
                assert_ne!(lexical, "12345");
            }
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_number_category_preserves_decimal_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let replacement = numeric_replacement(&mut rng, "12.50");
        let (int_part, frac_part) = replacement.split_once('.').unwrap();
        assert_eq!(int_part.len(), 2);
        assert_eq!(frac_part.len(), 2);
    }

    #[test]
    fn test_number_category_preserves_sign() {
        let mut rng = StdRng::seed_from_u64(7);
        let replacement = numeric_replacement(&mut rng, "-420");
        assert!(replacement.starts_with('-'));
        assert_eq!(replacement.len(), 4);
    }

    #[test]
    fn test_textual_category_on_number_is_type_mismatch() {
        let generator = generator("name");
        let mut registry = ConsistencyRegistry::default();
        let err = generator
            .generate(
                &Scalar::Number(serde_json::Number::from(30)),
                &ctx(ScalarType::Number),
                &mut registry,
            )
            .unwrap_err();
        assert!(matches!(err, MaskingError::TypeMismatch { .. }));
    }

    #[test]
    fn test_textual_category_on_number_with_coercion() {
        let generator = FakeGenerator::from_options(
            1,
            &RuleOptions {
                category: Some("name".to_string()),
                coerce: true,
                ..RuleOptions::default()
            },
            0,
        )
        .unwrap();
        let mut registry = ConsistencyRegistry::default();
        let out = generator
            .generate(
                &Scalar::Number(serde_json::Number::from(30)),
                &ctx(ScalarType::Number),
                &mut registry,
            )
            .unwrap();
        assert!(matches!(out, Scalar::String(_)));
    }

    #[test]
    fn test_date_category_shape() {
        let generator = generator("date");
        let mut registry = ConsistencyRegistry::default();
        let out = generator
            .generate(
                &Scalar::String("1984-06-01".to_string()),
                &ctx(ScalarType::String),
                &mut registry,
            )
            .unwrap();
        match out {
            Scalar::String(s) => {
                let parts: Vec<&str> = s.split('-').collect();
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0].len(), 4);
            }
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_ssn_category_shape() {
        let generator = generator("ssn");
        let mut registry = ConsistencyRegistry::default();
        let out = generator
            .generate(
                &Scalar::String("123-45-6789".to_string()),
                &ctx(ScalarType::String),
                &mut registry,
            )
            .unwrap();
        match out {
            Scalar::String(s) => {
                assert_eq!(s.len(), 11);
                assert_eq!(s.as_bytes()[3], b'-');
                assert_eq!(s.as_bytes()[6], b'-');
            }
            other => panic!("expected string, got {other:?}"),
        }
    }
}

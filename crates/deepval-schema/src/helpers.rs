//! # Helpers — Combinators for Common Shapes
//!
//! Functions that build [`Validation`]s. Each returns an ordinary predicate
//! rule closing over its arguments; the evaluator has no special support
//! for any of them.
//!
//! ```
//! use deepval_schema::helpers::{any, integer, mapping_of, sequence_of, string, structure_ref, token};
//! use deepval_schema::{Registry, Rule};
//!
//! let mut people = Registry::named("people");
//! people
//!     .define("person", Rule::fields()
//!         .field("id", token(32))
//!         .field("name", string(1..=100))
//!         .field("age", integer(1..=100))
//!         .field("colour", any(["red", "green", "blue"]))
//!         .field("tags", mapping_of([(token(..), string(..))]))
//!         .field("reviews", sequence_of(structure_ref("review"))))
//!     .define("review", Rule::fields().field("body", string(1..=1024)));
//! # assert!(people.contains("person"));
//! ```
//!
//! ## Size and Limit Arguments
//!
//! Size and limit arguments take anything that converts into a
//! [`Bound`]: `..` for no bound, a scalar for an exact match, a range, a
//! list of values, or a [`Limits`](deepval_core::Limits).

use deepval_core::{Bound, Kind, Value};
use regex::Regex;

use crate::rule::{Predicate, Rule};
use crate::validation::Validation;

fn check(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Validation {
    Validation::new(Rule::Predicate(Predicate::new(f)))
}

fn scoped(
    f: impl Fn(&Value, &crate::evaluate::Scope<'_>) -> bool + Send + Sync + 'static,
) -> Validation {
    Validation::new(Rule::Predicate(Predicate::scoped(f)))
}

fn length_within(text: &str, size: &Bound) -> bool {
    size.contains(&Value::from(text.chars().count()))
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Text whose length in characters satisfies `size`.
pub fn string(size: impl Into<Bound>) -> Validation {
    let size = size.into();
    check(move |d| d.as_text().is_some_and(|s| length_within(s, &size)))
}

/// Text made only of ASCII letters, digits, and underscores, whose length
/// satisfies `size`.
pub fn token(size: impl Into<Bound>) -> Validation {
    let size = size.into();
    check(move |d| {
        d.as_text().is_some_and(|s| {
            s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') && length_within(s, &size)
        })
    })
}

/// An integer satisfying `limit`.
pub fn integer(limit: impl Into<Bound>) -> Validation {
    of_kind(Kind::Integer, limit)
}

/// A float satisfying `limit`. Integers are not floats.
pub fn float(limit: impl Into<Bound>) -> Validation {
    of_kind(Kind::Float, limit)
}

/// A calendar date satisfying `limit`.
pub fn date(limit: impl Into<Bound>) -> Validation {
    of_kind(Kind::Date, limit)
}

/// A time of day satisfying `limit`.
pub fn time(limit: impl Into<Bound>) -> Validation {
    of_kind(Kind::Time, limit)
}

/// A UTC instant satisfying `limit`.
pub fn datetime(limit: impl Into<Bound>) -> Validation {
    of_kind(Kind::DateTime, limit)
}

fn of_kind(kind: Kind, limit: impl Into<Bound>) -> Validation {
    let limit = limit.into();
    check(move |d| kind.accepts(d) && limit.contains(d))
}

/// A value of `kind`, or of a kind that conforms to it.
pub fn instance_of(kind: Kind) -> Validation {
    check(move |d| kind.accepts(d))
}

/// Text that parses as JSON and whose length satisfies `size`.
pub fn json(size: impl Into<Bound>) -> Validation {
    let size = size.into();
    check(move |d| {
        d.as_text().is_some_and(|s| {
            serde_json::from_str::<serde_json::Value>(s).is_ok() && length_within(s, &size)
        })
    })
}

/// `true` or `false`.
pub fn boolean() -> Validation {
    any([true, false])
}

// ---------------------------------------------------------------------------
// Combinations
// ---------------------------------------------------------------------------

/// One option of [`any`]: a rule to try or a literal to compare against.
#[derive(Debug, Clone)]
pub enum Alternative {
    Rule(Validation),
    Literal(Value),
}

impl From<Validation> for Alternative {
    fn from(validation: Validation) -> Self {
        Alternative::Rule(validation)
    }
}

impl From<Rule> for Alternative {
    fn from(rule: Rule) -> Self {
        Alternative::Rule(rule.into())
    }
}

impl From<Regex> for Alternative {
    fn from(regex: Regex) -> Self {
        Alternative::Rule(regex.into())
    }
}

macro_rules! literal_alternatives {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Alternative {
                fn from(value: $t) -> Self {
                    Alternative::Literal(value.into())
                }
            }
        )*
    };
}

literal_alternatives!(Value, bool, i32, i64, f64, &str, String);

/// Disjunction or membership.
///
/// When every option is a rule, data is valid if at least one rule
/// accepts it. Otherwise data is valid if it equals one of the literal
/// options; rule options in a mixed list never match.
pub fn any<T, I>(options: I) -> Validation
where
    T: Into<Alternative>,
    I: IntoIterator<Item = T>,
{
    let options: Vec<Alternative> = options.into_iter().map(Into::into).collect();

    if options.iter().all(|o| matches!(o, Alternative::Rule(_))) {
        let rules: Vec<Validation> = options
            .into_iter()
            .filter_map(|o| match o {
                Alternative::Rule(v) => Some(v),
                Alternative::Literal(_) => None,
            })
            .collect();
        scoped(move |d, scope| rules.iter().any(|v| scope.valid(v, d)))
    } else {
        let literals: Vec<Value> = options
            .into_iter()
            .filter_map(|o| match o {
                Alternative::Literal(v) => Some(v),
                Alternative::Rule(_) => None,
            })
            .collect();
        check(move |d| literals.iter().any(|l| d.equals(l)))
    }
}

/// Conjunction: data is valid if every rule accepts it.
pub fn all<T, I>(options: I) -> Validation
where
    T: Into<Validation>,
    I: IntoIterator<Item = T>,
{
    let rules: Vec<Validation> = options.into_iter().map(Into::into).collect();
    scoped(move |d, scope| rules.iter().all(|v| scope.valid(v, d)))
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// Any mapping.
pub fn mapping() -> Validation {
    instance_of(Kind::Mapping)
}

/// A mapping whose every key and value satisfy an example pair.
///
/// Only the first pair of `example` is used: it is the rule for every
/// entry, not a per-key description. An empty example accepts any mapping.
pub fn mapping_of<K, V, I>(example: I) -> Validation
where
    K: Into<Validation>,
    V: Into<Validation>,
    I: IntoIterator<Item = (K, V)>,
{
    let Some((key_rule, value_rule)) = example.into_iter().next() else {
        return mapping();
    };
    let key_rule = key_rule.into();
    let value_rule = value_rule.into();
    scoped(move |d, scope| {
        d.as_mapping().is_some_and(|map| {
            map.iter()
                .all(|(k, v)| scope.valid(&key_rule, k) && scope.valid(&value_rule, v))
        })
    })
}

/// Any sequence.
pub fn sequence() -> Validation {
    instance_of(Kind::Sequence)
}

/// A sequence whose every element satisfies `rule`.
pub fn sequence_of(rule: impl Into<Validation>) -> Validation {
    let rule = rule.into();
    scoped(move |d, scope| {
        d.as_sequence()
            .is_some_and(|items| items.iter().all(|item| scope.valid(&rule, item)))
    })
}

/// The registry entry called `name`, resolved when evaluated.
///
/// This is how a structure refers to itself or to an entry defined after
/// it.
pub fn structure_ref(name: impl Into<String>) -> Validation {
    Validation::new(Rule::reference(name))
}

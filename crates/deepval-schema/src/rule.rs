//! # Rules — What Must Hold
//!
//! A [`Rule`] is a closed set of variants; the evaluator matches on it
//! exhaustively. Combinators in [`crate::helpers`] are constructors that
//! almost always produce [`Rule::Predicate`] closing over their arguments.
//!
//! ## Variants
//!
//! | Variant     | Matches when                                               |
//! |-------------|------------------------------------------------------------|
//! | `Literal`   | data equals the value                                      |
//! | `Pattern`   | data is text and the regex finds a match in it             |
//! | `Structure` | data is a mapping and every listed key passes its rule     |
//! | `Predicate` | the function returns true                                  |
//! | `Reference` | the registry entry with that name matches                  |
//! | `Deferred`  | the rule computed from the top-level data matches          |
//! | `Absent`    | the enclosing mapping does not contain the key             |
//!
//! Patterns are not anchored implicitly: `[a-z]+` matches `"ab12"`. Anchor
//! with `^...$` to require the whole text to match.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use deepval_core::{SchemaError, Value};
use regex::Regex;

use crate::evaluate::Scope;
use crate::validation::Validation;

/// Per-key rules of a [`Rule::Structure`]. Keys not listed are unconstrained.
pub type Structure = BTreeMap<Value, Validation>;

type PredicateFn = dyn Fn(&Value, &Scope<'_>) -> bool + Send + Sync;
type ResolverFn = dyn Fn(&Value) -> Validation + Send + Sync;

/// A condition data must satisfy.
#[derive(Clone, Debug)]
pub enum Rule {
    Literal(Value),
    Pattern(Regex),
    Structure(Structure),
    Predicate(Predicate),
    /// Name of a registry entry, resolved at evaluation time.
    Reference(String),
    /// Rule computed from the top-level data at evaluation time.
    Deferred(Resolver),
    Absent,
}

impl Rule {
    pub fn literal(value: impl Into<Value>) -> Self {
        Rule::Literal(value.into())
    }

    /// Compile a pattern rule.
    pub fn pattern(pattern: &str) -> Result<Self, SchemaError> {
        Regex::new(pattern)
            .map(Rule::Pattern)
            .map_err(|e| SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build a structure rule from `(key, rule)` pairs.
    pub fn structure<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Validation>,
        I: IntoIterator<Item = (K, V)>,
    {
        Rule::Structure(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Start a structure rule whose fields have different rule types.
    pub fn fields() -> StructureBuilder {
        StructureBuilder::default()
    }

    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Rule::Predicate(Predicate::new(f))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Rule::Reference(name.into())
    }

    /// A rule chosen per evaluation from the top-level data.
    ///
    /// The resolver always receives the data passed to the outermost
    /// `valid` call, even when the rule sits several structures deep.
    pub fn deferred(f: impl Fn(&Value) -> Validation + Send + Sync + 'static) -> Self {
        Rule::Deferred(Resolver::new(f))
    }

    /// Short variant name, used in logs.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Rule::Literal(_) => "literal",
            Rule::Pattern(_) => "pattern",
            Rule::Structure(_) => "structure",
            Rule::Predicate(_) => "predicate",
            Rule::Reference(_) => "reference",
            Rule::Deferred(_) => "deferred",
            Rule::Absent => "absent",
        }
    }
}

impl From<Value> for Rule {
    fn from(value: Value) -> Self {
        Rule::Literal(value)
    }
}

impl From<Regex> for Rule {
    fn from(regex: Regex) -> Self {
        Rule::Pattern(regex)
    }
}

impl From<Structure> for Rule {
    fn from(structure: Structure) -> Self {
        Rule::Structure(structure)
    }
}

impl From<Predicate> for Rule {
    fn from(predicate: Predicate) -> Self {
        Rule::Predicate(predicate)
    }
}

macro_rules! literal_rules {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Rule {
                fn from(value: $t) -> Self {
                    Rule::Literal(value.into())
                }
            }
        )*
    };
}

literal_rules!(bool, i32, i64, f64, &str, String);

/// A boolean check over a value.
///
/// Predicates receive the evaluation [`Scope`] so that combinators can
/// evaluate nested validations (including registry references) against
/// parts of the data.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wrap a plain check that needs no evaluation context.
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::scoped(move |data, _| f(data))
    }

    /// Wrap a check that evaluates nested rules through the scope.
    pub fn scoped(f: impl Fn(&Value, &Scope<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, data: &Value, scope: &Scope<'_>) -> bool {
        (self.0)(data, scope)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Computes the rule of a [`Rule::Deferred`] from the top-level data.
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    pub fn new(f: impl Fn(&Value) -> Validation + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn resolve(&self, root: &Value) -> Validation {
        (self.0)(root)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// Fluent construction of a [`Rule::Structure`].
#[derive(Debug, Clone, Default)]
pub struct StructureBuilder {
    entries: Structure,
}

impl StructureBuilder {
    /// Constrain `key` with `rule`. A later call for the same key replaces
    /// the earlier one.
    pub fn field(mut self, key: impl Into<Value>, rule: impl Into<Validation>) -> Self {
        self.entries.insert(key.into(), rule.into());
        self
    }

    /// Require `key` to be missing from the data.
    pub fn absent(self, key: impl Into<Value>) -> Self {
        self.field(key, Rule::Absent)
    }

    pub fn build(self) -> Rule {
        Rule::Structure(self.entries)
    }
}

impl From<StructureBuilder> for Rule {
    fn from(builder: StructureBuilder) -> Self {
        builder.build()
    }
}

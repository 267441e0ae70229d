//! # Evaluator — Recursive Rule Dispatch
//!
//! Walks a [`Validation`] against a [`Value`] and answers with a boolean.
//! Evaluation is total: a rule that does not fit the shape of the data
//! (a pattern against an integer, a structure against a list) is simply
//! not satisfied. Nothing here returns an error or panics on bad data.
//!
//! ## Scope
//!
//! A [`Scope`] carries the two pieces of context that stay fixed for the
//! whole recursion tree of one top-level call:
//!
//! - the registry that [`Rule::Reference`] names resolve against, which is
//!   the registry of the schema that declared the rule being checked, and
//! - the top-level data handed to every [`Rule::Deferred`] resolver.
//!
//! Deferred resolvers see the top-level data at every depth, not the
//! sub-value under check. Rules written against this crate rely on that:
//! a nested field can be made conditional on a sibling of its parent.
//!
//! ## Missing Keys
//!
//! Inside a structure the value for a key may be missing. The subject is
//! therefore an `Option<&Value>`:
//!
//! - `Absent` passes only when it is missing.
//! - `Pattern` and `Structure` fail when it is missing.
//! - `Literal` and `Predicate` see a missing value as `Null`.
//!
//! ## Structure Entries
//!
//! For each `(key, validation)` pair the entry is checked in this order:
//! an optional validation passes on a missing key; a deferred rule is
//! resolved and its result checked as the entry; a reference is replaced by
//! the registry entry (whose own options then apply); anything else is
//! dispatched on the key's value. The pairs are combined with AND and the
//! check stops at the first failing pair.
//!
//! There is no cycle detection. A reference chain that never reaches a
//! concrete rule recurses without bound.

use deepval_core::{Mapping, Value};

use crate::registry::Registry;
use crate::rule::{Resolver, Rule, Structure};
use crate::validation::Validation;

static NULL: Value = Value::Null;

/// Context of one top-level evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    registry: Option<&'a Registry>,
    root: &'a Value,
}

impl<'a> Scope<'a> {
    /// A scope without a registry: every reference fails.
    pub fn new(root: &'a Value) -> Self {
        Self {
            registry: None,
            root,
        }
    }

    pub fn with_registry(registry: &'a Registry, root: &'a Value) -> Self {
        Self {
            registry: Some(registry),
            root,
        }
    }

    /// The data of the top-level call.
    pub fn root(&self) -> &'a Value {
        self.root
    }

    pub fn registry(&self) -> Option<&'a Registry> {
        self.registry
    }

    /// Check `data` against `validation` within this scope.
    pub fn valid(&self, validation: &Validation, data: &Value) -> bool {
        self.check(validation.rule(), Some(data))
    }

    /// Check `data` against a bare rule within this scope.
    pub fn matches(&self, rule: &Rule, data: &Value) -> bool {
        self.check(rule, Some(data))
    }

    fn check(&self, rule: &Rule, subject: Option<&Value>) -> bool {
        match rule {
            Rule::Literal(expected) => subject.unwrap_or(&NULL).equals(expected),
            Rule::Pattern(regex) => subject
                .and_then(Value::as_text)
                .is_some_and(|text| regex.is_match(text)),
            Rule::Structure(structure) => self.match_structure(structure, subject),
            Rule::Predicate(predicate) => predicate.call(subject.unwrap_or(&NULL), self),
            Rule::Reference(name) => self
                .lookup(name)
                .is_some_and(|target| self.check(target.rule(), subject)),
            Rule::Deferred(resolver) => {
                let resolved = self.resolve(resolver);
                self.check(resolved.rule(), subject)
            }
            Rule::Absent => subject.is_none(),
        }
    }

    fn match_structure(&self, structure: &Structure, subject: Option<&Value>) -> bool {
        let Some(map) = subject.and_then(Value::as_mapping) else {
            return false;
        };
        structure
            .iter()
            .all(|(key, entry)| self.match_entry(map, key, entry))
    }

    fn match_entry(&self, map: &Mapping, key: &Value, entry: &Validation) -> bool {
        let value = map.get(key);
        if entry.is_optional() && value.is_none() {
            return true;
        }
        match entry.rule() {
            Rule::Deferred(resolver) => self.match_entry(map, key, &self.resolve(resolver)),
            Rule::Reference(name) => self
                .lookup(name)
                .is_some_and(|target| self.match_entry(map, key, target)),
            rule => self.check(rule, value),
        }
    }

    fn resolve(&self, resolver: &Resolver) -> Validation {
        let resolved = resolver.resolve(self.root);
        tracing::trace!(
            resolved = resolved.rule().variant_name(),
            optional = resolved.is_optional(),
            "resolved deferred rule"
        );
        resolved
    }

    fn lookup(&self, name: &str) -> Option<&'a Validation> {
        let Some(registry) = self.registry else {
            tracing::debug!(name, "rule reference evaluated without a registry");
            return None;
        };
        let target = registry.definition(name);
        if target.is_none() {
            tracing::warn!(schema = %registry.schema(), name, "unresolved rule reference");
        }
        target
    }
}

/// Check `data` against `validation` without a registry.
pub fn valid(validation: &Validation, data: &Value) -> bool {
    Scope::new(data).valid(validation, data)
}

/// Check `data` against `validation` as a rule declared in `registry`'s
/// schema: its references resolve there.
pub fn valid_with(registry: &Registry, validation: &Validation, data: &Value) -> bool {
    Scope::with_registry(registry, data).valid(validation, data)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            (-1.0e6f64..1.0e6).prop_map(Value::Float),
        ]
    }

    fn document() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![scalar(), "[a-z0-9]{0,8}".prop_map(Value::Text)];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                prop::collection::btree_map("[a-c]".prop_map(Value::Text), inner, 0..4)
                    .prop_map(Value::Mapping),
            ]
        })
    }

    proptest! {
        /// Text matching the pattern validates.
        #[test]
        fn matching_text_validates(s in "[a-z]{1,16}") {
            let v = Validation::new(Rule::pattern("^[a-z]+$").unwrap());
            prop_assert!(valid(&v, &Value::Text(s)));
        }

        /// Non-text never validates against a pattern.
        #[test]
        fn non_text_never_matches_pattern(d in scalar()) {
            let v = Validation::new(Rule::pattern(".*").unwrap());
            prop_assert!(!valid(&v, &d));
        }

        /// The empty structure accepts exactly the mappings.
        #[test]
        fn empty_structure_accepts_mappings(d in document()) {
            let v = Validation::new(Rule::fields());
            prop_assert_eq!(valid(&v, &d), d.as_mapping().is_some());
        }

        /// Evaluation is pure: the same inputs give the same answer.
        #[test]
        fn evaluation_is_idempotent(d in document()) {
            let v = Validation::new(
                Rule::fields()
                    .field("a", Validation::predicate(|x| x.as_text().is_some()).optional())
                    .field("b", None::<Rule>),
            );
            prop_assert_eq!(valid(&v, &d), valid(&v, &d));
        }
    }
}

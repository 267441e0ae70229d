//! # Validation — A Rule Plus Options
//!
//! `Validation` is the unit stored in a [`Registry`](crate::Registry) and
//! nested inside structure rules. It wraps exactly one [`Rule`] and a
//! [`ValidationOptions`] set.
//!
//! ## Construction
//!
//! Anything that converts into a `Rule` converts into a `Validation` with
//! default options, so raw rules and validations are interchangeable at
//! definition sites. `None` converts into an `Absent` validation, which is
//! how "this key must not be present" is spelled inside a structure.
//!
//! [`ValidationBuilder`] accepts a rule, a predicate, or both. When both are
//! supplied, a pattern, structure, reference, deferred, or absent rule wins
//! over the predicate; a literal loses to it.

use deepval_core::{SchemaError, Value};
use regex::Regex;
use serde::Deserialize;

use crate::evaluate::Scope;
use crate::registry::Registry;
use crate::rule::{Predicate, Rule, Structure, StructureBuilder};

/// Options attached to a [`Validation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Inside a structure, a missing key passes. A key that is present is
    /// still checked, including an explicit null.
    pub optional: bool,
}

/// A rule with options.
#[derive(Debug, Clone)]
pub struct Validation {
    rule: Rule,
    options: ValidationOptions,
}

impl Validation {
    pub fn new(rule: impl Into<Rule>) -> Self {
        Self::with_options(rule, ValidationOptions::default())
    }

    pub fn with_options(rule: impl Into<Rule>, options: ValidationOptions) -> Self {
        Self {
            rule: rule.into(),
            options,
        }
    }

    pub fn builder() -> ValidationBuilder {
        ValidationBuilder::default()
    }

    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::new(Rule::predicate(f))
    }

    /// Passes only when the enclosing mapping lacks the key.
    pub fn absent() -> Self {
        Self::new(Rule::Absent)
    }

    /// Mark this validation optional.
    pub fn optional(mut self) -> Self {
        self.options.optional = true;
        self
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn is_optional(&self) -> bool {
        self.options.optional
    }

    /// Check `data` without a registry. References evaluate to false; check
    /// a registry [`Entry`](crate::Entry) instead to resolve them.
    pub fn valid(&self, data: &Value) -> bool {
        Scope::new(data).valid(self, data)
    }

    /// Check `data` as a rule declared in `registry`'s schema.
    pub fn valid_in(&self, registry: &Registry, data: &Value) -> bool {
        registry.validate(self, data)
    }
}

impl From<Rule> for Validation {
    fn from(rule: Rule) -> Self {
        Self::new(rule)
    }
}

impl<T: Into<Validation>> From<Option<T>> for Validation {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Validation::absent, Into::into)
    }
}

macro_rules! into_validation {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Validation {
                fn from(value: $t) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

into_validation!(
    Value,
    Regex,
    Structure,
    StructureBuilder,
    Predicate,
    bool,
    i32,
    i64,
    f64,
    &str,
    String,
);

/// Builds a [`Validation`] from a rule, a predicate, or both.
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    rule: Option<Rule>,
    predicate: Option<Predicate>,
    options: ValidationOptions,
}

impl ValidationBuilder {
    pub fn rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn predicate(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Predicate::new(f));
        self
    }

    pub fn options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.options.optional = optional;
        self
    }

    /// # Errors
    ///
    /// Returns [`SchemaError::MissingRule`] when neither a rule nor a
    /// predicate was supplied.
    pub fn build(self) -> Result<Validation, SchemaError> {
        let rule = match (self.rule, self.predicate) {
            (None, None) => return Err(SchemaError::MissingRule),
            (None, Some(predicate)) | (Some(Rule::Literal(_)), Some(predicate)) => {
                Rule::Predicate(predicate)
            }
            (Some(rule), _) => rule,
        };
        Ok(Validation::with_options(rule, self.options))
    }
}

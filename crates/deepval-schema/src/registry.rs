//! # Registry — Named Validations of One Schema
//!
//! A `Registry` maps names to [`Validation`]s. It is filled during schema
//! definition and read during evaluation; the borrow checker keeps the two
//! phases apart, since `define` takes `&mut self` and evaluation borrows
//! the registry shared for its whole recursion tree.
//!
//! ## Binding
//!
//! [`Rule::Reference`](crate::Rule::Reference) carries a name, never a resolved entry. Names are
//! looked up when the reference is evaluated, so an entry may refer to
//! itself, to an entry defined after it, or to an entry that refers back to
//! it. The only requirement is that every referenced name is defined before
//! evaluation reaches the reference.
//!
//! A reference resolves against the registry of the schema that declared
//! it, and there is no lookup across schemas. Entries leave a registry only
//! as an [`Entry`], which keeps the registry it came from; checking an
//! entry always resolves its references there, so two schemas may define
//! the same name differently without interfering.
//!
//! ## Schema Types
//!
//! The [`Schema`] trait attaches a registry definition to a type, for code
//! that prefers `People::registry()` over passing a registry value around.

use std::collections::BTreeMap;

use deepval_core::{SchemaError, Value};

use crate::evaluate::Scope;
use crate::rule::Rule;
use crate::validation::{Validation, ValidationOptions};

/// Named validations of one schema.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schema: String,
    definitions: BTreeMap<String, Validation>,
}

impl Registry {
    /// An empty, unnamed registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry for the schema called `schema`. The name appears
    /// in lookup errors and log events.
    pub fn named(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            definitions: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Store `rule` under `name`, replacing any earlier entry.
    pub fn define(&mut self, name: impl Into<String>, rule: impl Into<Validation>) -> &mut Self {
        let name = name.into();
        let validation = rule.into();
        tracing::debug!(
            schema = %self.schema,
            name = %name,
            rule = validation.rule().variant_name(),
            "defining rule"
        );
        if self.definitions.insert(name, validation).is_some() {
            tracing::debug!(schema = %self.schema, "replaced earlier definition");
        }
        self
    }

    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownName`] if `name` was never defined.
    pub fn lookup(&self, name: &str) -> Result<Entry<'_>, SchemaError> {
        self.get(name).ok_or_else(|| SchemaError::UnknownName {
            schema: self.schema.clone(),
            name: name.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<Entry<'_>> {
        self.definitions
            .get_key_value(name)
            .map(|(name, validation)| Entry {
                registry: self,
                name,
                validation,
            })
    }

    /// The stored validation for `name`, for reference resolution.
    pub(crate) fn definition(&self, name: &str) -> Option<&Validation> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Defined names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Check `data` against the entry called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownName`] if `name` was never defined.
    /// Names reached through references during evaluation do not error;
    /// an undefined one makes its rule fail.
    pub fn valid(&self, name: &str, data: &Value) -> Result<bool, SchemaError> {
        Ok(self.lookup(name)?.valid(data))
    }

    /// Check `data` against a validation declared in this schema but not
    /// stored under a name. Its references resolve here.
    pub fn validate(&self, validation: &Validation, data: &Value) -> bool {
        Scope::with_registry(self, data).valid(validation, data)
    }
}

/// A defined validation together with the registry that defined it.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    registry: &'a Registry,
    name: &'a str,
    validation: &'a Validation,
}

impl<'a> Entry<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Name of the schema the entry belongs to.
    pub fn schema(&self) -> &'a str {
        self.registry.schema()
    }

    pub fn rule(&self) -> &'a Rule {
        self.validation.rule()
    }

    pub fn options(&self) -> &'a ValidationOptions {
        self.validation.options()
    }

    pub fn is_optional(&self) -> bool {
        self.validation.is_optional()
    }

    /// Check `data`. References resolve in the defining registry.
    pub fn valid(&self, data: &Value) -> bool {
        self.registry.validate(self.validation, data)
    }
}

/// A type that owns a registry definition.
pub trait Schema {
    /// Schema name used for the registry.
    const NAME: &'static str;

    /// Populate `registry` with this schema's rules.
    fn define(registry: &mut Registry);

    /// Build the registry.
    fn registry() -> Registry {
        let mut registry = Registry::named(Self::NAME);
        Self::define(&mut registry);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::structure_ref;

    fn sample() -> Registry {
        let mut registry = Registry::named("sample");
        registry
            .define("self_reference", structure_ref("regexp"))
            .define("regexp", Rule::pattern("[a-z]+").unwrap())
            .define(
                "manual",
                Validation::predicate(|d| d.as_integer().is_some_and(|n| n > 10)),
            )
            .define("literal", "x")
            .define("hash", Rule::structure([("key", "val")]));
        registry
    }

    #[test]
    fn test_entries_are_accessible() {
        let registry = sample();
        for name in ["regexp", "manual", "literal", "hash"] {
            assert!(registry.contains(name), "{name}");
            assert!(registry.lookup(name).is_ok(), "{name}");
        }
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_entries_validate() {
        let registry = sample();
        assert_eq!(registry.valid("regexp", &Value::from("abc")), Ok(true));
        assert_eq!(registry.valid("manual", &Value::from(11)), Ok(true));
        assert_eq!(registry.valid("literal", &Value::from("x")), Ok(true));
        assert_eq!(
            registry.valid("hash", &Value::mapping([("key", "val")])),
            Ok(true)
        );
    }

    #[test]
    fn test_reference_defined_before_target() {
        let registry = sample();
        assert_eq!(registry.valid("self_reference", &Value::from("abc")), Ok(true));
        assert_eq!(registry.valid("self_reference", &Value::from("123")), Ok(false));
    }

    #[test]
    fn test_unknown_name() {
        let registry = sample();
        assert_eq!(
            registry.valid("nope", &Value::Null),
            Err(SchemaError::UnknownName {
                schema: "sample".to_string(),
                name: "nope".to_string(),
            })
        );
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_last_definition_wins() {
        let mut registry = Registry::new();
        registry.define("x", 1).define("x", 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.valid("x", &Value::from(2)), Ok(true));
        assert_eq!(registry.valid("x", &Value::from(1)), Ok(false));
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = sample();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["hash", "literal", "manual", "regexp", "self_reference"]);
    }

    #[test]
    fn test_raw_rules_are_wrapped() {
        let registry = sample();
        let literal = registry.lookup("literal").unwrap();
        assert!(!literal.is_optional());
        assert!(matches!(literal.rule(), Rule::Literal(_)));
    }

    fn letters_and_digits() -> (Registry, Registry) {
        let mut letters = Registry::named("letters");
        letters
            .define("word", Rule::pattern("^[a-z]+$").unwrap())
            .define("entry", structure_ref("word"));
        let mut digits = Registry::named("digits");
        digits
            .define("word", Rule::pattern("^[0-9]+$").unwrap())
            .define("entry", structure_ref("word"))
            .define("only_here", structure_ref("word"));
        (letters, digits)
    }

    #[test]
    fn test_same_name_resolves_in_declaring_registry() {
        let (letters, digits) = letters_and_digits();
        assert_eq!(letters.valid("entry", &Value::from("abc")), Ok(true));
        assert_eq!(letters.valid("entry", &Value::from("123")), Ok(false));
        assert_eq!(digits.valid("entry", &Value::from("123")), Ok(true));
        assert_eq!(digits.valid("entry", &Value::from("abc")), Ok(false));
    }

    #[test]
    fn test_entry_keeps_its_registry() {
        let (letters, digits) = letters_and_digits();
        let entry = digits.lookup("entry").unwrap();
        assert_eq!(entry.schema(), "digits");
        assert_eq!(entry.name(), "entry");
        assert!(entry.valid(&Value::from("123")));
        assert!(!entry.valid(&Value::from("abc")));

        // Still bound to `digits` after `letters` is consulted.
        assert!(letters.lookup("entry").unwrap().valid(&Value::from("abc")));
        assert!(entry.valid(&Value::from("123")));
    }

    #[test]
    fn test_no_lookup_across_registries() {
        let (letters, digits) = letters_and_digits();
        assert!(digits.get("only_here").is_some());
        assert!(matches!(
            letters.valid("only_here", &Value::from("123")),
            Err(SchemaError::UnknownName { .. })
        ));
    }

    struct Sample;

    impl Schema for Sample {
        const NAME: &'static str = "sample";

        fn define(registry: &mut Registry) {
            registry.define("literal", "x");
        }
    }

    #[test]
    fn test_schema_trait_builds_registry() {
        let registry = Sample::registry();
        assert_eq!(registry.schema(), "sample");
        assert_eq!(registry.valid("literal", &Value::from("x")), Ok(true));
    }
}

//! Integration test: whole schemas built from helpers and named references.
//!
//! Covers the person/review schema (an entry referring to a sibling that is
//! defined after it), mutually recursive entries, conditional fields, YAML
//! fixtures, and read-only evaluation from several threads.

use deepval_schema::helpers::{any, integer, sequence_of, string, structure_ref, token};
use deepval_schema::{Registry, Rule, Schema, Validation, Value};
use serde_json::json;

struct People;

impl Schema for People {
    const NAME: &'static str = "people";

    fn define(registry: &mut Registry) {
        registry.define(
            "person",
            Rule::fields()
                .field("id", token(32))
                .field("age", integer(1..=100))
                .field("name", string(1..=100))
                .field(
                    "department",
                    Rule::fields()
                        .field("name", any(["sales", "accounting", "engineering"]))
                        .field("building", integer(..)),
                )
                .field("performance_reviews", sequence_of(structure_ref("review"))),
        );

        // Referenced by "person" above.
        registry.define(
            "review",
            Rule::fields()
                .field("author", string(1..=100))
                .field("body", string(1..=1024)),
        );
    }
}

fn person(first_author: serde_json::Value) -> Value {
    Value::from(json!({
        "id": "x".repeat(32),
        "age": 22,
        "name": "Bob Jones",
        "department": {"name": "sales", "building": 33},
        "performance_reviews": [
            {"author": first_author, "body": "a review"},
            {"author": "bill", "body": "another review"}
        ]
    }))
}

#[test]
fn test_person_with_forward_reference() {
    let registry = People::registry();
    assert_eq!(registry.valid("person", &person(json!("joe"))), Ok(true));
    assert_eq!(registry.valid("person", &person(json!(11))), Ok(false));
}

#[test]
fn test_definition_order_does_not_matter() {
    let mut registry = Registry::named("reversed");
    registry.define(
        "review",
        Rule::fields()
            .field("author", string(1..=100))
            .field("body", string(1..=1024)),
    );
    registry.define(
        "person",
        Rule::fields().field("performance_reviews", sequence_of(structure_ref("review"))),
    );
    assert_eq!(registry.valid("person", &person(json!("joe"))), Ok(true));
    assert_eq!(registry.valid("person", &person(json!(11))), Ok(false));
}

#[test]
fn test_person_rejects_bad_department() {
    let registry = People::registry();
    let mut doc = json!({
        "id": "x".repeat(32),
        "age": 22,
        "name": "Bob Jones",
        "department": {"name": "marketing", "building": 33},
        "performance_reviews": []
    });
    assert_eq!(registry.valid("person", &Value::from(doc.clone())), Ok(false));

    doc["department"]["name"] = json!("engineering");
    assert_eq!(registry.valid("person", &Value::from(doc.clone())), Ok(true));

    doc["department"] = json!("engineering");
    assert_eq!(registry.valid("person", &Value::from(doc)), Ok(false));
}

#[test]
fn test_validation_is_idempotent() {
    let registry = People::registry();
    let good = person(json!("joe"));
    let bad = person(json!(11));
    for _ in 0..3 {
        assert_eq!(registry.valid("person", &good), Ok(true));
        assert_eq!(registry.valid("person", &bad), Ok(false));
    }
}

#[test]
fn test_entry_checks_without_naming_the_registry_again() {
    let registry = People::registry();
    let person_rule = registry.lookup("person").unwrap();
    assert!(person_rule.valid(&person(json!("joe"))));
    assert!(!person_rule.valid(&person(json!(11))));
}

// ---- schemas sharing names ----

struct Lowercase;

impl Schema for Lowercase {
    const NAME: &'static str = "lowercase";

    fn define(registry: &mut Registry) {
        registry
            .define("item", Rule::pattern("^[a-z]+$").unwrap())
            .define("list", sequence_of(structure_ref("item")));
    }
}

struct Numeric;

impl Schema for Numeric {
    const NAME: &'static str = "numeric";

    fn define(registry: &mut Registry) {
        registry
            .define("item", integer(..))
            .define("list", sequence_of(structure_ref("item")));
    }
}

#[test]
fn test_schemas_with_the_same_names_stay_apart() {
    let lowercase = Lowercase::registry();
    let numeric = Numeric::registry();
    let words = Value::from(json!(["ab", "cd"]));
    let numbers = Value::from(json!([1, 2, 3]));

    assert_eq!(lowercase.valid("list", &words), Ok(true));
    assert_eq!(lowercase.valid("list", &numbers), Ok(false));
    assert_eq!(numeric.valid("list", &numbers), Ok(true));
    assert_eq!(numeric.valid("list", &words), Ok(false));

    let numeric_list = numeric.lookup("list").unwrap();
    assert!(numeric_list.valid(&numbers));
    assert!(!numeric_list.valid(&words));
}

// ---- recursion ----

#[test]
fn test_self_referencing_tree() {
    let mut registry = Registry::named("tree");
    registry.define(
        "node",
        Rule::fields()
            .field("label", string(1..))
            .field("children", sequence_of(structure_ref("node")).optional()),
    );

    let tree = Value::from(json!({
        "label": "root",
        "children": [
            {"label": "a"},
            {"label": "b", "children": [{"label": "b1", "children": []}]}
        ]
    }));
    assert_eq!(registry.valid("node", &tree), Ok(true));

    let broken = Value::from(json!({
        "label": "root",
        "children": [{"label": "b", "children": [{"label": ""}]}]
    }));
    assert_eq!(registry.valid("node", &broken), Ok(false));
}

#[test]
fn test_mutually_recursive_entries() {
    let mut registry = Registry::named("expr");
    registry
        .define(
            "expr",
            any([
                integer(..),
                Validation::new(Rule::fields().field("sum", structure_ref("terms"))),
            ]),
        )
        .define("terms", sequence_of(structure_ref("expr")));

    let nested = Value::from(json!({"sum": [1, {"sum": [2, 3]}, 4]}));
    assert_eq!(registry.valid("expr", &nested), Ok(true));

    let bad = Value::from(json!({"sum": [1, {"sum": ["two"]}]}));
    assert_eq!(registry.valid("expr", &bad), Ok(false));
}

// ---- conditional fields ----

#[test]
fn test_pension_only_for_seniors() {
    let mut registry = Registry::named("pensions");
    registry.define(
        "record",
        Rule::fields().field("age", integer(..)).field(
            "pension",
            Rule::deferred(|root| {
                let senior = root
                    .field("age")
                    .and_then(Value::as_integer)
                    .is_some_and(|age| age > 50);
                if senior {
                    integer(..)
                } else {
                    Validation::absent()
                }
            }),
        ),
    );

    let check = |doc: serde_json::Value| registry.valid("record", &Value::from(doc));
    assert_eq!(check(json!({"age": 61, "pension": 666})), Ok(true));
    assert_eq!(check(json!({"age": 22})), Ok(true));
    assert_eq!(check(json!({"age": 22, "pension": 666})), Ok(false));
    assert_eq!(check(json!({"age": 61})), Ok(false));
}

// ---- fixtures ----

#[test]
fn test_yaml_document_with_integer_keys() {
    let mut registry = Registry::named("floors");
    registry.define(
        "building",
        Rule::fields()
            .field("name", string(1..))
            .field(1, string(..))
            .field(2, Rule::Absent),
    );

    let doc = Value::from_yaml_str("name: HQ\n1: lobby\n").unwrap();
    assert_eq!(registry.valid("building", &doc), Ok(true));

    let doc = Value::from_yaml_str("name: HQ\n1: lobby\n2: offices\n").unwrap();
    assert_eq!(registry.valid("building", &doc), Ok(false));

    let raw: serde_yaml::Value = serde_yaml::from_str("name: HQ\n'1': lobby\n").unwrap();
    assert_eq!(registry.valid("building", &Value::from(raw)), Ok(false));
}

// ---- concurrency ----

#[test]
fn test_shared_registry_across_threads() {
    let registry = People::registry();
    let good = person(json!("joe"));
    let bad = person(json!(11));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    (
                        registry.valid("person", &good),
                        registry.valid("person", &bad),
                    )
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), (Ok(true), Ok(false)));
        }
    });
}

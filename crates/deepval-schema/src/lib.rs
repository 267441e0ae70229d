//! # deepval-schema — Structural Validation
//!
//! Answers one question: does this piece of nested data conform to this
//! rule? Rules are built from literals, patterns, per-key structures,
//! predicates, and references to named rules, and combined through
//! conjunction, disjunction, per-element and per-entry quantification,
//! optional keys, and rules computed from the data being checked.
//!
//! ## Modules
//!
//! - [`rule`] — the closed [`Rule`] variant type.
//! - [`validation`] — [`Validation`] (a rule plus options) and its builder.
//! - [`evaluate`] — the recursive evaluator and its per-call [`Scope`].
//! - [`registry`] — named validations of one schema, resolved lazily so
//!   entries can reference themselves and each other in any order.
//! - [`helpers`] — combinators for common shapes (`string`, `integer`,
//!   `any`, `all`, `sequence_of`, `mapping_of`, ...).
//!
//! ## Evaluation Contract
//!
//! `valid` is a total boolean function. Invalid data is `false`, never an
//! error. The only errors in this crate are construction errors: a
//! validation built with no rule, an invalid pattern, or a top-level lookup
//! of an undefined name.
//!
//! ## Crate Policy
//!
//! - Depends only on `deepval-core` internally.
//! - No shared mutable state: `Rule`, `Validation`, and `Registry` are
//!   `Send + Sync`, and evaluation only borrows them.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod evaluate;
pub mod helpers;
pub mod registry;
pub mod rule;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use deepval_core::{Bound, Kind, Limits, Mapping, SchemaError, Value};
pub use evaluate::{valid, valid_with, Scope};
pub use helpers::structure_ref;
pub use registry::{Entry, Registry, Schema};
pub use rule::{Predicate, Resolver, Rule, Structure, StructureBuilder};
pub use validation::{Validation, ValidationBuilder, ValidationOptions};

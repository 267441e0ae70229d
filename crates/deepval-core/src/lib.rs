//! # deepval-core — Foundational Types for deepval
//!
//! This crate defines the data model every deepval rule is evaluated
//! against, plus the small standalone pieces the rule engine builds on.
//! `deepval-schema` depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One tagged `Value`.** Rules never inspect host-language types.
//!    JSON, YAML, and Rust-built data all become a [`Value`], so a type
//!    check or comparison means the same thing regardless of origin.
//!
//! 2. **Total equality, partial comparison.** `Value` is `Ord` so any value
//!    can key a mapping; [`Value::compare`] is the semantic, partial order
//!    that range checks use. Unordered pairs compare false, never error.
//!
//! 3. **Bounds are data.** [`Bound`] and [`Limits`] deserialize from JSON
//!    or YAML, so size and limit arguments can come from configuration.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `deepval-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod range;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{DeepvalError, SchemaError, ValueError};
pub use range::{in_range, Bound, Limits};
pub use temporal::{parse_date, parse_datetime, parse_time};
pub use value::{Kind, Mapping, Value};

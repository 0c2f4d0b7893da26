//! Typed MongoDB query translation for docquery
//!
//! This crate turns typed query plans into MongoDB query documents and runs
//! them through the official driver.
//!
//! # Features
//! - Field paths checked against declared entity schemas
//! - Predicate trees rendered to filter documents ($gt/$lte merging, $or,
//!   $in/$nin/$all, $exists, regex, $elemMatch)
//! - Sort, projection, skip and limit
//! - Typed collection client (insert, find, delete, count, distinct)
//! - Connection pooling with retrying connect for freshly started servers

pub mod collection;
pub mod connection;
pub mod entity;
pub mod query;
pub mod schema;
pub mod validation;

pub use collection::EntityCollection;
pub use connection::{Connection, PoolConfig, RetryPolicy};
pub use docquery_common::{ConnectionString, DocQueryError, Result};
pub use entity::Entity;
pub use query::{
    translate, Direction, FieldPath, Operator, Pattern, Predicate, QueryPlan, TranslatedQuery,
    Translator,
};
pub use schema::{EntitySchema, FieldKind};
pub use validation::ValidatedCollectionName;

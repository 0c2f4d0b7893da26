//! Common utilities for docquery
//!
//! This crate provides the error taxonomy and connection addressing shared by
//! the translator, the collection client and the process harness.

pub mod error;
pub mod uri;

pub use error::{DocQueryError, Result};
pub use uri::{ConnectionString, Credentials};

//! Sample blog data for docquery
//!
//! A `Post` entity with embedded comments and statistics, a deterministic
//! generator for test data, and a catalogue of query plans covering every
//! supported query form. The `tests/` directory runs the catalogue against an
//! ephemeral server.

pub mod fixtures;
pub mod model;
pub mod queries;

pub use fixtures::{sample_posts, SAMPLE_TAGS};
pub use model::{Comment, Post, PostStatistics};

//! Typed query construction and translation.
//!
//! A [`QueryPlan`] describes a find: an optional [`Predicate`] tree, sort keys,
//! a projection and paging. A [`Translator`] checks every [`FieldPath`] in the
//! plan against an [`EntitySchema`](crate::schema::EntitySchema) and renders
//! the MongoDB query documents.
//!
//! # Examples
//!
//! ```
//! use docquery_mongodb::query::{Predicate, QueryPlan, Translator};
//! use docquery_mongodb::schema::{EntitySchema, FieldKind};
//! use bson::doc;
//!
//! let stats = EntitySchema::new("PostStatistics").scalar("VotesCount");
//! let schema = EntitySchema::new("Post").field("Statistics", FieldKind::Document(stats));
//!
//! let plan = QueryPlan::new().filter(
//!     Predicate::gt("Statistics.VotesCount", 3).and(Predicate::lte("Statistics.VotesCount", 5)),
//! );
//! let query = Translator::new(&schema).translate(&plan)?;
//! assert_eq!(query.filter, doc! { "Statistics.VotesCount": { "$gt": 3, "$lte": 5 } });
//! # Ok::<(), docquery_mongodb::DocQueryError>(())
//! ```

mod path;
mod plan;
mod predicate;
mod translate;


pub use path::{FieldPath, PathSegment};
pub use plan::{Direction, QueryPlan};
pub use predicate::{Operator, Pattern, Predicate};
pub use translate::{translate, TranslatedQuery, Translator};

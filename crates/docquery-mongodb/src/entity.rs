//! Entity trait for stored types
//!
//! An entity knows its collection, its declared schema and its identifier.
//! Identity comparison is an explicit method rather than `PartialEq`, so each
//! entity kind decides whether it wants identity or structural equality.

use crate::query::Translator;
use crate::schema::EntitySchema;
use crate::Result;
use bson::{Bson, Document};
use docquery_common::DocQueryError;
use serde::{de::DeserializeOwned, Serialize};

/// Core trait for stored entities
///
/// # Example
///
/// ```ignore
/// use once_cell::sync::Lazy;
/// use serde::{Deserialize, Serialize};
/// use docquery_mongodb::{Entity, schema::{EntitySchema, FieldKind}};
///
/// static USER_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
///     EntitySchema::new("User")
///         .field_as("Id", "_id", FieldKind::Scalar)
///         .scalar("Email")
/// });
///
/// #[derive(Debug, Serialize, Deserialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct User {
///     #[serde(rename = "_id")]
///     id: i32,
///     email: String,
/// }
///
/// impl Entity for User {
///     type Id = i32;
///     fn collection_name() -> &'static str { "users" }
///     fn schema() -> &'static EntitySchema { &USER_SCHEMA }
///     fn id(&self) -> i32 { self.id }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Sized {
    /// Identifier type, stored as `_id`
    type Id: PartialEq + Into<Bson> + Clone + Send + Sync;

    /// Get the collection name for this entity type
    fn collection_name() -> &'static str;

    /// Declared schema used to check query paths
    fn schema() -> &'static EntitySchema;

    /// Get the entity's identifier
    fn id(&self) -> Self::Id;

    /// Identity equality: same identifier, regardless of other fields
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Translator bound to this entity's schema
    fn translator() -> Translator<'static> {
        Translator::new(Self::schema())
    }

    /// Convert entity to BSON
    fn to_bson(&self) -> Result<Document> {
        bson::to_document(self).map_err(|e| DocQueryError::Serialization(e.to_string()))
    }

    /// Create entity from BSON
    fn from_bson(doc: Document) -> Result<Self> {
        bson::from_document(doc).map_err(|e| DocQueryError::Deserialization(e.to_string()))
    }
}

//! Declared entity schemas
//!
//! A schema lists the fields an entity stores so that field paths can be
//! checked and mapped to their stored (dotted) names before a query is sent.

use crate::query::{FieldPath, PathSegment};
use crate::validation::validate_field_name;
use crate::Result;
use docquery_common::DocQueryError;

/// Shape of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Leaf value (string, number, date, ...)
    Scalar,
    /// Embedded document
    Document(EntitySchema),
    /// Array whose elements have the given kind
    Array(Box<FieldKind>),
}

impl FieldKind {
    pub fn array_of(element: FieldKind) -> Self {
        FieldKind::Array(Box::new(element))
    }
}

/// Field declaration: declared name, optional stored name and kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    stored_as: Option<String>,
    kind: FieldKind,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used on the wire
    pub fn stored_name(&self) -> &str {
        self.stored_as.as_deref().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// Named set of field declarations.
///
/// # Example
///
/// ```
/// use docquery_mongodb::schema::{EntitySchema, FieldKind};
///
/// let schema = EntitySchema::new("Post")
///     .field_as("Id", "_id", FieldKind::Scalar)
///     .scalar("Title")
///     .field("Tags", FieldKind::array_of(FieldKind::Scalar));
/// assert!(schema.resolve(&"Title".into()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    name: String,
    fields: Vec<FieldDef>,
}

/// A field path checked against a schema.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPath<'a> {
    kind: &'a FieldKind,
}

impl<'a> ResolvedPath<'a> {
    pub fn kind(&self) -> &'a FieldKind {
        self.kind
    }

    /// Schema of the array elements, when the path ends on an array of documents
    pub fn element_schema(&self) -> Option<&'a EntitySchema> {
        match self.kind {
            FieldKind::Array(element) => match element.as_ref() {
                FieldKind::Document(schema) => Some(schema),
                _ => None,
            },
            _ => None,
        }
    }
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field. Redeclaring a name replaces the earlier declaration.
    pub fn field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(FieldDef {
            name: name.into(),
            stored_as: None,
            kind,
        })
    }

    /// Declare a field stored under a different name (e.g. `Id` as `_id`)
    pub fn field_as(
        self,
        name: impl Into<String>,
        stored_as: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        self.push(FieldDef {
            name: name.into(),
            stored_as: Some(stored_as.into()),
            kind,
        })
    }

    pub fn scalar(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Scalar)
    }

    fn push(mut self, def: FieldDef) -> Self {
        self.fields.retain(|existing| existing.name != def.name);
        self.fields.push(def);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by declared or stored name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.stored_name() == name))
    }

    /// Check every declared and stored name, recursively.
    pub fn validate(&self) -> Result<()> {
        for def in &self.fields {
            validate_field_name(&def.name)?;
            validate_field_name(def.stored_name())?;
            let mut kind = &def.kind;
            while let FieldKind::Array(element) = kind {
                kind = element.as_ref();
            }
            if let FieldKind::Document(inner) = kind {
                inner.validate()?;
            }
        }
        Ok(())
    }

    /// Check `path` against this schema.
    pub fn resolve(&self, path: &FieldPath) -> Result<ResolvedPath<'_>> {
        self.resolve_dotted(path).map(|(_, resolved)| resolved)
    }

    /// Check `path` and render its stored, dotted form (`Comments.1.AuthorName`).
    ///
    /// Named segments step into embedded documents, and into the elements of
    /// arrays of documents. Index segments are only valid on arrays.
    pub fn resolve_dotted(&self, path: &FieldPath) -> Result<(String, ResolvedPath<'_>)> {
        let unresolved = || DocQueryError::UnresolvedField {
            path: path.to_string(),
            entity: self.name.clone(),
        };

        if path.is_empty() {
            return Err(unresolved());
        }

        let mut dotted: Vec<String> = Vec::with_capacity(path.segments().len());
        let mut schema = self;
        let mut kind: Option<&FieldKind> = None;

        for segment in path.segments() {
            match segment {
                PathSegment::Field(name) => {
                    if let Some(current) = kind {
                        schema = match current {
                            FieldKind::Document(inner) => inner,
                            FieldKind::Array(element) => match element.as_ref() {
                                FieldKind::Document(inner) => inner,
                                _ => return Err(unresolved()),
                            },
                            FieldKind::Scalar => return Err(unresolved()),
                        };
                    }
                    let def = schema.get(name).ok_or_else(unresolved)?;
                    dotted.push(def.stored_name().to_string());
                    kind = Some(&def.kind);
                }
                PathSegment::Index(index) => match kind {
                    Some(FieldKind::Array(element)) => {
                        dotted.push(index.to_string());
                        kind = Some(element.as_ref());
                    }
                    _ => return Err(unresolved()),
                },
            }
        }

        let kind = kind.ok_or_else(unresolved)?;
        Ok((dotted.join("."), ResolvedPath { kind }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_schema() -> EntitySchema {
        let comment = EntitySchema::new("Comment").scalar("Body").scalar("AuthorName");
        let stats = EntitySchema::new("PostStatistics")
            .scalar("VotesCount")
            .scalar("ViewsCount");
        EntitySchema::new("Post")
            .field_as("Id", "_id", FieldKind::Scalar)
            .scalar("Title")
            .field("Tags", FieldKind::array_of(FieldKind::Scalar))
            .field("Comments", FieldKind::array_of(FieldKind::Document(comment)))
            .field("Statistics", FieldKind::Document(stats))
    }

    fn dotted(schema: &EntitySchema, path: &str) -> Result<String> {
        schema.resolve_dotted(&path.into()).map(|(d, _)| d)
    }

    #[test]
    fn test_resolve_top_level_and_nested() {
        let schema = post_schema();
        assert_eq!(dotted(&schema, "Title").unwrap(), "Title");
        assert_eq!(
            dotted(&schema, "Statistics.VotesCount").unwrap(),
            "Statistics.VotesCount"
        );
    }

    #[test]
    fn test_resolve_uses_stored_name() {
        let schema = post_schema();
        assert_eq!(dotted(&schema, "Id").unwrap(), "_id");
        assert_eq!(dotted(&schema, "_id").unwrap(), "_id");
    }

    #[test]
    fn test_resolve_indexed_path() {
        let schema = post_schema();
        assert_eq!(
            dotted(&schema, "Comments[1].AuthorName").unwrap(),
            "Comments.1.AuthorName"
        );
        assert_eq!(dotted(&schema, "Tags.0").unwrap(), "Tags.0");
    }

    #[test]
    fn test_resolve_through_array_of_documents() {
        let schema = post_schema();
        assert_eq!(
            dotted(&schema, "Comments.AuthorName").unwrap(),
            "Comments.AuthorName"
        );
    }

    #[test]
    fn test_unknown_field_is_unresolved() {
        let schema = post_schema();
        let err = dotted(&schema, "Statistics.Likes").unwrap_err();
        assert_eq!(
            err,
            DocQueryError::UnresolvedField {
                path: "Statistics.Likes".to_string(),
                entity: "Post".to_string(),
            }
        );
    }

    #[test]
    fn test_index_on_non_array_is_unresolved() {
        let schema = post_schema();
        assert!(dotted(&schema, "Title[0]").is_err());
        assert!(dotted(&schema, "Title.Length").is_err());
        assert!(dotted(&schema, "Tags.0.Name").is_err());
    }

    #[test]
    fn test_empty_path_is_unresolved() {
        let schema = post_schema();
        assert!(dotted(&schema, "").is_err());
    }

    #[test]
    fn test_element_schema() {
        let schema = post_schema();
        let comments = schema.resolve(&"Comments".into()).unwrap();
        assert_eq!(comments.element_schema().unwrap().name(), "Comment");
        let tags = schema.resolve(&"Tags".into()).unwrap();
        assert!(tags.element_schema().is_none());
    }

    #[test]
    fn test_validate() {
        assert!(post_schema().validate().is_ok());
        let bad = EntitySchema::new("Post").field(
            "Comments",
            FieldKind::array_of(FieldKind::Document(EntitySchema::new("Comment").scalar("$body"))),
        );
        assert!(matches!(bad.validate(), Err(DocQueryError::Validation(_))));
    }

    #[test]
    fn test_redeclared_field_replaces() {
        let schema = EntitySchema::new("X")
            .scalar("A")
            .field("A", FieldKind::array_of(FieldKind::Scalar));
        assert_eq!(schema.fields().len(), 1);
        assert!(matches!(schema.fields()[0].kind(), FieldKind::Array(_)));
    }
}

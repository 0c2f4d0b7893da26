//! Blog post entities

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use docquery_mongodb::{Entity, EntitySchema, FieldKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static COMMENT_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
    EntitySchema::new("Comment")
        .scalar("Body")
        .scalar("AuthorName")
        .scalar("CreationDate")
});

static STATISTICS_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
    EntitySchema::new("PostStatistics")
        .scalar("VotesCount")
        .scalar("ViewsCount")
});

static POST_SCHEMA: Lazy<EntitySchema> = Lazy::new(|| {
    EntitySchema::new("Post")
        .field_as("Id", "_id", FieldKind::Scalar)
        .scalar("Title")
        .scalar("Body")
        .scalar("AuthorName")
        .scalar("CreationDate")
        .scalar("LastModifyDate")
        .field("Tags", FieldKind::array_of(FieldKind::Scalar))
        .field(
            "Comments",
            FieldKind::array_of(FieldKind::Document(COMMENT_SCHEMA.clone())),
        )
        .field("Statistics", FieldKind::Document(STATISTICS_SCHEMA.clone()))
});

/// A blog post, stored in the `posts` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: i32,
    pub title: String,
    pub body: String,
    pub author_name: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub creation_date: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_modify_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
    pub statistics: PostStatistics,
}

/// Comment embedded in a [`Post`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    pub body: String,
    pub author_name: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub creation_date: DateTime<Utc>,
}

/// Vote and view counters embedded in a [`Post`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostStatistics {
    pub votes_count: i32,
    pub views_count: i32,
}

impl Entity for Post {
    type Id = i32;

    fn collection_name() -> &'static str {
        "posts"
    }

    fn schema() -> &'static EntitySchema {
        &POST_SCHEMA
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, Bson};

    fn post(id: i32) -> Post {
        let date = DateTime::<Utc>::UNIX_EPOCH;
        Post {
            id,
            title: format!("Title{}", id),
            body: format!("Body{}", id),
            author_name: format!("AuthorName{}", id),
            creation_date: date,
            last_modify_date: date,
            tags: vec!["python".to_string()],
            comments: vec![Comment {
                body: "Body1".to_string(),
                author_name: "AuthorName1".to_string(),
                creation_date: date,
            }],
            statistics: PostStatistics {
                votes_count: 3,
                views_count: 7,
            },
        }
    }

    #[test]
    fn test_stored_field_names() {
        let doc = post(1).to_bson().unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "_id",
                "Title",
                "Body",
                "AuthorName",
                "CreationDate",
                "LastModifyDate",
                "Tags",
                "Comments",
                "Statistics",
            ]
        );
        assert_eq!(
            doc.get_document("Statistics").unwrap(),
            &doc! { "VotesCount": 3, "ViewsCount": 7 }
        );
        assert!(matches!(doc.get("CreationDate"), Some(Bson::DateTime(_))));
    }

    #[test]
    fn test_bson_round_trip() {
        let original = post(4);
        let decoded = Post::from_bson(original.to_bson().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_identity_is_by_id() {
        let a = post(1);
        let mut b = post(1);
        b.title = "Edited".to_string();
        assert!(a.same_identity(&b));
        assert_ne!(a, b);
        assert!(!a.same_identity(&post(2)));
    }

    #[test]
    fn test_schema_is_valid() {
        assert!(Post::schema().validate().is_ok());
        assert_eq!(Post::collection_name(), "posts");
    }
}

//! Catalogue of example queries over [`Post`](crate::Post)
//!
//! Each function builds the plan for one query form; the shell equivalent is
//! noted on each.

use docquery_mongodb::{Direction, FieldPath, Pattern, Predicate, QueryPlan};

const VOTES: &str = "Statistics.VotesCount";
const VIEWS: &str = "Statistics.ViewsCount";

/// `db.posts.find({})`
pub fn all_posts() -> QueryPlan {
    QueryPlan::new()
}

/// `db.posts.find({Title: t, AuthorName: a})`
pub fn by_title_and_author(title: &str, author: &str) -> QueryPlan {
    QueryPlan::new()
        .filter(Predicate::eq("Title", title).and(Predicate::eq("AuthorName", author)))
}

/// `db.posts.find({_id: id})`
pub fn by_id(id: i32) -> QueryPlan {
    QueryPlan::new().filter(Predicate::eq("Id", id))
}

/// `db.posts.find({'Statistics.VotesCount': n}, {Body: 1})`
pub fn bodies_with_votes(votes: i32) -> QueryPlan {
    QueryPlan::new()
        .filter(Predicate::eq(VOTES, votes))
        .select("Body")
}

/// `db.posts.find({'Statistics.VotesCount': n}, {'Statistics.ViewsCount': 1})`
pub fn views_with_votes(votes: i32) -> QueryPlan {
    QueryPlan::new()
        .filter(Predicate::eq(VOTES, votes))
        .select(VIEWS)
}

/// `db.posts.find({}).sort({Title: 1})`
pub fn ordered_by_title() -> QueryPlan {
    QueryPlan::new().sort_by("Title", Direction::Ascending)
}

/// `db.posts.find({}).sort({Title: 1}).skip(s).limit(l)`
pub fn title_page(skip: u64, limit: u32) -> QueryPlan {
    ordered_by_title().skip(skip).limit(limit)
}

/// `db.posts.find({}).sort({CreationDate: -1}).limit(n)`
pub fn newest(count: u32) -> QueryPlan {
    QueryPlan::new()
        .sort_by("CreationDate", Direction::Descending)
        .limit(count)
}

/// `{'Statistics.VotesCount': {$gt: n}}`
pub fn votes_greater_than(votes: i32) -> QueryPlan {
    QueryPlan::new().filter(Predicate::gt(VOTES, votes))
}

/// `{'Statistics.VotesCount': {$gte: n}}`
pub fn votes_at_least(votes: i32) -> QueryPlan {
    QueryPlan::new().filter(Predicate::gte(VOTES, votes))
}

/// `{'Statistics.VotesCount': {$lt: n}}`
pub fn votes_less_than(votes: i32) -> QueryPlan {
    QueryPlan::new().filter(Predicate::lt(VOTES, votes))
}

/// `{'Statistics.VotesCount': {$lte: n}}`
pub fn votes_at_most(votes: i32) -> QueryPlan {
    QueryPlan::new().filter(Predicate::lte(VOTES, votes))
}

/// `{'Statistics.VotesCount': {$gt: low, $lte: high}}`
pub fn votes_between(low_exclusive: i32, high_inclusive: i32) -> QueryPlan {
    QueryPlan::new().filter(
        Predicate::gt(VOTES, low_exclusive).and(Predicate::lte(VOTES, high_inclusive)),
    )
}

/// `{'Statistics.ViewsCount': {$ne: n}}`
pub fn views_not_equal(views: i32) -> QueryPlan {
    QueryPlan::new().filter(Predicate::ne(VIEWS, views))
}

/// `{Tags: {$in: [...]}}`
pub fn tagged_any(tags: &[&str]) -> QueryPlan {
    QueryPlan::new().filter(Predicate::in_set("Tags", tags.iter().copied()))
}

/// `{Tags: {$all: [...]}}`
pub fn tagged_all(tags: &[&str]) -> QueryPlan {
    QueryPlan::new().filter(Predicate::all_of("Tags", tags.iter().copied()))
}

/// `{Tags: t}`: array membership through plain equality
pub fn tagged(tag: &str) -> QueryPlan {
    QueryPlan::new().filter(Predicate::eq("Tags", tag))
}

/// `{AuthorName: {$nin: [...]}}`
pub fn authors_excluding(authors: &[&str]) -> QueryPlan {
    QueryPlan::new().filter(Predicate::not_in_set("AuthorName", authors.iter().copied()))
}

/// `{path: {$exists: true}}`
pub fn with_field(path: impl Into<FieldPath>) -> QueryPlan {
    QueryPlan::new().filter(Predicate::exists(path, true))
}

/// `{$or: [{AuthorName: a}, {Tags: t}]}`
pub fn by_author_or_tag(author: &str, tag: &str) -> QueryPlan {
    QueryPlan::new().filter(Predicate::eq("AuthorName", author).or(Predicate::eq("Tags", tag)))
}

/// `{Title: /pattern/}`
pub fn title_matches(pattern: impl Into<Pattern>) -> QueryPlan {
    QueryPlan::new().filter(Predicate::regex("Title", pattern))
}

/// `{Comments: {$elemMatch: {AuthorName: a, Body: b}}}`
pub fn commented_by(author: &str, body: &str) -> QueryPlan {
    QueryPlan::new().filter(Predicate::elem_match(
        "Comments",
        Predicate::eq("AuthorName", author).and(Predicate::eq("Body", body)),
    ))
}

/// `{'Comments.1.AuthorName': a}`
pub fn second_comment_by(author: &str) -> QueryPlan {
    QueryPlan::new().filter(Predicate::eq(
        FieldPath::new("Comments").index(1).field("AuthorName"),
        author,
    ))
}

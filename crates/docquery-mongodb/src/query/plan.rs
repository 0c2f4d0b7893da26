//! Query plan: filter, sort, projection and paging for a single find.

use super::path::FieldPath;
use super::predicate::Predicate;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Value used in a sort document
    pub fn to_mongo(&self) -> i32 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

/// Everything needed to render one find query.
///
/// Built with consuming setters, in the same way as the driver-level query
/// builders:
///
/// ```
/// use docquery_mongodb::query::{Direction, Predicate, QueryPlan};
///
/// let plan = QueryPlan::new()
///     .filter(Predicate::gt("Statistics.VotesCount", 3))
///     .sort_by("Title", Direction::Ascending)
///     .skip(10)
///     .limit(20);
/// assert_eq!(plan.get_skip(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    predicate: Option<Predicate>,
    sort: Vec<(FieldPath, Direction)>,
    projection: Vec<FieldPath>,
    skip: u64,
    limit: Option<u32>,
}

impl QueryPlan {
    /// Plan matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter predicate, replacing any previous one
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Append a sort key. Earlier keys take precedence.
    pub fn sort_by(mut self, path: impl Into<FieldPath>, direction: Direction) -> Self {
        self.sort.push((path.into(), direction));
        self
    }

    /// Include a field in the results. Duplicates are ignored.
    pub fn select(mut self, path: impl Into<FieldPath>) -> Self {
        let path = path.into();
        if !self.projection.contains(&path) {
            self.projection.push(path);
        }
        self
    }

    /// Set the number of documents to skip
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the maximum number of documents to return (must be positive)
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn get_predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn get_sort(&self) -> &[(FieldPath, Direction)] {
        &self.sort
    }

    pub fn get_projection(&self) -> &[FieldPath] {
        &self.projection
    }

    pub fn get_skip(&self) -> u64 {
        self.skip
    }

    pub fn get_limit(&self) -> Option<u32> {
        self.limit
    }
}

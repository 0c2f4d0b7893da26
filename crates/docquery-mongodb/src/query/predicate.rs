//! Filter expression tree.

use super::path::FieldPath;
use bson::Bson;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal (bare value, no operator wrapper)
    Eq,
    /// Not equal ($ne)
    Ne,
    /// Greater than ($gt)
    Gt,
    /// Greater than or equal ($gte)
    Gte,
    /// Less than ($lt)
    Lt,
    /// Less than or equal ($lte)
    Lte,
}

impl Operator {
    /// Returns the query operator key, or `None` for bare equality.
    pub fn to_mongo(&self) -> Option<&'static str> {
        match self {
            Operator::Eq => None,
            Operator::Ne => Some("$ne"),
            Operator::Gt => Some("$gt"),
            Operator::Gte => Some("$gte"),
            Operator::Lt => Some("$lt"),
            Operator::Lte => Some("$lte"),
        }
    }
}

/// Regular expression with option flags. Never anchored implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    options: String,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            options: String::new(),
        }
    }

    /// `i` flag
    pub fn case_insensitive(self) -> Self {
        self.flag('i')
    }

    /// `m` flag
    pub fn multi_line(self) -> Self {
        self.flag('m')
    }

    /// `x` flag
    pub fn extended(self) -> Self {
        self.flag('x')
    }

    /// `s` flag
    pub fn dot_all(self) -> Self {
        self.flag('s')
    }

    // BSON requires options in alphabetical order.
    fn flag(mut self, flag: char) -> Self {
        if !self.options.contains(flag) {
            let mut flags: Vec<char> = self.options.chars().collect();
            flags.push(flag);
            flags.sort_unstable();
            self.options = flags.into_iter().collect();
        }
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> &str {
        &self.options
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::new(source)
    }
}

/// Boolean filter over document fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Comparison(FieldPath, Operator, Bson),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    /// Field value is one of the set ($in)
    InSet(FieldPath, Vec<Bson>),
    /// Field value is none of the set ($nin)
    NotInSet(FieldPath, Vec<Bson>),
    /// Array field contains every value of the set ($all)
    AllOf(FieldPath, Vec<Bson>),
    Exists(FieldPath, bool),
    Regex(FieldPath, Pattern),
    /// At least one array element satisfies the nested predicate
    ElementMatch(FieldPath, Box<Predicate>),
}

fn values<I, V>(vals: I) -> Vec<Bson>
where
    I: IntoIterator<Item = V>,
    V: Into<Bson>,
{
    vals.into_iter().map(Into::into).collect()
}

impl Predicate {
    pub fn compare(path: impl Into<FieldPath>, op: Operator, value: impl Into<Bson>) -> Self {
        Predicate::Comparison(path.into(), op, value.into())
    }

    pub fn eq(path: impl Into<FieldPath>, value: impl Into<Bson>) -> Self {
        Self::compare(path, Operator::Eq, value)
    }

    pub fn ne(path: impl Into<FieldPath>, value: impl Into<Bson>) -> Self {
        Self::compare(path, Operator::Ne, value)
    }

    pub fn gt(path: impl Into<FieldPath>, value: impl Into<Bson>) -> Self {
        Self::compare(path, Operator::Gt, value)
    }

    pub fn gte(path: impl Into<FieldPath>, value: impl Into<Bson>) -> Self {
        Self::compare(path, Operator::Gte, value)
    }

    pub fn lt(path: impl Into<FieldPath>, value: impl Into<Bson>) -> Self {
        Self::compare(path, Operator::Lt, value)
    }

    pub fn lte(path: impl Into<FieldPath>, value: impl Into<Bson>) -> Self {
        Self::compare(path, Operator::Lte, value)
    }

    pub fn in_set<I, V>(path: impl Into<FieldPath>, vals: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        Predicate::InSet(path.into(), values(vals))
    }

    pub fn not_in_set<I, V>(path: impl Into<FieldPath>, vals: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        Predicate::NotInSet(path.into(), values(vals))
    }

    pub fn all_of<I, V>(path: impl Into<FieldPath>, vals: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        Predicate::AllOf(path.into(), values(vals))
    }

    pub fn exists(path: impl Into<FieldPath>, exists: bool) -> Self {
        Predicate::Exists(path.into(), exists)
    }

    pub fn regex(path: impl Into<FieldPath>, pattern: impl Into<Pattern>) -> Self {
        Predicate::Regex(path.into(), pattern.into())
    }

    pub fn elem_match(path: impl Into<FieldPath>, inner: Predicate) -> Self {
        Predicate::ElementMatch(path.into(), Box::new(inner))
    }

    /// Conjunction; `self` renders first
    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Disjunction; `self` renders first
    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }
}

//! Rendering of query plans into MongoDB query documents.
//!
//! Translation is pure: it only reads the plan and the schema and allocates
//! new documents, so one [`Translator`] can be shared freely across threads.
//! Rendering follows the predicate tree left to right, which makes the output
//! of an identical plan byte-identical between calls.

use super::path::FieldPath;
use super::plan::QueryPlan;
use super::predicate::{Pattern, Predicate};
use crate::schema::EntitySchema;
use crate::Result;
use bson::{Bson, Document};
use docquery_common::DocQueryError;
use tracing::debug;

/// Output of [`Translator::translate`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedQuery {
    pub filter: Document,
    pub sort: Option<Document>,
    pub skip: u64,
    pub limit: Option<i64>,
    pub projection: Option<Document>,
}

impl TranslatedQuery {
    /// Single-document form: `{filter, sort?, skip, limit?, projection?}`
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("filter", self.filter.clone());
        if let Some(sort) = &self.sort {
            doc.insert("sort", sort.clone());
        }
        // Bounded by i64::MAX during translation.
        doc.insert("skip", self.skip as i64);
        if let Some(limit) = self.limit {
            doc.insert("limit", limit);
        }
        if let Some(projection) = &self.projection {
            doc.insert("projection", projection.clone());
        }
        doc
    }
}

/// Translates plans for one entity schema.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    schema: &'a EntitySchema,
}

impl<'a> Translator<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a EntitySchema {
        self.schema
    }

    /// Render a whole plan.
    ///
    /// # Errors
    ///
    /// - `UnresolvedField` if any path is not declared on the schema
    /// - `ConflictingPredicate` if a conjunction cannot share one document
    /// - `EmptySet` for `$in` / `$nin` / `$all` without values
    /// - `Query` for a repeated sort key or `$elemMatch` on a non-document array
    /// - `Validation` for `limit(0)` or a skip beyond `i64::MAX`
    pub fn translate(&self, plan: &QueryPlan) -> Result<TranslatedQuery> {
        let filter = self.render_filter(plan.get_predicate())?;
        let sort = self.render_sort(plan)?;
        let projection = self.render_projection(plan)?;

        if i64::try_from(plan.get_skip()).is_err() {
            return Err(DocQueryError::Validation(format!(
                "skip {} exceeds the maximum of {}",
                plan.get_skip(),
                i64::MAX
            )));
        }
        let limit = match plan.get_limit() {
            Some(0) => {
                return Err(DocQueryError::Validation(
                    "limit must be a positive number".to_string(),
                ))
            }
            Some(n) => Some(i64::from(n)),
            None => None,
        };

        let translated = TranslatedQuery {
            filter,
            sort,
            skip: plan.get_skip(),
            limit,
            projection,
        };
        debug!(entity = %self.schema.name(), query = %translated.to_document(), "translated query plan");
        Ok(translated)
    }

    /// Render just a filter; `None` matches everything.
    pub fn render_filter(&self, predicate: Option<&Predicate>) -> Result<Document> {
        match predicate {
            Some(p) => render(self.schema, p).map(Filter::into_document),
            None => Ok(Document::new()),
        }
    }

    /// Stored, dotted name of a field path
    pub fn dotted(&self, path: &FieldPath) -> Result<String> {
        self.schema.resolve_dotted(path).map(|(dotted, _)| dotted)
    }

    fn render_sort(&self, plan: &QueryPlan) -> Result<Option<Document>> {
        if plan.get_sort().is_empty() {
            return Ok(None);
        }
        let mut sort = Document::new();
        for (path, direction) in plan.get_sort() {
            let key = self.dotted(path)?;
            if sort.contains_key(&key) {
                return Err(DocQueryError::Query(format!(
                    "Sort key '{}' given more than once",
                    key
                )));
            }
            sort.insert(key, direction.to_mongo());
        }
        Ok(Some(sort))
    }

    fn render_projection(&self, plan: &QueryPlan) -> Result<Option<Document>> {
        if plan.get_projection().is_empty() {
            return Ok(None);
        }
        let mut projection = Document::new();
        for path in plan.get_projection() {
            projection.insert(self.dotted(path)?, 1);
        }
        Ok(Some(projection))
    }
}

/// Translate `plan` against `schema` in one call.
pub fn translate(schema: &EntitySchema, plan: &QueryPlan) -> Result<TranslatedQuery> {
    Translator::new(schema).translate(plan)
}

fn set_operator(
    schema: &EntitySchema,
    path: &FieldPath,
    op: &'static str,
    vals: &[Bson],
) -> Result<Filter> {
    let (key, _) = schema.resolve_dotted(path)?;
    if vals.is_empty() {
        return Err(DocQueryError::EmptySet {
            path: path.to_string(),
            operator: op,
        });
    }
    Ok(Filter::operator(key, op, vals.to_vec()))
}

fn regex(pattern: &Pattern) -> Bson {
    Bson::RegularExpression(bson::Regex {
        pattern: pattern.source().to_string(),
        options: pattern.options().to_string(),
    })
}

/// Value rendered for one key, tagged with the predicate kind that produced it.
enum Entry {
    /// Equality, regex or `$or`: the value is matched as-is
    Bare(Bson),
    /// `{ $op: operand, .. }` produced by operator predicates
    Ops(Document),
}

/// Filter under construction. Keys keep insertion order.
struct Filter {
    entries: Vec<(String, Entry)>,
}

impl Filter {
    fn bare(key: String, value: impl Into<Bson>) -> Self {
        Self {
            entries: vec![(key, Entry::Bare(value.into()))],
        }
    }

    fn operator(key: String, op: &str, operand: impl Into<Bson>) -> Self {
        let mut ops = Document::new();
        ops.insert(op, operand);
        Self {
            entries: vec![(key, Entry::Ops(ops))],
        }
    }

    /// Conjoin `other` into `self`. Only operator entries on the same key
    /// combine, and only when their operators differ.
    fn merge(&mut self, other: Filter) -> Result<()> {
        for (key, entry) in other.entries {
            let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) else {
                self.entries.push((key, entry));
                continue;
            };

            match (existing, entry) {
                (Entry::Ops(ops), Entry::Ops(incoming)) => {
                    for (op, operand) in incoming {
                        if ops.contains_key(&op) {
                            return Err(DocQueryError::ConflictingPredicate { path: key });
                        }
                        ops.insert(op, operand);
                    }
                }
                _ => return Err(DocQueryError::ConflictingPredicate { path: key }),
            }
        }
        Ok(())
    }

    fn into_document(self) -> Document {
        self.entries
            .into_iter()
            .map(|(key, entry)| match entry {
                Entry::Bare(value) => (key, value),
                Entry::Ops(ops) => (key, Bson::Document(ops)),
            })
            .collect()
    }
}

fn render(schema: &EntitySchema, predicate: &Predicate) -> Result<Filter> {
    match predicate {
        Predicate::Comparison(path, op, value) => {
            let (key, _) = schema.resolve_dotted(path)?;
            Ok(match op.to_mongo() {
                None => Filter::bare(key, value.clone()),
                Some(op) => Filter::operator(key, op, value.clone()),
            })
        }
        Predicate::And(left, right) => {
            let mut merged = render(schema, left)?;
            merged.merge(render(schema, right)?)?;
            Ok(merged)
        }
        Predicate::Or(left, right) => {
            let branches = vec![
                Bson::Document(render(schema, left)?.into_document()),
                Bson::Document(render(schema, right)?.into_document()),
            ];
            Ok(Filter::bare("$or".to_string(), branches))
        }
        Predicate::InSet(path, vals) => set_operator(schema, path, "$in", vals),
        Predicate::NotInSet(path, vals) => set_operator(schema, path, "$nin", vals),
        Predicate::AllOf(path, vals) => set_operator(schema, path, "$all", vals),
        Predicate::Exists(path, exists) => {
            let (key, _) = schema.resolve_dotted(path)?;
            Ok(Filter::operator(key, "$exists", *exists))
        }
        Predicate::Regex(path, pattern) => {
            let (key, _) = schema.resolve_dotted(path)?;
            Ok(Filter::bare(key, regex(pattern)))
        }
        Predicate::ElementMatch(path, inner) => {
            let (key, resolved) = schema.resolve_dotted(path)?;
            let element = resolved.element_schema().ok_or_else(|| {
                DocQueryError::Query(format!(
                    "$elemMatch on '{}' requires an array of embedded documents",
                    path
                ))
            })?;
            Ok(Filter::operator(
                key,
                "$elemMatch",
                render(element, inner)?.into_document(),
            ))
        }
    }
}

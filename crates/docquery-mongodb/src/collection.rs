//! Typed collection client
//!
//! Every call translates its plan or predicate first, so a malformed query
//! fails before any network round trip.

use crate::entity::Entity;
use crate::query::{FieldPath, Predicate, QueryPlan, TranslatedQuery};
use crate::validation::ValidatedCollectionName;
use crate::Result;
use bson::{Bson, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use std::marker::PhantomData;
use tracing::debug;

/// Collection of `T` entities.
pub struct EntityCollection<T: Entity> {
    collection: Collection<Document>,
    name: ValidatedCollectionName,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for EntityCollection<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            name: self.name.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> EntityCollection<T> {
    /// Bind to `T::collection_name()` in `db`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the collection name or any declared
    /// field name of `T::schema()` is invalid.
    pub fn new(db: &Database) -> Result<Self> {
        let name = ValidatedCollectionName::new(T::collection_name())?;
        T::schema().validate()?;
        Ok(Self {
            collection: db.collection(name.as_str()),
            name,
            _entity: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Insert all entities, returning the number inserted
    pub async fn insert_many(&self, entities: &[T]) -> Result<usize> {
        if entities.is_empty() {
            return Ok(0);
        }
        let docs = entities
            .iter()
            .map(T::to_bson)
            .collect::<Result<Vec<_>>>()?;
        let result = self.collection.insert_many(docs).await?;
        debug!(collection = %self.name, inserted = result.inserted_ids.len(), "inserted entities");
        Ok(result.inserted_ids.len())
    }

    /// Run a plan and decode every result into `T`
    pub async fn find(&self, plan: &QueryPlan) -> Result<Vec<T>> {
        self.find_documents(plan)
            .await?
            .into_iter()
            .map(T::from_bson)
            .collect()
    }

    /// Run a plan and return raw documents (use this with projections)
    pub async fn find_documents(&self, plan: &QueryPlan) -> Result<Vec<Document>> {
        let query = T::translator().translate(plan)?;
        let cursor = self
            .collection
            .find(query.filter.clone())
            .with_options(find_options(&query))
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        debug!(collection = %self.name, returned = docs.len(), "find completed");
        Ok(docs)
    }

    /// First result of a plan, if any
    pub async fn find_one(&self, plan: &QueryPlan) -> Result<Option<T>> {
        let single = plan.clone().limit(1);
        Ok(self.find(&single).await?.into_iter().next())
    }

    /// Delete matching entities; `None` deletes everything
    pub async fn delete(&self, predicate: Option<&Predicate>) -> Result<u64> {
        let filter = T::translator().render_filter(predicate)?;
        let result = self.collection.delete_many(filter).await?;
        debug!(collection = %self.name, deleted = result.deleted_count, "delete completed");
        Ok(result.deleted_count)
    }

    /// Count matching entities; `None` counts everything
    pub async fn count(&self, predicate: Option<&Predicate>) -> Result<u64> {
        let filter = T::translator().render_filter(predicate)?;
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Distinct values of a field among matching entities
    pub async fn distinct(
        &self,
        path: impl Into<FieldPath>,
        predicate: Option<&Predicate>,
    ) -> Result<Vec<Bson>> {
        let translator = T::translator();
        let field = translator.dotted(&path.into())?;
        let filter = translator.render_filter(predicate)?;
        Ok(self.collection.distinct(field, filter).await?)
    }
}

/// Driver options for a translated query
pub fn find_options(query: &TranslatedQuery) -> FindOptions {
    let mut options = FindOptions::default();
    options.sort = query.sort.clone();
    options.projection = query.projection.clone();
    if query.skip > 0 {
        options.skip = Some(query.skip);
    }
    options.limit = query.limit;
    options
}

use async_trait::async_trait;
use futures::StreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::FindOptions,
    Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{PrefixFilter, Repository};

pub struct MongoRepository<T> {
    pub collection: Collection<T>,
}

impl<T> MongoRepository<T> {
    /// Binds to `collection` through an already connected `database`. The
    /// driver's client owns the connection pool, so this never opens sockets.
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }
}

fn prefix_query(filter: Option<PrefixFilter<'_>>) -> Document {
    match filter {
        Some(PrefixFilter { field, prefix }) => doc! {
            field: {
                "$regex": format!("^{}", regex::escape(prefix)),
                "$options": "i",
            }
        },
        None => doc! {},
    }
}

#[async_trait]
impl<T> Repository<T> for MongoRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn insert(&self, item: &T) -> error::Result<()> {
        self.collection.insert_one(item, None).await?;
        Ok(())
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let result = self.collection.find_one(doc! {field: value}, None).await?;
        Ok(result)
    }

    async fn replace(&self, field: &str, value: &Bson, item: &T) -> error::Result<Option<T>> {
        let result = self
            .collection
            .find_one_and_replace(doc! {field: value}, item, None)
            .await?;
        Ok(result)
    }

    async fn delete(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let result = self
            .collection
            .find_one_and_delete(doc! {field: value}, None)
            .await?;
        Ok(result)
    }

    async fn find_all(
        &self,
        filter: Option<PrefixFilter<'_>>,
        skip: u64,
        limit: u64,
    ) -> error::Result<Vec<T>> {
        let find_options = FindOptions::builder()
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let results: Vec<mongodb::error::Result<T>> = self
            .collection
            .find(prefix_query(filter), find_options)
            .await?
            .collect()
            .await;

        Ok(results.into_iter().collect::<mongodb::error::Result<_>>()?)
    }
}

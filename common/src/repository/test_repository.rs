use async_trait::async_trait;
use futures::lock::Mutex;
use mongodb::bson::{self, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

use super::{PrefixFilter, Repository};

/// In-memory stand-in for a collection, keeping documents in insertion order.
pub struct TestRepository<T> {
    _t: std::marker::PhantomData<T>,
    db: Mutex<Vec<Document>>,
}

impl<T> TestRepository<T> {
    pub fn new() -> Self {
        Self {
            _t: std::marker::PhantomData,
            db: Mutex::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.db.lock().await.len()
    }
}

impl<T> Default for TestRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn position(db: &[Document], field: &str, value: &Bson) -> Option<usize> {
    db.iter().position(|x| x.get(field) == Some(value))
}

#[async_trait]
impl<T> Repository<T> for TestRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn insert(&self, item: &T) -> Result<()> {
        let document = bson::to_document(item)?;
        self.db.lock().await.push(document);
        Ok(())
    }

    async fn find(&self, field: &str, value: &Bson) -> Result<Option<T>> {
        let db = self.db.lock().await;
        match position(&db, field, value) {
            Some(pos) => Ok(Some(bson::from_document(db[pos].clone())?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, field: &str, value: &Bson, item: &T) -> Result<Option<T>> {
        let document = bson::to_document(item)?;
        let mut db = self.db.lock().await;
        let Some(pos) = position(&db, field, value) else {
            return Ok(None);
        };
        let old = std::mem::replace(&mut db[pos], document);
        Ok(Some(bson::from_document(old)?))
    }

    async fn delete(&self, field: &str, value: &Bson) -> Result<Option<T>> {
        let mut db = self.db.lock().await;
        let Some(pos) = position(&db, field, value) else {
            return Ok(None);
        };
        Ok(Some(bson::from_document(db.remove(pos))?))
    }

    async fn find_all(
        &self,
        filter: Option<PrefixFilter<'_>>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<T>> {
        let db = self.db.lock().await;
        db.iter()
            .filter(|x| match filter {
                Some(filter) => x
                    .get_str(filter.field)
                    .map(|value| filter.matches(value))
                    .unwrap_or(false),
                None => true,
            })
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|x| bson::from_document(x.clone()).map_err(Error::from))
            .collect()
    }
}

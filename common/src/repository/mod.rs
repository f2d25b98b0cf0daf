use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::Bson;

use crate::error::Result;

pub mod mongo_repository;
pub mod test_repository;

/// Case-insensitive "starts with" restriction on a string field.
#[derive(Debug, Clone, Copy)]
pub struct PrefixFilter<'a> {
    pub field: &'a str,
    pub prefix: &'a str,
}

impl PrefixFilter<'_> {
    pub fn matches(&self, value: &str) -> bool {
        value.to_lowercase().starts_with(&self.prefix.to_lowercase())
    }
}

/// Document-store access for a single collection of `T`.
///
/// Every mutation touches at most one document and is atomic with respect to
/// the lookup that selects it.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    async fn insert(&self, item: &T) -> Result<()>;
    async fn find(&self, field: &str, value: &Bson) -> Result<Option<T>>;
    /// Replaces the first document matching `field == value`, returning the
    /// previous version if one matched.
    async fn replace(&self, field: &str, value: &Bson, item: &T) -> Result<Option<T>>;
    async fn delete(&self, field: &str, value: &Bson) -> Result<Option<T>>;
    /// Returns up to `limit` documents after skipping `skip`, in natural order.
    async fn find_all(
        &self,
        filter: Option<PrefixFilter<'_>>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<T>>;
}

pub type RepositoryObject<T> = Arc<dyn Repository<T>>;

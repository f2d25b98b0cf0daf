use std::{sync::Arc, time::Duration};

use common::{
    error::{Error, Result},
    repository::{mongo_repository::MongoRepository, PrefixFilter, RepositoryObject},
};
use futures::lock::Mutex;
use lru_time_cache::LruCache;
use mongodb::{
    bson::{oid::ObjectId, Bson},
    Database,
};

use crate::{models::Record, schema::ApiVersion};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

const ID_FIELD: &str = "_id";
const NAME_FIELD: &str = "name";

const DEFAULT_CACHE_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// How long a looked-up customer may be served without a store round-trip.
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

pub fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| Error::InvalidIdentifier(id.to_string()))
}

struct Cache<T> {
    entries: LruCache<ObjectId, T>,
    /// Bumped by every update and delete. A lookup only caches what it read
    /// from the store if no write happened in between.
    generation: u64,
}

impl<T> Cache<T> {
    fn write(&mut self) -> &mut LruCache<ObjectId, T> {
        self.generation = self.generation.wrapping_add(1);
        &mut self.entries
    }
}

/// Customer data access for one API generation.
///
/// Lookups by id go through a bounded LRU cache with expiry. Updates and
/// deletes made through this repository keep the cache coherent; writes made
/// by anything else become visible once the cached entry expires.
pub struct CustomerRepo<V: ApiVersion> {
    inner: RepositoryObject<Record<V::Customer>>,
    cache: Arc<Mutex<Cache<Record<V::Customer>>>>,
}

impl<V: ApiVersion> Clone for CustomerRepo<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<V: ApiVersion> CustomerRepo<V> {
    pub fn new(inner: RepositoryObject<Record<V::Customer>>, opts: CacheOptions) -> Self {
        let cache = Cache {
            entries: LruCache::with_expiry_duration_and_capacity(opts.ttl, opts.capacity),
            generation: 0,
        };
        Self {
            inner,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn mongo(database: &Database, opts: CacheOptions) -> Self {
        let inner = MongoRepository::<Record<V::Customer>>::new(database, V::COLLECTION);
        Self::new(Arc::new(inner), opts)
    }

    pub async fn add(&self, customer: V::Customer) -> Result<String> {
        let record = Record {
            id: ObjectId::new(),
            customer,
        };
        self.inner.insert(&record).await?;
        Ok(record.id.to_hex())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Record<V::Customer>>> {
        let id = parse_id(id)?;

        let generation = {
            let mut cache = self.cache.lock().await;
            if let Some(record) = cache.entries.get(&id) {
                return Ok(Some(record.clone()));
            }
            cache.generation
        };

        let Some(record) = self.inner.find(ID_FIELD, &Bson::ObjectId(id)).await? else {
            return Ok(None);
        };

        let mut cache = self.cache.lock().await;
        if cache.generation == generation {
            cache.entries.insert(id, record.clone());
        }
        Ok(Some(record))
    }

    /// Replaces the whole customer in a single find-and-replace. Returns the
    /// number of documents replaced.
    pub async fn update(&self, id: &str, customer: V::Customer) -> Result<u64> {
        let id = parse_id(id)?;
        let record = Record { id, customer };

        let replaced = self
            .inner
            .replace(ID_FIELD, &Bson::ObjectId(id), &record)
            .await?;

        let mut cache = self.cache.lock().await;
        let entries = cache.write();
        if replaced.is_some() {
            entries.insert(id, record);
            Ok(1)
        } else {
            entries.remove(&id);
            Ok(0)
        }
    }

    /// Removes the customer in a single find-and-delete. Returns the number of
    /// documents removed.
    pub async fn delete(&self, id: &str) -> Result<u64> {
        let id = parse_id(id)?;
        let removed = self.inner.delete(ID_FIELD, &Bson::ObjectId(id)).await?;
        self.cache.lock().await.write().remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    /// Returns page `page` (1-based) of `page_size` customers in store order,
    /// restricted to names starting with `name_prefix` regardless of case.
    pub async fn list(
        &self,
        page: u64,
        page_size: Option<u64>,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Record<V::Customer>>> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Ok(Vec::new());
        }
        let skip = page.saturating_sub(1).saturating_mul(page_size);

        let filter = name_prefix
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| PrefixFilter {
                field: NAME_FIELD,
                prefix,
            });

        self.inner.find_all(filter, skip, page_size).await
    }
}

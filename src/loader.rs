//! Read-Through Loader
//!
//! Cache-aside lookups in front of an external document store: consult the
//! cache first, fall back to the source on a miss, and remember what was found
//! under the document id's string form.

use std::future::Future;

use tracing::{debug, trace};

use crate::error::{CacheError, Result};
use crate::shared::SharedCache;

/// An external store that can fetch documents by id.
///
/// Implementations may be written with `async fn`.
pub trait DocumentSource {
    type Document: Clone;

    /// Fetches the document stored under `id`, or `None` if there is none.
    fn fetch(
        &self,
        id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<Self::Document>>> + Send;
}

/// Lookups against a [`DocumentSource`], optionally served from a cache.
pub struct ReadThrough<S: DocumentSource> {
    source: S,
    cache: Option<SharedCache<S::Document>>,
}

impl<S: DocumentSource> ReadThrough<S> {
    /// Serves lookups from `cache` when possible.
    pub fn new(source: S, cache: SharedCache<S::Document>) -> Self {
        Self {
            source,
            cache: Some(cache),
        }
    }

    /// Sends every lookup straight to the source.
    pub fn uncached(source: S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> Option<&SharedCache<S::Document>> {
        self.cache.as_ref()
    }

    /// Finds a document, using and filling the cache.
    ///
    /// Missing documents are not cached, so a later insert in the source is
    /// seen on the next lookup.
    pub async fn find_by_id(&self, id: impl ToString) -> Result<Option<S::Document>> {
        let key = id.to_string();
        let Some(cache) = &self.cache else {
            return self.fetch(&key).await;
        };

        if let Some(document) = cache.get(&key).await {
            trace!(key = %key, "Read-through cache hit");
            return Ok(Some(document));
        }

        let document = self.fetch(&key).await?;
        if let Some(document) = &document {
            cache.set(key.clone(), document.clone()).await;
            debug!(key = %key, "Cached document from source");
        }
        Ok(document)
    }

    /// Finds a document in the source, bypassing the cache entirely.
    pub async fn find_by_id_uncached(&self, id: impl ToString) -> Result<Option<S::Document>> {
        self.fetch(&id.to_string()).await
    }

    async fn fetch(&self, key: &str) -> Result<Option<S::Document>> {
        self.source.fetch(key).await.map_err(CacheError::Source)
    }
}

//! In-memory page cache
//!
//! Short-lived cache of the rendered index listing. Entries are
//! volatile and cleared on restart. Uses Moka for high-performance
//! concurrent caching.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

/// A rendered page body, ready to serve
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub content_type: String,
    pub body: String,
}

/// Time-based cache of rendered listing pages
///
/// Keyed by the full request signature (path plus raw query string),
/// so each pagination window caches independently. Writes do not
/// invalidate entries; staleness up to the TTL is accepted.
pub struct PageCache {
    pages: Cache<String, Arc<CachedPage>>,
}

impl PageCache {
    /// Create a page cache with the given TTL.
    pub fn new(ttl_seconds: u64) -> Self {
        let pages = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();

        Self { pages }
    }

    /// Build the cache key for a request.
    ///
    /// The key covers path and raw query string; two requests render
    /// identically exactly when their signatures match.
    pub fn request_key(path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        }
    }

    /// Get a cached page by request signature.
    pub async fn get(&self, key: &str) -> Option<Arc<CachedPage>> {
        let result = self.pages.get(key).await;

        // Record cache hit/miss
        use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};
        if result.is_some() {
            CACHE_HITS_TOTAL.with_label_values(&["page"]).inc();
        } else {
            CACHE_MISSES_TOTAL.with_label_values(&["page"]).inc();
        }

        result
    }

    /// Insert a rendered page.
    pub async fn insert(&self, key: String, page: CachedPage) {
        self.pages.insert(key, Arc::new(page)).await;

        // Update cache size metric
        use crate::metrics::CACHE_SIZE;
        CACHE_SIZE
            .with_label_values(&["page"])
            .set(self.pages.entry_count() as i64);
    }

    /// Drop every cached page.
    ///
    /// The next request re-renders from the database regardless of
    /// remaining TTL.
    pub fn clear(&self) {
        self.pages.invalidate_all();

        use crate::metrics::CACHE_SIZE;
        CACHE_SIZE.with_label_values(&["page"]).set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_key_includes_query() {
        assert_eq!(PageCache::request_key("/posts", None), "/posts");
        assert_eq!(
            PageCache::request_key("/posts", Some("page=2")),
            "/posts?page=2"
        );
    }

    #[tokio::test]
    async fn cleared_cache_misses() {
        let cache = PageCache::new(60);
        cache
            .insert(
                "/posts".to_string(),
                CachedPage {
                    content_type: "application/json".to_string(),
                    body: "{}".to_string(),
                },
            )
            .await;

        assert!(cache.get("/posts").await.is_some());

        cache.clear();
        assert!(cache.get("/posts").await.is_none());
    }
}

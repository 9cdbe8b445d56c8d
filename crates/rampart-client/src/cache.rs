//! ETag conditional-request cache decorator.
//!
//! Serves RFC 7232 conditional GETs: successful GET responses that carry an
//! `ETag` are cached; later GETs for the same cache key go out with
//! `If-None-Match`, and a `304 Not Modified` is answered from the cached
//! entry without transferring the body again.
//!
//! ## The local-reference invariant
//!
//! The 304 path must serve the *same* entry whose ETag was sent as
//! `If-None-Match`. Concurrent eviction or `clear()` between dispatch and
//! response must not be able to invalidate that. The guarantee is
//! structural, not lock-based: the entry `Arc` is cloned into the request's
//! local state *before* dispatch, and the 304 path only ever reads that
//! local clone. The shared map is never consulted after the response
//! arrives.
//!
//! ## Eviction
//!
//! When the map grows past `max_cache_size`, the oldest tenth of the
//! entries (by insertion timestamp, minimum one) is removed. Iteration is
//! weakly consistent and removal is best-effort — the invariant is bounded
//! size, not exact LRU order; losing a race to a concurrent refresh is
//! acceptable.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::adapter::{AdapterRequest, HttpAdapter};
use crate::cache_key::{compose_cache_key, CacheKeyHeaderFilter};
use crate::method::HttpMethod;
use crate::result::HttpResult;

/// One immutable cached response.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub content: T,
    pub etag: String,
    pub timestamp_ns: u64,
}

/// Sizing and key-composition policy for the cache decorator.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry count above which eviction runs.
    pub max_cache_size: usize,

    /// Which request headers participate in the cache key.
    pub header_filter: CacheKeyHeaderFilter,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 256,
            header_filter: CacheKeyHeaderFilter::all(),
        }
    }
}

/// Conditional-request decorator. Only GETs consult or populate the cache;
/// every other method passes through untouched.
pub struct EtagCachingAdapter<T, A> {
    inner: A,
    config: CacheConfig,
    entries: DashMap<String, Arc<CacheEntry<T>>>,
}

impl<T, A> EtagCachingAdapter<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: HttpAdapter<T>,
{
    pub fn new(inner: A, config: CacheConfig) -> Self {
        Self {
            inner,
            config,
            entries: DashMap::new(),
        }
    }

    /// Current number of cached entries.
    pub fn cache_len(&self) -> usize {
        self.entries.len()
    }

    /// Drop every cached entry immediately. Requests already in flight keep
    /// serving their locally captured entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn evict_if_needed(&self) {
        let len = self.entries.len();
        if len <= self.config.max_cache_size {
            return;
        }

        // Weakly consistent snapshot; entries inserted or refreshed while
        // we sort may survive a round longer than strict LRU would allow.
        let mut snapshot: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().timestamp_ns))
            .collect();
        snapshot.sort_unstable_by_key(|(_, timestamp)| *timestamp);

        let count = (len / 10).max(1);
        for (key, timestamp) in snapshot.into_iter().take(count) {
            // Skip entries refreshed since the snapshot.
            self.entries
                .remove_if(&key, |_, entry| entry.timestamp_ns == timestamp);
        }
        debug!(evicted = count, remaining = self.entries.len(), "cache eviction pass");
    }
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

#[async_trait]
impl<T, A> HttpAdapter<T> for EtagCachingAdapter<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: HttpAdapter<T>,
{
    fn uri(&self) -> &str {
        self.inner.uri()
    }

    async fn dispatch(&self, request: AdapterRequest) -> HttpResult<T> {
        if request.method != HttpMethod::Get {
            return self.inner.dispatch(request).await;
        }

        let key = compose_cache_key(self.inner.uri(), &request.headers, &self.config.header_filter);

        // Local capture: the 304 path below only reads this clone, so
        // concurrent eviction cannot pull the entry out from under us.
        let local: Option<Arc<CacheEntry<T>>> =
            self.entries.get(&key).map(|entry| Arc::clone(entry.value()));

        let mut request = request;
        if let Some(entry) = &local {
            debug!(uri = %self.inner.uri(), etag = %entry.etag, "attaching If-None-Match");
            request
                .headers
                .push(("If-None-Match".to_string(), entry.etag.clone()));
        }

        let result = self.inner.dispatch(request).await;

        match (result, local) {
            (
                HttpResult::Success {
                    content,
                    etag,
                    http_status,
                },
                _,
            ) => {
                if let (Some(content), Some(etag)) = (&content, &etag) {
                    self.entries.insert(
                        key,
                        Arc::new(CacheEntry {
                            content: content.clone(),
                            etag: etag.clone(),
                            timestamp_ns: now_ns(),
                        }),
                    );
                    self.evict_if_needed();
                }
                HttpResult::Success {
                    content,
                    etag,
                    http_status,
                }
            }

            (
                HttpResult::Failure {
                    http_status: Some(304),
                    ..
                },
                Some(entry),
            ) => {
                debug!(uri = %self.inner.uri(), etag = %entry.etag, "304 served from cache");
                HttpResult::success(Some(entry.content.clone()), Some(entry.etag.clone()), 304)
            }

            // Refresh failed but we hold a prior entry: hand the caller the
            // stale content alongside the failure.
            (
                HttpResult::Failure {
                    message,
                    cause,
                    category,
                    http_status,
                    ..
                },
                Some(entry),
            ) => HttpResult::failure_with_fallback(
                message,
                cause,
                Some(entry.content.clone()),
                category,
                Some(entry.etag.clone()),
                http_status,
            ),

            (failure, None) => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ErrorCategory;

    /// Inner adapter scripted with a queue of results.
    struct ScriptedAdapter {
        results: std::sync::Mutex<std::collections::VecDeque<HttpResult<String>>>,
        seen: std::sync::Mutex<Vec<AdapterRequest>>,
    }

    impl ScriptedAdapter {
        fn new(results: Vec<HttpResult<String>>) -> Self {
            Self {
                results: std::sync::Mutex::new(results.into()),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> AdapterRequest {
            self.seen.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl HttpAdapter<String> for ScriptedAdapter {
        fn uri(&self) -> &str {
            "https://api.example.test/items"
        }

        async fn dispatch(&self, request: AdapterRequest) -> HttpResult<String> {
            self.seen.lock().unwrap().push(request);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| HttpResult::failure("script exhausted", None, ErrorCategory::ConfigurationError))
        }
    }

    fn caching(inner: ScriptedAdapter) -> EtagCachingAdapter<String, ScriptedAdapter> {
        EtagCachingAdapter::new(inner, CacheConfig::default())
    }

    #[tokio::test]
    async fn test_first_get_populates_cache() {
        let adapter = caching(ScriptedAdapter::new(vec![HttpResult::success(
            Some("body".into()),
            Some("\"v1\"".into()),
            200,
        )]));
        let result = adapter.get(&[]).await;
        assert!(result.is_success());
        assert_eq!(adapter.cache_len(), 1);
    }

    #[tokio::test]
    async fn test_second_get_sends_if_none_match() {
        let inner = ScriptedAdapter::new(vec![
            HttpResult::success(Some("body".into()), Some("\"v1\"".into()), 200),
            HttpResult::failure_with_fallback("304", None, None, ErrorCategory::InvalidContent, None, Some(304)),
        ]);
        let adapter = caching(inner);

        adapter.get(&[]).await;
        let result = adapter.get(&[]).await;

        // Second request carried the conditional header.
        let second = adapter.inner.request(1);
        assert!(second
            .headers
            .iter()
            .any(|(n, v)| n == "If-None-Match" && v == "\"v1\""));

        // And the 304 was resolved from the local capture.
        assert!(result.is_success());
        assert_eq!(result.content().map(String::as_str), Some("body"));
        assert_eq!(result.etag(), Some("\"v1\""));
        assert_eq!(result.http_status(), Some(304));
    }

    #[tokio::test]
    async fn test_304_without_entry_surfaces_failure() {
        let adapter = caching(ScriptedAdapter::new(vec![HttpResult::failure_with_fallback(
            "304",
            None,
            None,
            ErrorCategory::InvalidContent,
            None,
            Some(304),
        )]));
        let result = adapter.get(&[]).await;
        assert!(result.is_failure());
        assert_eq!(result.error_category(), Some(ErrorCategory::InvalidContent));
    }

    #[tokio::test]
    async fn test_non_get_bypasses_cache() {
        let inner = ScriptedAdapter::new(vec![
            HttpResult::success(Some("created".into()), Some("\"v9\"".into()), 200),
        ]);
        let adapter = caching(inner);
        let request = AdapterRequest::new(HttpMethod::Post);
        let result = adapter.dispatch(request).await;
        assert!(result.is_success());
        // Neither consulted nor populated.
        assert_eq!(adapter.cache_len(), 0);
        assert!(adapter.inner.request(0).headers.is_empty());
    }

    #[tokio::test]
    async fn test_failure_with_prior_entry_carries_fallback() {
        let inner = ScriptedAdapter::new(vec![
            HttpResult::success(Some("body".into()), Some("\"v1\"".into()), 200),
            HttpResult::failure_with_fallback("HTTP 503", None, None, ErrorCategory::ServerError, None, Some(503)),
        ]);
        let adapter = caching(inner);

        adapter.get(&[]).await;
        let result = adapter.get(&[]).await;

        assert!(result.is_failure());
        assert_eq!(result.error_category(), Some(ErrorCategory::ServerError));
        assert_eq!(result.content().map(String::as_str), Some("body"));
        assert_eq!(result.etag(), Some("\"v1\""));
    }

    #[tokio::test]
    async fn test_success_without_etag_not_cached() {
        let adapter = caching(ScriptedAdapter::new(vec![HttpResult::success(
            Some("body".into()),
            None,
            200,
        )]));
        adapter.get(&[]).await;
        assert_eq!(adapter.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let adapter = caching(ScriptedAdapter::new(vec![HttpResult::success(
            Some("body".into()),
            Some("\"v1\"".into()),
            200,
        )]));
        adapter.get(&[]).await;
        assert_eq!(adapter.cache_len(), 1);
        adapter.clear();
        assert_eq!(adapter.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_distinct_headers_use_distinct_slots() {
        let inner = ScriptedAdapter::new(vec![
            HttpResult::success(Some("t1".into()), Some("\"a\"".into()), 200),
            HttpResult::success(Some("t2".into()), Some("\"b\"".into()), 200),
        ]);
        let adapter = caching(inner);
        adapter.get(&[("X-Tenant".into(), "t1".into())]).await;
        adapter.get(&[("X-Tenant".into(), "t2".into())]).await;
        assert_eq!(adapter.cache_len(), 2);
        // The second request saw no If-None-Match: different slot.
        assert!(!adapter
            .inner
            .request(1)
            .headers
            .iter()
            .any(|(n, _)| n == "If-None-Match"));
    }

    #[tokio::test]
    async fn test_eviction_bounds_cache_size() {
        let results: Vec<HttpResult<String>> = (0..40)
            .map(|i| HttpResult::success(Some(format!("body{}", i)), Some(format!("\"v{}\"", i)), 200))
            .collect();
        let inner = ScriptedAdapter::new(results);
        let adapter = EtagCachingAdapter::new(
            inner,
            CacheConfig {
                max_cache_size: 20,
                header_filter: CacheKeyHeaderFilter::all(),
            },
        );
        for i in 0..40 {
            adapter.get(&[("X-Slot".into(), i.to_string())]).await;
        }
        // Eviction runs on every overflow; the map never grows far past the
        // configured bound.
        assert!(adapter.cache_len() <= 21, "len = {}", adapter.cache_len());
    }
}

//! Cache-key composition and the header filter that shapes it.
//!
//! The cache key for a GET is the request URI plus every header the
//! configured [`CacheKeyHeaderFilter`] admits, lowercased and sorted so
//! header order on the wire never splits cache slots. The default filter
//! includes every header — the safe choice for multi-tenant callers, where
//! two principals must never share a cached response. Callers that rotate
//! bearer tokens typically exclude `Authorization` to avoid a fresh cache
//! slot per token.

use std::collections::HashSet;
use std::sync::Arc;

/// Case-insensitive predicate over header names with combinators.
///
/// # Example
///
/// ```rust
/// use rampart_client::CacheKeyHeaderFilter;
///
/// let filter = CacheKeyHeaderFilter::excluding(["authorization"])
///     .and(CacheKeyHeaderFilter::excluding_prefix("x-trace-"));
///
/// assert!(filter.includes("Accept"));
/// assert!(!filter.includes("AUTHORIZATION"));
/// assert!(!filter.includes("X-Trace-Id"));
/// ```
#[derive(Clone)]
pub struct CacheKeyHeaderFilter {
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl CacheKeyHeaderFilter {
    fn from_predicate(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Include every header. The default.
    pub fn all() -> Self {
        Self::from_predicate(|_| true)
    }

    /// Include no header; the key is the URI alone.
    pub fn none() -> Self {
        Self::from_predicate(|_| false)
    }

    /// Include only the named headers.
    pub fn including<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_ascii_lowercase())
            .collect();
        Self::from_predicate(move |name| set.contains(name))
    }

    /// Include everything except the named headers.
    pub fn excluding<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_ascii_lowercase())
            .collect();
        Self::from_predicate(move |name| !set.contains(name))
    }

    /// Exclude every header starting with `prefix`.
    pub fn excluding_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().to_ascii_lowercase();
        Self::from_predicate(move |name| !name.starts_with(&prefix))
    }

    /// Arbitrary predicate; receives the lowercased header name.
    pub fn matching(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::from_predicate(predicate)
    }

    /// Both filters must admit the header.
    pub fn and(self, other: Self) -> Self {
        Self::from_predicate(move |name| (self.predicate)(name) && (other.predicate)(name))
    }

    /// Either filter may admit the header.
    pub fn or(self, other: Self) -> Self {
        Self::from_predicate(move |name| (self.predicate)(name) || (other.predicate)(name))
    }

    /// Invert the filter.
    pub fn negate(self) -> Self {
        Self::from_predicate(move |name| !(self.predicate)(name))
    }

    /// Whether a header participates in cache-key composition.
    pub fn includes(&self, name: &str) -> bool {
        (self.predicate)(&name.to_ascii_lowercase())
    }
}

impl Default for CacheKeyHeaderFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl std::fmt::Debug for CacheKeyHeaderFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CacheKeyHeaderFilter")
    }
}

/// Deterministic cache key: URI plus the sorted, filtered header pairs.
pub(crate) fn compose_cache_key(
    uri: &str,
    headers: &[(String, String)],
    filter: &CacheKeyHeaderFilter,
) -> String {
    let mut pairs: Vec<String> = headers
        .iter()
        .filter(|(name, _)| filter.includes(name))
        .map(|(name, value)| format!("{}:{}", name.to_ascii_lowercase(), value))
        .collect();
    pairs.sort_unstable();

    let mut key = String::with_capacity(uri.len() + pairs.iter().map(String::len).sum::<usize>());
    key.push_str(uri);
    for pair in pairs {
        key.push('|');
        key.push_str(&pair);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_and_none() {
        assert!(CacheKeyHeaderFilter::all().includes("Anything"));
        assert!(!CacheKeyHeaderFilter::none().includes("Anything"));
    }

    #[test]
    fn test_including_case_insensitive() {
        let filter = CacheKeyHeaderFilter::including(["Accept", "ACCEPT-LANGUAGE"]);
        assert!(filter.includes("accept"));
        assert!(filter.includes("Accept-Language"));
        assert!(!filter.includes("Authorization"));
    }

    #[test]
    fn test_excluding() {
        let filter = CacheKeyHeaderFilter::excluding(["authorization"]);
        assert!(!filter.includes("Authorization"));
        assert!(filter.includes("Accept"));
    }

    #[test]
    fn test_excluding_prefix() {
        let filter = CacheKeyHeaderFilter::excluding_prefix("X-Internal-");
        assert!(!filter.includes("x-internal-debug"));
        assert!(filter.includes("x-request-id"));
    }

    #[test]
    fn test_combinators() {
        let filter = CacheKeyHeaderFilter::all()
            .and(CacheKeyHeaderFilter::excluding(["authorization"]));
        assert!(!filter.includes("authorization"));
        assert!(filter.includes("accept"));

        let either = CacheKeyHeaderFilter::including(["a"]).or(CacheKeyHeaderFilter::including(["b"]));
        assert!(either.includes("a"));
        assert!(either.includes("b"));
        assert!(!either.includes("c"));

        let inverted = CacheKeyHeaderFilter::including(["a"]).negate();
        assert!(!inverted.includes("a"));
        assert!(inverted.includes("b"));
    }

    #[test]
    fn test_matching_predicate() {
        let filter = CacheKeyHeaderFilter::matching(|name| name.len() <= 6);
        assert!(filter.includes("Accept"));
        assert!(!filter.includes("Authorization"));
    }

    #[test]
    fn test_key_stable_under_header_order() {
        let filter = CacheKeyHeaderFilter::all();
        let a = compose_cache_key(
            "https://h/x",
            &headers(&[("Accept", "json"), ("X-Tenant", "t1")]),
            &filter,
        );
        let b = compose_cache_key(
            "https://h/x",
            &headers(&[("X-Tenant", "t1"), ("accept", "json")]),
            &filter,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_filtered_headers_do_not_split_slots() {
        let filter = CacheKeyHeaderFilter::excluding(["authorization"]);
        let a = compose_cache_key(
            "https://h/x",
            &headers(&[("Authorization", "Bearer t1")]),
            &filter,
        );
        let b = compose_cache_key(
            "https://h/x",
            &headers(&[("Authorization", "Bearer t2")]),
            &filter,
        );
        assert_eq!(a, b);
        assert_eq!(a, "https://h/x");
    }

    #[test]
    fn test_different_values_split_slots() {
        let filter = CacheKeyHeaderFilter::all();
        let a = compose_cache_key("https://h/x", &headers(&[("X-Tenant", "t1")]), &filter);
        let b = compose_cache_key("https://h/x", &headers(&[("X-Tenant", "t2")]), &filter);
        assert_ne!(a, b);
    }
}

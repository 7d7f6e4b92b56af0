use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Identity of an intercepted request: method plus normalized URL.
///
/// The method is uppercased and the URL fragment is dropped on construction,
/// so two keys built from equivalent requests compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestKey {
    method: String,
    url: Url,
}

impl RequestKey {
    pub fn new(method: &str, url: Url) -> Self {
        let mut url = url;
        url.set_fragment(None);
        Self {
            method: method.to_ascii_uppercase(),
            url,
        }
    }

    /// Shorthand for the common case.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Exact identity string: method plus the full URL, query included.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Query-insensitive identity string: method, origin and path only.
    pub fn path_key(&self) -> String {
        format!(
            "{} {}{}",
            self.method,
            self.url.origin().ascii_serialization(),
            self.url.path()
        )
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Classification of where a response came from, relative to the agent's
/// origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same-origin, non-redirected fetch.
    Basic,
    /// Cross-origin fetch with readable body.
    Cors,
    /// Cross-origin fetch with an unreadable body.
    Opaque,
}

/// A response as held by the cache or handed back to the caller.
///
/// `Clone` is the duplication step: a stored copy and a returned copy are
/// fully independent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body bytes
    pub body: Vec<u8>,
    /// Origin-type classification
    pub kind: ResponseKind,
}

impl CachedResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn is_basic(&self) -> bool {
        self.kind == ResponseKind::Basic
    }

    /// Body as UTF-8, lossy. Mostly useful in assertions.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A single bucket entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Exact identity string of the request this entry answers
    pub key: String,
    /// Query-insensitive identity string, for lenient matching
    pub path_key: String,
    /// The stored response
    pub response: CachedResponse,
    /// When this entry was first created
    pub created_at: DateTime<Utc>,
    /// When this entry was last served
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: &RequestKey, response: CachedResponse) -> Self {
        let now = Utc::now();
        Self {
            key: key.cache_key(),
            path_key: key.path_key(),
            response,
            created_at: now,
            last_accessed: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(method: &str, url: &str) -> RequestKey {
        RequestKey::new(method, Url::parse(url).unwrap())
    }

    #[test]
    fn test_key_normalization() {
        let a = key("get", "https://example.com/app/index.html#section");
        let b = key("GET", "https://example.com/app/index.html");
        assert_eq!(a, b);
        assert_eq!(a.method(), "GET");
        assert_eq!(a.cache_key(), "GET https://example.com/app/index.html");
    }

    #[test]
    fn test_path_key_drops_query() {
        let a = key("GET", "https://example.com/app/page?v=1");
        let b = key("GET", "https://example.com/app/page?v=2");
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(a.path_key(), b.path_key());
        assert_eq!(a.path_key(), "GET https://example.com/app/page");
    }

    #[test]
    fn test_cloned_response_is_independent() {
        let original = CachedResponse {
            status: 200,
            headers: HashMap::new(),
            body: b"hello".to_vec(),
            kind: ResponseKind::Basic,
        };
        let mut copy = original.clone();
        copy.body.clear();
        copy.status = 500;
        assert_eq!(original.status, 200);
        assert_eq!(original.body_text(), "hello");
    }
}

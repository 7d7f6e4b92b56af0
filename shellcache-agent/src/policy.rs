//! The caching policy: which requests the agent governs and which responses
//! it is allowed to store. Historically this behavior existed as several
//! near-identical deployments differing only in matching strictness and
//! activation eagerness; those differences survive here as flags on a single
//! implementation.

use serde::Deserialize;
use shellcache_store::{CachedResponse, MatchMode, RequestKey};
use url::Url;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CachePolicy {
    /// Compare full URLs on lookup, query string included. When false the
    /// query string is ignored.
    pub exact_path_match: bool,
    /// Take control immediately after a successful install instead of
    /// waiting for the previous version's clients to go away.
    pub eager_activate: bool,
    /// Store successful responses for requests outside the asset manifest.
    pub opportunistic_store: bool,
    /// Require stored URLs to sit under the scope prefix, not merely share
    /// its origin.
    pub store_within_scope_only: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            exact_path_match: true,
            eager_activate: false,
            opportunistic_store: true,
            store_within_scope_only: true,
        }
    }
}

impl CachePolicy {
    pub fn match_mode(&self) -> MatchMode {
        if self.exact_path_match {
            MatchMode::Exact
        } else {
            MatchMode::IgnoreQuery
        }
    }

    /// Whether the agent handles this request at all. Anything refused here
    /// passes through to the host's default network behavior untouched:
    /// non-GET methods, non-http(s) schemes (e.g. browser extensions), and
    /// requests to other origins.
    pub fn governs(&self, request: &RequestKey, scope: &Url) -> bool {
        request.is_get()
            && matches!(request.url().scheme(), "http" | "https")
            && same_origin(request.url(), scope)
    }

    /// Whether a network response may be written to the bucket. Only full
    /// 200 responses classified as same-origin "basic" are ever eligible;
    /// the flags narrow that further.
    pub fn should_store(
        &self,
        request: &RequestKey,
        response: &CachedResponse,
        scope: &Url,
        manifest_urls: &[Url],
    ) -> bool {
        if !response.is_ok() || !response.is_basic() {
            return false;
        }
        if self.store_within_scope_only
            && !request.url().as_str().starts_with(scope.as_str())
        {
            return false;
        }
        if !self.opportunistic_store && !manifest_urls.contains(request.url()) {
            return false;
        }
        true
    }
}

/// Scheme + host + port equality.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellcache_store::ResponseKind;
    use std::collections::HashMap;

    fn scope() -> Url {
        Url::parse("https://example.com/myapp/").unwrap()
    }

    fn get_key(url: &str) -> RequestKey {
        RequestKey::get(Url::parse(url).unwrap())
    }

    fn response(status: u16, kind: ResponseKind) -> CachedResponse {
        CachedResponse {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
            kind,
        }
    }

    #[test]
    fn test_governs_only_same_origin_http_gets() {
        let policy = CachePolicy::default();

        assert!(policy.governs(&get_key("https://example.com/myapp/a"), &scope()));
        // other path on the same origin is still governed
        assert!(policy.governs(&get_key("https://example.com/other"), &scope()));

        let post = RequestKey::new(
            "POST",
            Url::parse("https://example.com/myapp/a").unwrap(),
        );
        assert!(!policy.governs(&post, &scope()));
        assert!(!policy.governs(&get_key("https://cdn.example.net/a"), &scope()));
        assert!(
            !policy.governs(&get_key("chrome-extension://abcdef/a"), &scope())
        );
    }

    #[test]
    fn test_should_store_requires_200_basic() {
        let policy = CachePolicy::default();
        let request = get_key("https://example.com/myapp/page");

        assert!(policy.should_store(
            &request,
            &response(200, ResponseKind::Basic),
            &scope(),
            &[],
        ));
        assert!(!policy.should_store(
            &request,
            &response(404, ResponseKind::Basic),
            &scope(),
            &[],
        ));
        assert!(!policy.should_store(
            &request,
            &response(200, ResponseKind::Cors),
            &scope(),
            &[],
        ));
        assert!(!policy.should_store(
            &request,
            &response(200, ResponseKind::Opaque),
            &scope(),
            &[],
        ));
    }

    #[test]
    fn test_scope_prefix_restriction() {
        let request = get_key("https://example.com/other/page");
        let ok = response(200, ResponseKind::Basic);

        let strict = CachePolicy::default();
        assert!(!strict.should_store(&request, &ok, &scope(), &[]));

        let lenient = CachePolicy {
            store_within_scope_only: false,
            ..CachePolicy::default()
        };
        assert!(lenient.should_store(&request, &ok, &scope(), &[]));
    }

    #[test]
    fn test_manifest_only_store() {
        let policy = CachePolicy {
            opportunistic_store: false,
            ..CachePolicy::default()
        };
        let ok = response(200, ResponseKind::Basic);
        let manifest =
            vec![Url::parse("https://example.com/myapp/index.html").unwrap()];

        let listed = get_key("https://example.com/myapp/index.html");
        assert!(policy.should_store(&listed, &ok, &scope(), &manifest));

        let unlisted = get_key("https://example.com/myapp/extra.css");
        assert!(!policy.should_store(&unlisted, &ok, &scope(), &manifest));
    }

    #[test]
    fn test_match_mode_follows_strictness() {
        assert_eq!(CachePolicy::default().match_mode(), MatchMode::Exact);
        let lenient = CachePolicy {
            exact_path_match: false,
            ..CachePolicy::default()
        };
        assert_eq!(lenient.match_mode(), MatchMode::IgnoreQuery);
    }
}

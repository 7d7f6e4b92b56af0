//! Network interface consumed by the agent. The trait keeps a seam between
//! the caching policy and the actual HTTP stack, so tests can substitute a
//! scripted implementation; `HttpNetwork` (behind the `http` feature) is the
//! reqwest-backed production one.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use shellcache_store::{CachedResponse, RequestKey};

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unsupported method: {0}")]
    Method(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request and return the full response. Transport failures
    /// (offline, refused, reset) are errors; HTTP error statuses are not.
    async fn fetch(
        &self,
        request: &RequestKey,
    ) -> Result<CachedResponse, NetworkError>;
}

pub type AbstractNetwork = Arc<dyn Network + Send + Sync>;

#[cfg(feature = "http")]
pub use http_impl::{build_http_client, HttpNetwork};

#[cfg(feature = "http")]
mod http_impl {
    use super::{Network, NetworkError};
    use async_trait::async_trait;
    use shellcache_store::{CachedResponse, RequestKey, ResponseKind};
    use std::collections::HashMap;
    use url::Url;

    use crate::policy::same_origin;

    /// Build the client used by `HttpNetwork`. No request timeout is set:
    /// the agent never gives up on a slow origin, the caller does.
    pub fn build_http_client(
        user_agent: &str,
    ) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::ClientBuilder::new()
            .use_rustls_tls()
            .user_agent(user_agent)
            .build()
    }

    /// reqwest-backed `Network` implementation. Classifies each response
    /// against the agent's scope origin.
    #[derive(Debug, Clone)]
    pub struct HttpNetwork {
        client: reqwest::Client,
        scope: Url,
    }

    impl HttpNetwork {
        pub fn new(scope: Url) -> Result<Self, NetworkError> {
            let client = build_http_client(concat!(
                "shellcache/",
                env!("CARGO_PKG_VERSION")
            ))?;
            Ok(Self { client, scope })
        }

        /// Use a preconfigured client (proxies, extra headers, ...).
        pub fn with_client(scope: Url, client: reqwest::Client) -> Self {
            Self { client, scope }
        }

        /// A response is "basic" only when the request and the final URL
        /// (after any redirects) both stay on the scope's origin.
        fn classify(&self, request_url: &Url, final_url: &Url) -> ResponseKind {
            if same_origin(request_url, &self.scope)
                && same_origin(final_url, &self.scope)
            {
                ResponseKind::Basic
            } else {
                ResponseKind::Cors
            }
        }
    }

    #[async_trait]
    impl Network for HttpNetwork {
        async fn fetch(
            &self,
            request: &RequestKey,
        ) -> Result<CachedResponse, NetworkError> {
            let method = reqwest::Method::from_bytes(request.method().as_bytes())
                .map_err(|_| NetworkError::Method(request.method().to_string()))?;

            let response = self
                .client
                .request(method, request.url().clone())
                .send()
                .await?;

            let status = response.status().as_u16();
            let final_url = response.url().clone();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.to_string(), v.to_string()))
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(CachedResponse {
                status,
                headers,
                body,
                kind: self.classify(request.url(), &final_url),
            })
        }
    }

}

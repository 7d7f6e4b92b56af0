//! Convenience re-exports of the types most applications touch.

pub use shellcache_agent::{
    AgentConfig, AgentConfigBuilder, AgentError, AgentState, CacheAgent,
    CachePolicy, ClientId, ClientRegistry, ConfigError, EventOutcome,
    FetchOutcome, LifecycleEvent, Network, NetworkError, Registration,
};
#[cfg(feature = "http")]
pub use shellcache_agent::{build_http_client, HttpNetwork};
pub use shellcache_store::{
    BucketStore, CacheEntry, CachedResponse, InMemoryBucketStore, MatchMode,
    RequestKey, ResponseKind, StoreError,
};

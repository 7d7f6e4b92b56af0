//! Offline asset cache agent for app-shell style deployments.
//!
//! One agent version owns one named cache bucket. At install time it
//! pre-populates the bucket with a fixed manifest of assets as an atomic
//! group; at activation it deletes buckets left behind by older versions and
//! claims the open clients; while active it intercepts GET requests within
//! its scope and answers them cache-first, falling back to the network and
//! opportunistically storing successful same-origin responses.
//!
//! Storage and network sit behind traits (`shellcache_store::BucketStore`,
//! `Network`), so the agent can run against the in-memory store and a
//! scripted network in tests, or reqwest (`http` feature) in production.

pub mod agent;
pub mod clients;
pub mod config;
pub mod events;
pub mod network;
pub mod policy;
pub mod registration;
pub mod state;

pub use agent::CacheAgent;
pub use clients::{ClientId, ClientRegistry};
pub use config::{AgentConfig, AgentConfigBuilder, ConfigError};
pub use events::{EventOutcome, FetchOutcome, LifecycleEvent};
#[cfg(feature = "http")]
pub use network::{build_http_client, HttpNetwork};
pub use network::{AbstractNetwork, Network, NetworkError};
pub use policy::{same_origin, CachePolicy};
pub use registration::Registration;
pub use state::AgentState;

use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Store error: {0}")]
    Store(#[from] shellcache_store::StoreError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Install failed: asset {url} returned status {status}")]
    PrecacheStatus { url: Url, status: u16 },

    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: AgentState,
    },
}

//! # shellcache - offline app-shell caching
//!
//! `shellcache` is a Rust library implementing the "app shell" offline
//! caching pattern: a versioned cache agent that pre-populates a named
//! bucket with a fixed manifest of static assets, intercepts GET requests
//! within its scope, and answers them cache-first with a network fallback,
//! so previously-cached assets stay available while offline.
//!
//! ## Features
//!
//! - **Versioned cache buckets**: one bucket per agent version; buckets left
//!   behind by older versions are garbage-collected on activation.
//! - **Atomic pre-population**: the asset manifest is fetched as one group at
//!   install time; a single unreachable asset fails the whole install and
//!   leaves nothing half-written.
//! - **Cache-first request resolution**: cache hit, then network, with
//!   opportunistic storage of successful same-origin responses.
//! - **Install / activate / fetch lifecycle**: event handlers returning
//!   futures the host awaits to completion, with waiting and eager-takeover
//!   activation policies.
//! - **Pluggable storage and network**: trait seams with an in-memory bucket
//!   store and a reqwest-backed network (`http` feature) included.
//!
//! ## Getting Started
//!
//! To use `shellcache` in your project, add it to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! shellcache = { version = "0.1", features = ["http"] }
//! ```
//!
//! ## Modules
//!
//! - `store`: cache bucket storage, entry types and backends.
//! - `agent`: the cache agent, its configuration, policy, lifecycle events
//!   and version registration.
pub mod prelude;

pub use shellcache_agent as agent;
pub use shellcache_store as store;

// re-export
pub use async_trait;
pub use serde;
pub use thiserror;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;
pub use url;

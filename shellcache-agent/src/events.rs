//! Lifecycle events delivered by the host. Each event handler returns a
//! future; the host's "extend this event until the work is done" contract
//! maps to awaiting `CacheAgent::dispatch` to completion before treating the
//! event as finished.

use shellcache_store::{CachedResponse, RequestKey};

#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// A new agent version was registered; pre-populate its bucket.
    Install,
    /// The version is taking control; prune stale buckets, claim clients.
    Activate,
    /// A request was intercepted.
    Fetch(RequestKey),
}

impl LifecycleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::Install => "install",
            LifecycleEvent::Activate => "activate",
            LifecycleEvent::Fetch(_) => "fetch",
        }
    }
}

/// What handling a fetch produced.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The agent answers the request with this response.
    Response(CachedResponse),
    /// The agent does not govern this request; the host's default network
    /// behavior applies, untouched.
    Passthrough,
}

#[derive(Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Install or activate ran to completion.
    Completed,
    Fetch(FetchOutcome),
}

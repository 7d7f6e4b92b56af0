//! The cache agent itself: one long-lived service object per version,
//! owning the bucket named by that version and handling the three lifecycle
//! events against it.

use std::sync::{Arc, RwLock};
use url::Url;

use shellcache_store::{BucketStore, RequestKey};

use crate::clients::ClientRegistry;
use crate::config::AgentConfig;
use crate::events::{EventOutcome, FetchOutcome, LifecycleEvent};
use crate::network::Network;
use crate::state::AgentState;
use crate::AgentError;

pub struct CacheAgent<S, N> {
    config: AgentConfig,
    // manifest resolved against the scope once, at construction
    manifest_urls: Vec<Url>,
    store: Arc<S>,
    network: Arc<N>,
    clients: Arc<ClientRegistry>,
    state: RwLock<AgentState>,
}

impl<S, N> CacheAgent<S, N>
where
    S: BucketStore,
    N: Network,
{
    pub fn new(
        config: AgentConfig,
        store: Arc<S>,
        network: Arc<N>,
        clients: Arc<ClientRegistry>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let manifest_urls = config.asset_urls()?;
        Ok(Self {
            config,
            manifest_urls,
            store,
            network,
            clients,
            state: RwLock::new(AgentState::Installing),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The version identifier, which is also the bucket name.
    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub fn state(&self) -> AgentState {
        *self.state.read().unwrap()
    }

    pub(crate) fn set_state(&self, new_state: AgentState) {
        let mut state = self.state.write().unwrap();
        if *state != new_state {
            tracing::debug!(
                version = %self.config.cache_name,
                from = %state,
                to = %new_state,
                "state transition"
            );
            *state = new_state;
        }
    }

    fn expect_state(
        &self,
        expected: AgentState,
        name: &'static str,
    ) -> Result<(), AgentError> {
        let actual = self.state();
        if actual == expected {
            Ok(())
        } else {
            Err(AgentError::InvalidState {
                expected: name,
                actual,
            })
        }
    }

    /// Route one host event to its handler, running it to completion.
    pub async fn dispatch(
        &self,
        event: LifecycleEvent,
    ) -> Result<EventOutcome, AgentError> {
        match event {
            LifecycleEvent::Install => {
                self.handle_install().await.map(|_| EventOutcome::Completed)
            }
            LifecycleEvent::Activate => {
                self.handle_activate().await.map(|_| EventOutcome::Completed)
            }
            LifecycleEvent::Fetch(request) => self
                .handle_fetch(&request)
                .await
                .map(EventOutcome::Fetch),
        }
    }

    /// Install: open the bucket and pre-populate it with the manifest as one
    /// atomic group. Any unreachable asset fails the whole step and nothing
    /// is written.
    pub async fn handle_install(&self) -> Result<(), AgentError> {
        self.expect_state(AgentState::Installing, "installing")?;
        self.store.open_bucket(&self.config.cache_name).await?;
        tracing::info!(bucket = %self.config.cache_name, "caching app shell");

        match self.precache().await {
            Ok(()) => {
                self.set_state(AgentState::Installed);
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    bucket = %self.config.cache_name,
                    error = %err,
                    "install failed, one or more assets unavailable"
                );
                Err(err)
            }
        }
    }

    async fn precache(&self) -> Result<(), AgentError> {
        // fetch the whole group before writing anything, so a failed install
        // never leaves a partial set behind
        let mut staged = Vec::with_capacity(self.manifest_urls.len());
        for url in &self.manifest_urls {
            let key = RequestKey::get(url.clone());
            let response = self.network.fetch(&key).await?;
            if !response.is_ok() {
                return Err(AgentError::PrecacheStatus {
                    url: url.clone(),
                    status: response.status,
                });
            }
            staged.push((key, response));
        }
        self.store
            .put_many(&self.config.cache_name, staged)
            .await?;
        Ok(())
    }

    /// Activate: garbage-collect buckets left by other versions, then claim
    /// every open client so this version serves it without a reload.
    pub async fn handle_activate(&self) -> Result<(), AgentError> {
        self.expect_state(AgentState::Installed, "installed")?;
        self.set_state(AgentState::Activating);

        for name in self.store.list_buckets().await? {
            if name != self.config.cache_name {
                tracing::debug!(bucket = %name, "deleting stale bucket");
                self.store.delete_bucket(&name).await?;
            }
        }

        self.clients.claim_all(&self.config.cache_name);
        self.set_state(AgentState::Activated);
        Ok(())
    }

    /// Fetch: cache first, network second. Successful same-origin responses
    /// are duplicated into the bucket on the way back; everything else is
    /// returned as-is. Requests the agent does not govern pass through
    /// untouched.
    pub async fn handle_fetch(
        &self,
        request: &RequestKey,
    ) -> Result<FetchOutcome, AgentError> {
        if !self.state().can_intercept_fetch() {
            return Ok(FetchOutcome::Passthrough);
        }
        if !self.config.policy.governs(request, &self.config.scope) {
            return Ok(FetchOutcome::Passthrough);
        }

        let mode = self.config.policy.match_mode();
        if let Some(cached) = self
            .store
            .match_request(&self.config.cache_name, request, mode)
            .await?
        {
            tracing::debug!(url = %request.url(), "serving from cache");
            return Ok(FetchOutcome::Response(cached));
        }

        // cache miss: go to the network, propagating transport failures
        let response = self.network.fetch(request).await?;

        if self.config.policy.should_store(
            request,
            &response,
            &self.config.scope,
            &self.manifest_urls,
        ) {
            let copy = response.clone();
            if let Err(err) = self
                .store
                .put(&self.config.cache_name, request, copy)
                .await
            {
                // best effort: the caller still gets the response
                tracing::warn!(
                    url = %request.url(),
                    error = %err,
                    "cache write failed"
                );
            }
        }

        Ok(FetchOutcome::Response(response))
    }
}

impl<S, N> std::fmt::Debug for CacheAgent<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAgent")
            .field("cache_name", &self.config.cache_name)
            .field("state", &*self.state.read().unwrap())
            .finish()
    }
}

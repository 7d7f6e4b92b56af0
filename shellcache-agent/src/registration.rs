//! Version management for one scope: at most one active agent serving
//! fetches and at most one installed agent waiting to take over. A failed
//! install never unseats the version currently in control.

use std::sync::{Arc, RwLock};

use shellcache_store::{BucketStore, RequestKey};

use crate::agent::CacheAgent;
use crate::clients::ClientRegistry;
use crate::config::AgentConfig;
use crate::events::{FetchOutcome, LifecycleEvent};
use crate::network::Network;
use crate::state::AgentState;
use crate::AgentError;

pub struct Registration<S, N> {
    store: Arc<S>,
    network: Arc<N>,
    clients: Arc<ClientRegistry>,
    active: RwLock<Option<Arc<CacheAgent<S, N>>>>,
    waiting: RwLock<Option<Arc<CacheAgent<S, N>>>>,
}

impl<S, N> Registration<S, N>
where
    S: BucketStore,
    N: Network,
{
    pub fn new(store: Arc<S>, network: Arc<N>) -> Self {
        Self {
            store,
            network,
            clients: Arc::new(ClientRegistry::new()),
            active: RwLock::new(None),
            waiting: RwLock::new(None),
        }
    }

    pub fn clients(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.clients)
    }

    pub fn active(&self) -> Option<Arc<CacheAgent<S, N>>> {
        self.active.read().unwrap().clone()
    }

    pub fn waiting(&self) -> Option<Arc<CacheAgent<S, N>>> {
        self.waiting.read().unwrap().clone()
    }

    /// Register a new agent version and run its install. On success the
    /// version either waits, or takes over right away when its policy says
    /// so or nothing is active yet. On failure the version is discarded and
    /// whatever was in control stays in control.
    pub async fn register(
        &self,
        config: AgentConfig,
    ) -> Result<AgentState, AgentError> {
        let eager = config.policy.eager_activate;
        let agent = Arc::new(CacheAgent::new(
            config,
            Arc::clone(&self.store),
            Arc::clone(&self.network),
            Arc::clone(&self.clients),
        )?);

        if let Err(err) = agent.dispatch(LifecycleEvent::Install).await {
            agent.set_state(AgentState::Redundant);
            tracing::error!(
                version = %agent.cache_name(),
                "install rejected, previous version stays in control"
            );
            return Err(err);
        }

        if let Some(displaced) = self
            .waiting
            .write()
            .unwrap()
            .replace(Arc::clone(&agent))
        {
            displaced.set_state(AgentState::Redundant);
        }

        let nothing_active = self.active.read().unwrap().is_none();
        if eager || nothing_active {
            self.activate_waiting().await?;
        }
        Ok(agent.state())
    }

    /// Promote the waiting version, if any: run its activate event, then
    /// retire the previously active one. No-op without a waiting version.
    pub async fn activate_waiting(&self) -> Result<(), AgentError> {
        let Some(agent) = self.waiting.write().unwrap().take() else {
            return Ok(());
        };

        if let Err(err) = agent.dispatch(LifecycleEvent::Activate).await {
            agent.set_state(AgentState::Redundant);
            return Err(err);
        }

        if let Some(old) = self.active.write().unwrap().replace(agent) {
            old.set_state(AgentState::Redundant);
        }
        Ok(())
    }

    /// Route an intercepted request to the active version. With nothing
    /// active the request passes through untouched.
    pub async fn handle_fetch(
        &self,
        request: &RequestKey,
    ) -> Result<FetchOutcome, AgentError> {
        match self.active() {
            Some(agent) => agent.handle_fetch(request).await,
            None => Ok(FetchOutcome::Passthrough),
        }
    }
}

impl<S, N> std::fmt::Debug for Registration<S, N>
where
    S: BucketStore,
    N: Network,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |slot: &RwLock<Option<Arc<CacheAgent<S, N>>>>| {
            slot.read()
                .unwrap()
                .as_ref()
                .map(|agent| agent.cache_name().to_string())
        };
        f.debug_struct("Registration")
            .field("active", &name(&self.active))
            .field("waiting", &name(&self.waiting))
            .finish()
    }
}

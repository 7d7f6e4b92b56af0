//! Registry of open clients (pages) and which agent version controls them.
//! A freshly connected client is uncontrolled until an activating agent
//! claims it; claimed clients are served by that version without a reload.

use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
pub struct ClientRegistry {
    // client -> controlling version name, None while uncontrolled
    clients: Mutex<HashMap<ClientId, Option<String>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client opened within the scope.
    pub fn connect(&self) -> ClientId {
        let id = ClientId::new();
        self.clients.lock().unwrap().insert(id, None);
        id
    }

    /// A client navigated away or closed.
    pub fn disconnect(&self, id: ClientId) {
        self.clients.lock().unwrap().remove(&id);
    }

    /// Put every connected client under the given version's control.
    /// Returns how many clients changed controller.
    pub fn claim_all(&self, version: &str) -> usize {
        let mut clients = self.clients.lock().unwrap();
        let mut claimed = 0;
        for controller in clients.values_mut() {
            if controller.as_deref() != Some(version) {
                *controller = Some(version.to_string());
                claimed += 1;
            }
        }
        if claimed > 0 {
            tracing::debug!(version, claimed, "claimed clients");
        }
        claimed
    }

    pub fn controller(&self, id: ClientId) -> Option<String> {
        self.clients.lock().unwrap().get(&id).cloned().flatten()
    }

    pub fn len(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("clients", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_and_claim() {
        let registry = ClientRegistry::new();
        let a = registry.connect();
        let b = registry.connect();

        assert_eq!(registry.controller(a), None);
        assert_eq!(registry.claim_all("shell-v1"), 2);
        assert_eq!(registry.controller(a).as_deref(), Some("shell-v1"));
        assert_eq!(registry.controller(b).as_deref(), Some("shell-v1"));

        // already controlled by this version, nothing to claim
        assert_eq!(registry.claim_all("shell-v1"), 0);
        // a new version takes over all of them
        assert_eq!(registry.claim_all("shell-v2"), 2);
    }

    #[test]
    fn test_disconnect() {
        let registry = ClientRegistry::new();
        let id = registry.connect();
        assert_eq!(registry.len(), 1);

        registry.disconnect(id);
        assert!(registry.is_empty());
        assert_eq!(registry.controller(id), None);
    }
}

/// Lifecycle states of one agent version.
///
/// The order is installing → installed → activating → activated. `Redundant`
/// is terminal: a version lands there when its install fails or when a newer
/// version takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Install event dispatched, cache being pre-populated
    Installing,
    /// Pre-population succeeded, waiting to take control
    Installed,
    /// Activate event dispatched, stale buckets being pruned
    Activating,
    /// Controlling clients; the only state that intercepts fetches
    Activated,
    /// Replaced or failed; never serves again
    Redundant,
}

impl AgentState {
    /// Fetch interception is active only once activation completed.
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, AgentState::Activated)
    }

    pub fn is_redundant(&self) -> bool {
        matches!(self, AgentState::Redundant)
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentState::Installing => write!(f, "installing"),
            AgentState::Installed => write!(f, "installed"),
            AgentState::Activating => write!(f, "activating"),
            AgentState::Activated => write!(f, "activated"),
            AgentState::Redundant => write!(f, "redundant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_activated_intercepts() {
        assert!(AgentState::Activated.can_intercept_fetch());
        for state in [
            AgentState::Installing,
            AgentState::Installed,
            AgentState::Activating,
            AgentState::Redundant,
        ] {
            assert!(!state.can_intercept_fetch(), "{state} should not intercept");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(AgentState::Installing.to_string(), "installing");
        assert_eq!(AgentState::Redundant.to_string(), "redundant");
    }
}

//! Harness context: the explicit owner of the mock server, the history
//! collaborator and the shared outbound client.

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::history::{InteractionHistory, NoOpHistory};
use crate::invocation::Invocation;
use crate::mock::MockServer;
use std::sync::Arc;

pub struct Harness {
    mock: Arc<MockServer>,
    history: Arc<dyn InteractionHistory>,
    client: reqwest::Client,
}

impl Harness {
    pub fn new(config: &HarnessConfig) -> Result<Self, HarnessError> {
        Ok(Self {
            mock: Arc::new(MockServer::new(&config.mock)),
            history: Arc::new(NoOpHistory),
            client: config.client.build_client()?,
        })
    }

    /// Replace the history collaborator
    pub fn with_history(mut self, history: Arc<dyn InteractionHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn mock(&self) -> &Arc<MockServer> {
        &self.mock
    }

    pub fn history(&self) -> &Arc<dyn InteractionHistory> {
        &self.history
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Start building an invocation against this harness
    pub fn invocation(&self) -> Invocation {
        Invocation::new(
            Arc::clone(&self.mock),
            Arc::clone(&self.history),
            self.client.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistory;
    use crate::invocation::InvocationState;
    use crate::matching::MatchPolicy;

    #[test]
    fn test_new_uses_config() {
        let mut config = HarnessConfig::default();
        config.mock.match_policy = MatchPolicy::FirstMatchWins;
        let harness = Harness::new(&config).unwrap();
        assert_eq!(harness.mock().match_policy(), MatchPolicy::FirstMatchWins);
        assert!(harness.mock().ports().is_empty());
        assert_eq!(harness.invocation().state(), InvocationState::Built);
    }

    #[test]
    fn test_with_history_shares_collaborator() {
        use crate::interaction::{Interaction, InteractionRequest, InteractionResponse, Method};

        let history = Arc::new(InMemoryHistory::new());
        let harness = Harness::new(&HarnessConfig::default())
            .unwrap()
            .with_history(history.clone());

        harness.history().record(&Interaction::new(
            9000,
            InteractionRequest::new(Method::Get, "/"),
            InteractionResponse::default(),
        ));
        assert_eq!(history.len(), 1);
    }
}

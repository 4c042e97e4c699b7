//! Invocation lifecycle.
//!
//! An invocation registers its interactions, makes one outbound call,
//! deregisters the interactions and validates what was observed:
//!
//! ```text
//! Built -> Registered -> Executed -> Deregistered -> Validated
//! ```
//!
//! Interactions are deregistered whether or not the outbound call
//! succeeded. A failed validation leaves the invocation `Deregistered`.

use crate::client::{self, OutboundRequest};
use crate::error::TossError;
use crate::expect::Expectations;
use crate::history::InteractionHistory;
use crate::interaction::Interaction;
use crate::mock::MockServer;
use crate::record::ResponseRecord;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Built,
    Registered,
    Executed,
    Deregistered,
    Validated,
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvocationState::Built => "built",
            InvocationState::Registered => "registered",
            InvocationState::Executed => "executed",
            InvocationState::Deregistered => "deregistered",
            InvocationState::Validated => "validated",
        };
        f.write_str(label)
    }
}

/// One outbound call together with the interactions it should exercise
/// and the expectations its response must meet
pub struct Invocation {
    mock: Arc<MockServer>,
    history: Arc<dyn InteractionHistory>,
    client: reqwest::Client,
    interactions: Vec<Interaction>,
    request: Option<OutboundRequest>,
    expectations: Expectations,
    state: InvocationState,
}

impl Invocation {
    pub fn new(
        mock: Arc<MockServer>,
        history: Arc<dyn InteractionHistory>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            mock,
            history,
            client,
            interactions: Vec::new(),
            request: None,
            expectations: Expectations::default(),
            state: InvocationState::Built,
        }
    }

    pub fn add_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    pub fn request(mut self, request: OutboundRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn expect(mut self, expectations: Expectations) -> Self {
        self.expectations = expectations;
        self
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Interactions of this invocation; after `toss` they carry their final
    /// `exercised` flags
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Run the full lifecycle and return the observed response
    pub async fn toss(&mut self) -> Result<ResponseRecord, TossError> {
        if self.state != InvocationState::Built {
            return Err(TossError::AlreadyTossed(self.state));
        }
        let request = self.request.clone().ok_or(TossError::MissingRequest)?;

        for interaction in &self.interactions {
            self.mock.add_interaction(interaction.clone());
        }
        self.transition(InvocationState::Registered);

        let mut record = client::send(&self.client, &request).await;
        self.transition(InvocationState::Executed);

        self.deregister();
        self.transition(InvocationState::Deregistered);

        record.parse_json();

        if let Some(unexercised) = self.interactions.iter().find(|i| !i.exercised) {
            warn!(id = %unexercised.id, port = unexercised.port, "Interaction was not exercised");
            return Err(TossError::UnexercisedInteraction {
                id: unexercised.id.clone(),
                description: unexercised.describe(),
            });
        }

        self.expectations.validate(&record)?;
        self.transition(InvocationState::Validated);
        Ok(record)
    }

    /// Hand each interaction to history, then remove it from its port.
    /// The removed copy replaces ours so `exercised` reflects the registry.
    fn deregister(&mut self) {
        let history = &self.history;
        for interaction in &mut self.interactions {
            let removed = self.mock.remove_interaction_with(
                interaction.port,
                &interaction.id,
                |stored| history.record(stored),
            );
            match removed {
                Some(removed) => *interaction = removed,
                None => {
                    // Never registered: its port was not started
                    interaction.exercised = false;
                    history.record(interaction);
                }
            }
        }
    }

    fn transition(&mut self, next: InvocationState) {
        debug!(from = %self.state, to = %next, "Invocation state change");
        self.state = next;
    }
}

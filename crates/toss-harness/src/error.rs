//! Error types for the mock server, the harness context and invocations.

use crate::expect::ExpectationError;
use crate::interaction::InteractionId;
use crate::invocation::InvocationState;

/// Errors raised by mock server lifecycle calls
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Failed to bind port {0}: {1}")]
    BindError(u16, String),
}

/// Errors raised while building a harness context
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Terminal outcome of a failed invocation
#[derive(Debug, thiserror::Error)]
pub enum TossError {
    #[error("No outbound request configured")]
    MissingRequest,
    #[error("Invocation already tossed (state: {0})")]
    AlreadyTossed(InvocationState),
    #[error("Interaction not exercised: {description} (id {id})")]
    UnexercisedInteraction {
        id: InteractionId,
        description: String,
    },
    #[error(transparent)]
    Assertion(#[from] ExpectationError),
}

//! Interaction model shared by the mock server and the invocation lifecycle.

mod method;
mod types;

pub use method::{Method, UnknownMethod};
pub use types::{Interaction, InteractionId, InteractionRequest, InteractionResponse};

//! Toss: a contract-testing harness.
//!
//! A test declares the interactions a dependency should see, makes one real
//! outbound call, and checks that every interaction was exercised and the
//! response meets its expectations. Dependencies are simulated by the
//! in-process [`MockServer`].

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod expect;
pub mod history;
pub mod interaction;
pub mod invocation;
pub mod matching;
pub mod mock;
pub mod record;

pub use client::OutboundRequest;
pub use config::HarnessConfig;
pub use context::Harness;
pub use error::{HarnessError, MockError, TossError};
pub use expect::{ExpectationError, Expectations};
pub use history::{InMemoryHistory, InteractionHistory, NoOpHistory};
pub use interaction::{Interaction, InteractionId, InteractionRequest, InteractionResponse, Method};
pub use invocation::{Invocation, InvocationState};
pub use matching::MatchPolicy;
pub use mock::MockServer;
pub use record::{NetworkError, ResponseRecord};

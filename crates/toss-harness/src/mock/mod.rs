//! In-process HTTP mock server.
//!
//! This module provides:
//! - `MockServer`: start/stop of listening ports and interaction registration
//! - `InteractionRegistry`: the ordered, id-unique interaction store of a port
//!
//! Each port binds its own TCP listener and dispatches every request to the
//! matching engine (`crate::matching`).
//!
//! ## Module Structure
//!
//! - `registry`: per-port interaction storage
//! - `port`: per-port state (registry, listener handle, counters)
//! - `handler`: HTTP request handling
//! - `response`: rendering canned and not-found responses
//! - `server`: `MockServer` lifecycle management

mod handler;
mod port;
mod registry;
mod response;
mod server;


pub use registry::InteractionRegistry;
pub use server::MockServer;

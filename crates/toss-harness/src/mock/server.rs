//! MockServer - lifecycle management for mock ports.
//!
//! Each started port runs its own accept loop. Registries are created on the
//! first `start` of a port and survive `stop`/`start` cycles.

use super::handler::handle_mock_request;
use super::port::{ListenerHandle, MockPort};
use crate::config::MockConfig;
use crate::error::MockError;
use crate::interaction::{Interaction, InteractionId};
use crate::matching::MatchPolicy;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

/// In-process HTTP mock server owning any number of ports
pub struct MockServer {
    host: String,
    policy: MatchPolicy,
    /// Port state by port number
    ports: RwLock<HashMap<u16, Arc<MockPort>>>,
    /// Serializes start/stop so listener handles never race
    lifecycle: Mutex<()>,
}

impl MockServer {
    /// Create a mock server from config
    pub fn new(config: &MockConfig) -> Self {
        Self {
            host: config.host.clone(),
            policy: config.match_policy,
            ports: RwLock::new(HashMap::new()),
            lifecycle: Mutex::new(()),
        }
    }

    /// Start listening on `port`.
    ///
    /// Idempotent: a port that is already running is left untouched. A
    /// stopped port keeps its registry. Port `0` binds an ephemeral port.
    /// Returns the bound port.
    pub async fn start(&self, port: u16) -> Result<u16, MockError> {
        let _guard = self.lifecycle.lock().await;

        if port != 0 && self.is_running(port) {
            debug!(port, "Mock server already running");
            return Ok(port);
        }

        let listener = TcpListener::bind((self.host.as_str(), port))
            .await
            .map_err(|e| MockError::BindError(port, e.to_string()))?;
        let bound = listener
            .local_addr()
            .map_err(|e| MockError::BindError(port, e.to_string()))?
            .port();

        let state = {
            let mut ports = self.ports.write();
            Arc::clone(
                ports
                    .entry(bound)
                    .or_insert_with(|| Arc::new(MockPort::new(bound, self.policy))),
            )
        };
        state.attach_listener(spawn_listener(listener, Arc::clone(&state)));

        info!("Mock server listening on {}:{}", self.host, bound);
        Ok(bound)
    }

    /// Stop listening on `port`, closing open connections.
    ///
    /// Unknown or already stopped ports are a no-op. The registry is kept.
    pub async fn stop(&self, port: u16) {
        let _guard = self.lifecycle.lock().await;

        let Some(state) = self.port_state(port) else {
            debug!(port, "Stop requested for unknown port");
            return;
        };

        match state.detach_listener() {
            Some(handle) => {
                handle.shutdown().await;
                info!(port, "Mock server stopped");
            }
            None => debug!(port, "Mock server already stopped"),
        }
    }

    /// Stop every running port
    pub async fn stop_all(&self) {
        for port in self.ports() {
            self.stop(port).await;
        }
    }

    /// Register an interaction on its port.
    ///
    /// Returns `false` and drops the interaction when the port was never
    /// started.
    pub fn add_interaction(&self, interaction: Interaction) -> bool {
        let Some(state) = self.port_state(interaction.port) else {
            warn!(
                port = interaction.port,
                id = %interaction.id,
                "No mock server on port, interaction dropped"
            );
            return false;
        };

        debug!(
            port = interaction.port,
            id = %interaction.id,
            "Registering interaction {}",
            interaction.describe()
        );
        state.insert(interaction);
        true
    }

    /// Remove one interaction, returning its final state
    pub fn remove_interaction(&self, port: u16, id: &InteractionId) -> Option<Interaction> {
        let state = self.port_state(port)?;
        let removed = state.remove(id);
        if removed.is_some() {
            debug!(port, id = %id, "Interaction removed");
        }
        removed
    }

    /// Remove one interaction, first passing its final state to
    /// `before_remove`.
    ///
    /// No request can match the interaction between the callback and the
    /// removal, so both observe the same `exercised` flag.
    pub fn remove_interaction_with<F>(
        &self,
        port: u16,
        id: &InteractionId,
        before_remove: F,
    ) -> Option<Interaction>
    where
        F: FnOnce(&Interaction),
    {
        let state = self.port_state(port)?;
        let removed = state.remove_with(id, before_remove);
        if removed.is_some() {
            debug!(port, id = %id, "Interaction removed");
        }
        removed
    }

    /// Remove every interaction registered on `port`
    pub fn remove_interactions(&self, port: u16) -> Vec<Interaction> {
        self.port_state(port)
            .map(|state| state.drain())
            .unwrap_or_default()
    }

    /// Remove every interaction on every port; running states are unchanged
    pub fn remove_all_interactions(&self) -> Vec<Interaction> {
        let states: Vec<Arc<MockPort>> = self.ports.read().values().cloned().collect();
        states
            .iter()
            .flat_map(|state| state.drain())
            .collect()
    }

    /// Snapshot of a registered interaction
    pub fn interaction(&self, port: u16, id: &InteractionId) -> Option<Interaction> {
        self.port_state(port)?.get(id)
    }

    /// Snapshot of all interactions on a port, in registration order
    pub fn interactions(&self, port: u16) -> Vec<Interaction> {
        self.port_state(port)
            .map(|state| state.snapshot())
            .unwrap_or_default()
    }

    pub fn is_running(&self, port: u16) -> bool {
        self.port_state(port)
            .map(|state| state.is_running())
            .unwrap_or(false)
    }

    /// Ports with state (running or stopped), sorted
    pub fn ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self.ports.read().keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    /// Number of requests a port has received, if it was ever started
    pub fn request_count(&self, port: u16) -> Option<u64> {
        self.port_state(port).map(|state| state.request_count())
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.policy
    }

    fn port_state(&self, port: u16) -> Option<Arc<MockPort>> {
        self.ports.read().get(&port).cloned()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        for state in self.ports.read().values() {
            if let Some(handle) = state.detach_listener() {
                handle.signal();
            }
        }
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new(&MockConfig::default())
    }
}

/// Run the accept loop for one port until shutdown is signalled
fn spawn_listener(listener: TcpListener, state: Arc<MockPort>) -> ListenerHandle {
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
    let port = state.port();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let state = Arc::clone(&state);
                            let mut closed = shutdown_rx.resubscribe();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    let state = Arc::clone(&state);
                                    async move { handle_mock_request(req, state).await }
                                });
                                let connection = http1::Builder::new().serve_connection(io, service);
                                tokio::select! {
                                    result = connection => {
                                        if let Err(e) = result {
                                            debug!("Connection error on port {}: {}", port, e);
                                        }
                                    }
                                    _ = closed.recv() => {
                                        debug!("Closing connection from {} on port {}", addr, port);
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error on port {}: {}", port, e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!("Listener on port {} shutting down", port);
                    break;
                }
            }
        }
    });

    ListenerHandle::new(shutdown_tx, task)
}

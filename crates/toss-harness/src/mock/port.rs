//! State kept for one mock server port.

use super::registry::InteractionRegistry;
use crate::interaction::{Interaction, InteractionId, InteractionResponse};
use crate::matching::{resolve, InboundRequest, MatchPolicy};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;

/// Handle to a running accept loop
pub(crate) struct ListenerHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub(crate) fn new(shutdown_tx: broadcast::Sender<()>, task: JoinHandle<()>) -> Self {
        Self { shutdown_tx, task }
    }

    /// Signal the accept loop and its connections without waiting
    pub(crate) fn signal(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Signal the accept loop and its connections, then wait for the listener
    /// socket to be released.
    pub(crate) async fn shutdown(self) {
        self.signal();
        if let Err(e) = self.task.await {
            warn!("Mock listener task ended abnormally: {}", e);
        }
    }
}

/// Registry, listener and counters for a single port.
///
/// The registry outlives the listener: stopping a port drops the listener
/// handle but keeps every registered interaction.
pub(crate) struct MockPort {
    port: u16,
    policy: MatchPolicy,
    registry: RwLock<InteractionRegistry>,
    listener: Mutex<Option<ListenerHandle>>,
    request_count: AtomicU64,
}

impl MockPort {
    pub(crate) fn new(port: u16, policy: MatchPolicy) -> Self {
        Self {
            port,
            policy,
            registry: RwLock::new(InteractionRegistry::new()),
            listener: Mutex::new(None),
            request_count: AtomicU64::new(0),
        }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn is_running(&self) -> bool {
        self.listener.lock().is_some()
    }

    pub(crate) fn attach_listener(&self, handle: ListenerHandle) {
        *self.listener.lock() = Some(handle);
    }

    pub(crate) fn detach_listener(&self) -> Option<ListenerHandle> {
        self.listener.lock().take()
    }

    pub(crate) fn insert(&self, interaction: Interaction) {
        self.registry.write().insert(interaction);
    }

    pub(crate) fn remove(&self, id: &InteractionId) -> Option<Interaction> {
        self.registry.write().remove(id)
    }

    /// Hand the stored interaction to `before_remove`, then remove it, under
    /// one write guard
    pub(crate) fn remove_with<F>(&self, id: &InteractionId, before_remove: F) -> Option<Interaction>
    where
        F: FnOnce(&Interaction),
    {
        let mut registry = self.registry.write();
        before_remove(registry.get(id)?);
        registry.remove(id)
    }

    pub(crate) fn drain(&self) -> Vec<Interaction> {
        self.registry.write().drain()
    }

    pub(crate) fn get(&self, id: &InteractionId) -> Option<Interaction> {
        self.registry.read().get(id).cloned()
    }

    pub(crate) fn snapshot(&self) -> Vec<Interaction> {
        self.registry.read().iter().cloned().collect()
    }

    pub(crate) fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Match a request against the registry.
    ///
    /// Holds the write lock for the whole scan so exercised flags and
    /// concurrent removals never interleave.
    pub(crate) fn dispatch(&self, request: &InboundRequest) -> Option<InteractionResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let mut registry = self.registry.write();
        resolve(&mut registry, request, self.policy)
    }
}

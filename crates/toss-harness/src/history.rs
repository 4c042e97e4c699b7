//! Interaction history.
//!
//! Every interaction is handed to the history collaborator after its
//! invocation's outbound call settles, before it leaves the registry.

use crate::interaction::Interaction;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Receives interactions once their invocation has executed
pub trait InteractionHistory: Send + Sync {
    fn record(&self, interaction: &Interaction);
}

/// A recorded interaction with the time it was handed over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub recorded_at: DateTime<Utc>,
    pub interaction: Interaction,
}

/// Keeps every recorded interaction in memory, oldest first
#[derive(Default)]
pub struct InMemoryHistory {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.interaction.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Save the history to file (JSON array)
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let entries = self.entries.read();
        let json = serde_json::to_string_pretty(&*entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        fs::write(path, json)?;
        info!("Saved {} interactions to {:?}", entries.len(), path);
        Ok(())
    }
}

impl InteractionHistory for InMemoryHistory {
    fn record(&self, interaction: &Interaction) {
        debug!(id = %interaction.id, port = interaction.port, "Recording interaction");
        self.entries.write().push(HistoryEntry {
            recorded_at: Utc::now(),
            interaction: interaction.clone(),
        });
    }
}

/// Discards everything; the default collaborator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHistory;

impl InteractionHistory for NoOpHistory {
    fn record(&self, _interaction: &Interaction) {}
}

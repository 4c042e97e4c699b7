//! Per-port interaction registry.

use crate::interaction::{Interaction, InteractionId};

/// Interactions registered on one port, kept in insertion order.
///
/// Ids are unique: inserting an interaction whose id is already present
/// replaces the stored definition in place.
#[derive(Debug, Clone, Default)]
pub struct InteractionRegistry {
    entries: Vec<Interaction>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interaction; returns the previous definition for the same id.
    ///
    /// Only the matching engine sets `exercised`: a new entry always starts
    /// unexercised and a replacement keeps the stored flag.
    pub fn insert(&mut self, mut interaction: Interaction) -> Option<Interaction> {
        match self.position(&interaction.id) {
            Some(index) => {
                interaction.exercised = self.entries[index].exercised;
                Some(std::mem::replace(&mut self.entries[index], interaction))
            }
            None => {
                interaction.exercised = false;
                self.entries.push(interaction);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &InteractionId) -> Option<Interaction> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    /// Remove every interaction, returning them in insertion order
    pub fn drain(&mut self) -> Vec<Interaction> {
        std::mem::take(&mut self.entries)
    }

    pub fn get(&self, id: &InteractionId) -> Option<&Interaction> {
        self.entries.iter().find(|i| &i.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Interaction> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &InteractionId) -> Option<usize> {
        self.entries.iter().position(|i| &i.id == id)
    }
}

//! Boundary to whatever owns the player's profile.
//!
//! Progression never trusts a write: after appending it re-reads the store
//! and takes that snapshot as the truth.

use {
    bevy::prelude::*,
    std::{
        collections::HashMap,
        ops::{Deref, DerefMut},
    },
    thiserror::Error,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Source of truth for which quests a user has completed.
pub trait ProfileStore: Send + Sync + 'static {
    /// A user without a profile has completed nothing.
    fn completed_quest_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Upsert semantics: ids already recorded for the user are skipped.
    fn append_completed_quest_ids(
        &mut self,
        user_id: &str,
        quest_ids: &[String],
    ) -> Result<(), StoreError>;
}

/// In-process store keyed by user id.
#[derive(Debug, Default, Clone)]
pub struct MemoryProfileStore {
    profiles: HashMap<String, Vec<String>>,
}

impl MemoryProfileStore {
    pub fn with_profile(
        mut self,
        user_id: impl Into<String>,
        completed: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let profile = self.profiles.entry(user_id.into()).or_default();
        for id in completed {
            let id: String = id.into();
            if !profile.contains(&id) {
                profile.push(id);
            }
        }
        self
    }
}

impl ProfileStore for MemoryProfileStore {
    fn completed_quest_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.profiles.get(user_id).cloned().unwrap_or_default())
    }

    fn append_completed_quest_ids(
        &mut self,
        user_id: &str,
        quest_ids: &[String],
    ) -> Result<(), StoreError> {
        let completed = self.profiles.entry(user_id.to_owned()).or_default();
        for id in quest_ids {
            if !completed.contains(id) {
                completed.push(id.clone());
            }
        }
        Ok(())
    }
}

/// The store the running app talks to.
#[derive(Resource)]
pub struct ProfileBackend(Box<dyn ProfileStore>);

impl ProfileBackend {
    pub fn new(store: impl ProfileStore) -> Self {
        Self(Box::new(store))
    }
}

impl Default for ProfileBackend {
    fn default() -> Self {
        Self::new(MemoryProfileStore::default())
    }
}

impl Deref for ProfileBackend {
    type Target = dyn ProfileStore;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for ProfileBackend {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

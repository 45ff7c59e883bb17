mod store;

pub use store::*;

use bevy::prelude::*;

pub struct QuestResourcesPlugin;

impl Plugin for QuestResourcesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CompletedQuests>()
            .init_resource::<Session>()
            .init_resource::<SelectedQuest>()
            .init_resource::<ProfileBackend>()
            .register_type::<CompletedQuests>()
            .register_type::<Session>()
            .register_type::<SelectedQuest>();
    }
}

/// Ids of every quest the signed-in user has completed.
///
/// Semantically a set: appending an id that is already present is a no-op.
/// Order is kept only so snapshots compare predictably.
#[derive(Resource, Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Resource)]
pub struct CompletedQuests {
    ids: Vec<String>,
}

impl CompletedQuests {
    pub fn from_ids(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut completed = Self::default();
        completed.append(ids);
        completed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|completed| completed == id)
    }

    /// Returns how many ids were not already present.
    pub fn append(&mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> usize {
        let mut added = 0;
        for id in ids {
            let id = id.into();
            if !self.contains(&id) {
                self.ids.push(id);
                added += 1;
            }
        }
        added
    }

    /// Replaces the local view with a snapshot read back from the profile store.
    pub fn replace(&mut self, snapshot: impl IntoIterator<Item = impl Into<String>>) {
        self.ids.clear();
        self.append(snapshot);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub const ANONYMOUS_USER_ID: &str = "ee52113d-2876-4884-9d89-becb97bd255e";

/// Who is currently playing.
#[derive(Resource, Reflect, Debug, Clone, PartialEq, Eq)]
#[reflect(Resource)]
pub struct Session {
    pub authenticated: bool,
    pub user_id: String,
    pub display_name: String,
}

impl Session {
    pub fn signed_in(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            authenticated: false,
            user_id: ANONYMOUS_USER_ID.to_string(),
            display_name: "Unknown User".to_string(),
        }
    }
}

/// Quest currently open in the quest box.
#[derive(Resource, Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Resource)]
pub struct SelectedQuest(pub Option<String>);

impl SelectedQuest {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

//! Per-quest components shared by progression and whatever renders the quest log.

use bevy::prelude::*;

pub struct QuestComponentsPlugin;

impl Plugin for QuestComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<QuestStatus>()
            .register_type::<QuestNode>()
            .register_type::<Selected>();
    }
}

/// Derived progression state of a quest.
///
/// Never persisted. It is recomputed from the completed set every time that
/// set changes, and only ever moves forward: `Locked -> Unlocked -> Done`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum QuestStatus {
    Done,
    Unlocked,
    /// Default state, waiting for every earlier quest to be done.
    #[default]
    Locked,
}

impl QuestStatus {
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// Associates an entity with a catalog quest.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct QuestNode {
    pub id: String,
    /// Owning category for sub-quests, `None` for categories themselves.
    pub category: Option<String>,
}

impl QuestNode {
    pub fn is_category(&self) -> bool {
        self.category.is_none()
    }
}

/// Marks the quest entity currently open in the quest box.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Selected;

use bevy::prelude::*;

/// Per-frame ordering of quest progression work.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum QuestSchedule {
    /// New trails are turned into quest entities.
    Intake,
    /// The frontier is recomputed from the completed set.
    Resolve,
    /// Derived state is written back onto entities.
    Sync,
}

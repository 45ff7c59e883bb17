//! Quest progression: the linearized trail, status derivation and the
//! observers that turn player requests into completions.
//!
//! Status is never stored as truth. [`QuestStatus`] components are a view
//! recomputed from [`CompletedQuests`] through the cached [`QuestFrontier`].

mod engine;
pub mod systems;
mod trail;


pub use {
    engine::{CompletionPlan, QuestAction, QuestFrontier},
    trail::QuestTrail,
};

use {
    bevy::{platform::collections::HashMap, prelude::*},
    quest_components::{QuestComponentsPlugin, QuestNode, QuestStatus},
    quest_resources::{CompletedQuests, QuestResourcesPlugin, SelectedQuest},
    system_schedule::QuestSchedule,
};

/// O(1) lookup of quest entities by id.
#[derive(Resource, Default)]
pub struct QuestNodeMap {
    pub entities: HashMap<String, Entity>,
}

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((QuestComponentsPlugin, QuestResourcesPlugin))
            .init_resource::<QuestTrail>()
            .init_resource::<QuestFrontier>()
            .init_resource::<QuestNodeMap>()
            .configure_sets(
                Update,
                (
                    QuestSchedule::Intake,
                    QuestSchedule::Resolve,
                    QuestSchedule::Sync,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                systems::spawn_quest_nodes
                    .in_set(QuestSchedule::Intake)
                    .run_if(resource_changed::<QuestTrail>),
            )
            .add_systems(
                Update,
                systems::refresh_frontier
                    .in_set(QuestSchedule::Resolve)
                    .run_if(
                        resource_changed::<QuestTrail>.or(resource_changed::<CompletedQuests>),
                    ),
            )
            .add_systems(
                Update,
                (
                    systems::sync_quest_statuses.run_if(
                        resource_changed::<QuestFrontier>
                            .or(resource_changed::<CompletedQuests>)
                            .or(resource_changed::<QuestTrail>),
                    ),
                    systems::sync_selected_marker.run_if(
                        resource_changed::<SelectedQuest>.or(resource_changed::<QuestNodeMap>),
                    ),
                )
                    .in_set(QuestSchedule::Sync),
            )
            .add_observer(systems::complete_quest)
            .add_observer(systems::advance_quest)
            .add_observer(systems::select_quest)
            .add_observer(systems::on_signed_in)
            .add_observer(systems::on_signed_out);
    }
}

/// Status of every spawned quest entity, keyed by id. Handy for whatever
/// renders the quest log and for tests.
pub fn quest_statuses(world: &mut World) -> HashMap<String, QuestStatus> {
    let mut query = world.query::<(&QuestNode, &QuestStatus)>();
    query
        .iter(world)
        .map(|(node, status)| (node.id.clone(), *status))
        .collect()
}

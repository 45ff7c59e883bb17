use {
    crate::{QuestFrontier, QuestNodeMap, QuestTrail},
    bevy::prelude::*,
    quest_assets::QuestType,
    quest_components::{QuestNode, QuestStatus, Selected},
    quest_events::{
        AdvanceQuestRequest, BadgeEarned, CompleteQuestRequest, LoginRequired, QuestCompleted,
        QuestFault, SelectQuest, SignedIn, SignedOut,
    },
    quest_resources::{CompletedQuests, ProfileBackend, SelectedQuest, Session},
    std::fmt::Display,
};

/// Logs a progression fault and hands it to the presentation layer.
fn report_fault(commands: &mut Commands, error: impl Display) {
    error!(%error, "quest progression fault");
    commands.trigger(QuestFault {
        message: error.to_string(),
    });
}

/// Respawns one entity per catalog quest whenever a new trail is installed.
pub fn spawn_quest_nodes(
    mut commands: Commands,
    trail: Res<QuestTrail>,
    mut node_map: ResMut<QuestNodeMap>,
    mut selected: ResMut<SelectedQuest>,
) {
    for (_, entity) in node_map.entities.drain() {
        commands.entity(entity).despawn();
    }

    if trail.is_empty() {
        return;
    }

    for id in trail.sequence() {
        let category = trail.parent_category(id).ok().flatten().map(str::to_owned);
        let entity = commands
            .spawn((
                QuestNode {
                    id: id.clone(),
                    category,
                },
                QuestStatus::default(),
            ))
            .id();
        node_map.entities.insert(id.clone(), entity);
    }
    debug!(quests = trail.len(), "spawned quest nodes");

    if selected.id().is_none_or(|id| !trail.contains(id)) {
        selected.0 = trail.first().map(str::to_owned);
    }
}

pub fn refresh_frontier(
    trail: Res<QuestTrail>,
    completed: Res<CompletedQuests>,
    mut frontier: ResMut<QuestFrontier>,
) {
    if frontier.set_if_neq(trail.frontier(&completed)) {
        debug!(
            category = ?frontier.category,
            sub_quest = ?frontier.sub_quest,
            "quest frontier moved"
        );
    }
}

/// Writes the derived status onto every quest entity.
pub fn sync_quest_statuses(
    mut commands: Commands,
    frontier: Res<QuestFrontier>,
    completed: Res<CompletedQuests>,
    mut query: Query<(&QuestNode, &mut QuestStatus)>,
) {
    for (node, mut status) in &mut query {
        match frontier.status_of(&node.id, &completed) {
            Ok(next) => {
                let previous = *status;
                if status.set_if_neq(next) {
                    trace!(quest_id = %node.id, ?previous, ?next, "quest status changed");
                }
            }
            Err(error) => report_fault(&mut commands, error),
        }
    }
}

pub fn sync_selected_marker(
    mut commands: Commands,
    selected: Res<SelectedQuest>,
    node_map: Res<QuestNodeMap>,
    marked: Query<Entity, With<Selected>>,
) {
    for entity in &marked {
        commands.entity(entity).remove::<Selected>();
    }

    if let Some(&entity) = selected.id().and_then(|id| node_map.entities.get(id)) {
        commands.entity(entity).insert(Selected);
    }
}

/// Completes a quest for the signed-in user.
///
/// Only unlocked quests of type `Complete` are honoured. The quest and its
/// roll-up parent are appended to the profile store, and the local completed
/// set is then replaced by whatever the store reports.
pub fn complete_quest(
    trigger: On<CompleteQuestRequest>,
    mut commands: Commands,
    trail: Res<QuestTrail>,
    session: Res<Session>,
    mut backend: ResMut<ProfileBackend>,
    mut completed: ResMut<CompletedQuests>,
    mut selected: ResMut<SelectedQuest>,
) {
    let quest_id = &trigger.event().quest_id;

    if let Err(error) = trail.position(quest_id) {
        report_fault(&mut commands, error);
        return;
    }

    if !session.authenticated {
        info!(%quest_id, "completion needs a signed-in user");
        commands.trigger(LoginRequired {
            quest_id: quest_id.clone(),
        });
        return;
    }

    let plan = match trail.plan_completion(quest_id, &completed) {
        Ok(plan) => plan,
        Err(error) => {
            report_fault(&mut commands, error);
            return;
        }
    };

    if plan.quest.kind != QuestType::Complete {
        warn!(%quest_id, kind = ?plan.quest.kind, "quest has no completion action");
        return;
    }

    match plan.status {
        QuestStatus::Locked => {
            warn!(%quest_id, "refusing to complete a locked quest");
            return;
        }
        QuestStatus::Done => {
            debug!(%quest_id, "quest already completed");
            return;
        }
        QuestStatus::Unlocked => {}
    }

    if let Err(error) = backend.append_completed_quest_ids(&session.user_id, &plan.ids) {
        warn!(%quest_id, %error, "profile store rejected the completion");
    }

    match backend.completed_quest_ids(&session.user_id) {
        Ok(snapshot) => completed.replace(snapshot),
        Err(error) => {
            report_fault(&mut commands, error);
            return;
        }
    }

    if !completed.contains(quest_id) {
        warn!(%quest_id, "profile store did not record the completion");
        return;
    }

    let rolled_up = plan.rolled_up().map(str::to_owned);
    info!(%quest_id, ?rolled_up, user_id = %session.user_id, "quest completed");
    commands.trigger(QuestCompleted {
        quest_id: quest_id.clone(),
        rolled_up,
    });

    match &plan.quest.complete_parent_id {
        Some(parent) => commands.trigger(BadgeEarned {
            quest_id: parent.clone(),
            badge: plan.quest.badge.clone(),
        }),
        None => {
            if let Ok(Some(next)) = trail.next_id(quest_id) {
                selected.0 = Some(next.to_owned());
            }
        }
    }
}

/// Moves the selection to the structurally next quest.
pub fn advance_quest(
    trigger: On<AdvanceQuestRequest>,
    mut commands: Commands,
    trail: Res<QuestTrail>,
    completed: Res<CompletedQuests>,
    mut selected: ResMut<SelectedQuest>,
) {
    let quest_id = &trigger.event().quest_id;

    match trail.status_of(quest_id, &completed) {
        Ok(QuestStatus::Locked) => {
            warn!(%quest_id, "refusing to advance past a locked quest");
            return;
        }
        Ok(_) => {}
        Err(error) => {
            report_fault(&mut commands, error);
            return;
        }
    }

    match trail.next_id(quest_id) {
        Ok(Some(next)) => {
            debug!(%quest_id, next_id = %next, "advancing selection");
            selected.0 = Some(next.to_owned());
        }
        Ok(None) => debug!(%quest_id, "end of the quest line"),
        Err(error) => report_fault(&mut commands, error),
    }
}

pub fn select_quest(
    trigger: On<SelectQuest>,
    mut commands: Commands,
    trail: Res<QuestTrail>,
    mut selected: ResMut<SelectedQuest>,
) {
    let quest_id = &trigger.event().quest_id;

    if let Err(error) = trail.position(quest_id) {
        report_fault(&mut commands, error);
        return;
    }

    selected.set_if_neq(SelectedQuest(Some(quest_id.clone())));
}

/// Hydrates the completed set from the new user's profile. If the profile
/// cannot be read the set is cleared.
pub fn on_signed_in(
    trigger: On<SignedIn>,
    mut commands: Commands,
    backend: Res<ProfileBackend>,
    mut session: ResMut<Session>,
    mut completed: ResMut<CompletedQuests>,
) {
    let event = trigger.event();
    *session = Session::signed_in(event.user_id.clone(), event.display_name.clone());

    match backend.completed_quest_ids(&event.user_id) {
        Ok(snapshot) => {
            completed.replace(snapshot);
            info!(
                user_id = %event.user_id,
                completed = completed.len(),
                "signed in"
            );
        }
        Err(error) => {
            // Whatever is held belongs to the previous user.
            *completed = CompletedQuests::default();
            report_fault(&mut commands, error);
        }
    }
}

pub fn on_signed_out(
    _trigger: On<SignedOut>,
    mut session: ResMut<Session>,
    mut completed: ResMut<CompletedQuests>,
) {
    info!(user_id = %session.user_id, "signed out");
    *session = Session::default();
    *completed = CompletedQuests::default();
}

//! Plays the whole trail as a guest, one completion per frame.

use {
    bevy::prelude::*,
    progression::QuestTrail,
    quest_events::{BadgeEarned, CompleteQuestRequest, LoginRequired, QuestFault, SignedIn},
    quest_resources::{CompletedQuests, Session},
    states::AppState,
    system_schedule::QuestSchedule,
};

pub const GUEST_USER_ID: &str = "walkthrough-guest";

pub struct WalkthroughPlugin;

impl Plugin for WalkthroughPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Running), sign_in_guest)
            .add_systems(
                Update,
                take_step
                    .after(QuestSchedule::Sync)
                    .run_if(in_state(AppState::Running)),
            )
            .add_observer(announce_badge)
            .add_observer(abort_on_fault)
            .add_observer(abort_on_login_required);
    }
}

fn sign_in_guest(mut commands: Commands) {
    commands.trigger(SignedIn {
        user_id: GUEST_USER_ID.to_string(),
        display_name: "Guest".to_string(),
    });
}

/// Completes whatever the trail currently offers. The category itself is
/// completed when it has its own action, otherwise its open sub-quest.
fn take_step(
    mut commands: Commands,
    trail: Res<QuestTrail>,
    completed: Res<CompletedQuests>,
    session: Res<Session>,
    mut last_target: Local<Option<String>>,
    mut exit: MessageWriter<AppExit>,
) {
    if !session.authenticated {
        return;
    }

    let frontier = trail.frontier(&completed);
    let Some(category) = frontier.category.as_deref() else {
        info!(
            progress = trail.rounded_progress(&completed),
            "quest trail finished"
        );
        exit.write(AppExit::Success);
        return;
    };

    let target = match trail.action_for(category, &completed) {
        Ok(progression::QuestAction::Complete) => Some(category),
        Ok(_) => frontier.sub_quest.as_deref(),
        Err(error) => {
            error!(%error, "cannot read the trail");
            exit.write(AppExit::error());
            return;
        }
    };

    let Some(target) = target else {
        error!(%category, "category has nothing left to complete");
        exit.write(AppExit::error());
        return;
    };

    if last_target.as_deref() == Some(target) {
        error!(quest_id = %target, "completion did not move the trail");
        exit.write(AppExit::error());
        return;
    }

    debug!(quest_id = %target, "completing");
    *last_target = Some(target.to_owned());
    commands.trigger(CompleteQuestRequest {
        quest_id: target.to_owned(),
    });
}

fn announce_badge(trigger: On<BadgeEarned>, trail: Res<QuestTrail>) {
    let event = trigger.event();
    let title = trail
        .catalog()
        .badge(&event.badge)
        .map_or(event.badge.as_str(), |badge| badge.title.as_str());
    info!(quest_id = %event.quest_id, badge = %title, "badge earned");
}

fn abort_on_fault(trigger: On<QuestFault>, mut exit: MessageWriter<AppExit>) {
    error!(message = %trigger.event().message, "walkthrough aborted");
    exit.write(AppExit::error());
}

fn abort_on_login_required(trigger: On<LoginRequired>, mut exit: MessageWriter<AppExit>) {
    error!(quest_id = %trigger.event().quest_id, "walkthrough is not signed in");
    exit.write(AppExit::error());
}

use {
    bevy::prelude::*,
    progression::QuestTrail,
    quest_resources::{CompletedQuests, Session},
};

pub fn progress_changed(completed: Res<CompletedQuests>) -> bool {
    completed.is_changed() && !completed.is_added()
}

pub fn report_progress(
    trail: Res<QuestTrail>,
    completed: Res<CompletedQuests>,
    session: Res<Session>,
) {
    let badges: Vec<_> = trail
        .earned_badges(&completed)
        .into_iter()
        .map(|badge| badge.title.as_str())
        .collect();

    info!(
        user = %session.display_name,
        progress = trail.rounded_progress(&completed),
        completed = completed.len(),
        quests = trail.len(),
        ?badges,
        "quest progress"
    );
}

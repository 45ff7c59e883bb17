use bevy::prelude::*;

/// Player pressed "Complete" on a quest.
///
/// # Observers
/// - `progression::systems::complete_quest`: checks the session and the quest's status,
///   writes the quest (and its roll-up parent) to the profile store, then
///   re-reads the store into `CompletedQuests`.
#[derive(Event, Debug, Clone)]
pub struct CompleteQuestRequest {
    pub quest_id: String,
}

/// Player pressed "Next" on a quest that has no completion of its own.
#[derive(Event, Debug, Clone)]
pub struct AdvanceQuestRequest {
    pub quest_id: String,
}

/// Player picked a quest in the quest log. Locked quests may be viewed too.
#[derive(Event, Debug, Clone)]
pub struct SelectQuest {
    pub quest_id: String,
}

/// Fired once the profile store confirms a completion.
#[derive(Event, Debug, Clone)]
pub struct QuestCompleted {
    pub quest_id: String,
    /// Parent quest completed alongside it, if any.
    pub rolled_up: Option<String>,
}

/// Fired when a completion rolls up into a parent, carrying the parent's id and
/// the badge key the completed quest shows. Drives the "badge earned" popup.
#[derive(Event, Debug, Clone)]
pub struct BadgeEarned {
    pub quest_id: String,
    pub badge: String,
}

/// A completion was attempted without a signed-in user.
#[derive(Event, Debug, Clone)]
pub struct LoginRequired {
    pub quest_id: String,
}

/// Catalog or completed-set inconsistency. The presentation layer shows a
/// generic error state instead of guessing a status.
#[derive(Event, Debug, Clone)]
pub struct QuestFault {
    pub message: String,
}

/// Raised by the authentication provider after a successful login.
#[derive(Event, Debug, Clone)]
pub struct SignedIn {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Event, Debug, Clone)]
pub struct SignedOut;

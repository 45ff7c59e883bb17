use {
    bevy::prelude::*,
    progression::*,
    quest_assets::{Badge, Quest, QuestCatalog, QuestCategory, QuestType},
    quest_components::{QuestNode, QuestStatus, Selected},
    quest_events::{
        AdvanceQuestRequest, BadgeEarned, CompleteQuestRequest, LoginRequired, QuestCompleted,
        QuestFault, SelectQuest, SignedIn, SignedOut,
    },
    quest_resources::{
        CompletedQuests, MemoryProfileStore, ProfileBackend, ProfileStore, SelectedQuest,
        Session, StoreError,
    },
};

#[derive(Resource, Default)]
struct EventLog {
    completed: Vec<QuestCompleted>,
    badges: Vec<BadgeEarned>,
    login_required: Vec<String>,
    faults: Vec<String>,
}

/// [a -> a, b[s1, s2 -> b], c]
fn catalog() -> QuestCatalog {
    QuestCatalog::new(vec![
        QuestCategory::new(
            Quest::new("a", QuestType::Complete, "seedling").with_complete_parent("a"),
        ),
        QuestCategory::new(Quest::new("b", QuestType::None, "desci")).with_sub_quests([
            Quest::new("s1", QuestType::Complete, "desci"),
            Quest::new("s2", QuestType::Complete, "desci").with_complete_parent("b"),
        ]),
        QuestCategory::new(Quest::new("c", QuestType::Complete, "onboarded")),
    ])
    .with_badge("seedling", Badge::titled("Seedling"))
    .with_badge("desci", Badge::titled("DeSci"))
    .with_badge("onboarded", Badge::titled("Onboarded"))
}

fn setup_app(backend: ProfileBackend) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(ProgressionPlugin)
        .insert_resource(backend)
        .init_resource::<EventLog>();

    app.add_observer(|trigger: On<QuestCompleted>, mut log: ResMut<EventLog>| {
        log.completed.push(trigger.event().clone());
    });
    app.add_observer(|trigger: On<BadgeEarned>, mut log: ResMut<EventLog>| {
        log.badges.push(trigger.event().clone());
    });
    app.add_observer(|trigger: On<LoginRequired>, mut log: ResMut<EventLog>| {
        log.login_required.push(trigger.event().quest_id.clone());
    });
    app.add_observer(|trigger: On<QuestFault>, mut log: ResMut<EventLog>| {
        log.faults.push(trigger.event().message.clone());
    });

    app.insert_resource(QuestTrail::new(catalog()).expect("test catalog is valid"));
    app.update();
    app
}

fn sign_in(app: &mut App) {
    app.world_mut().trigger(SignedIn {
        user_id: "user".to_string(),
        display_name: "Tester".to_string(),
    });
    app.update();
}

fn complete(app: &mut App, quest_id: &str) {
    app.world_mut().trigger(CompleteQuestRequest {
        quest_id: quest_id.to_string(),
    });
    app.update();
}

fn status(app: &mut App, quest_id: &str) -> QuestStatus {
    quest_statuses(app.world_mut())
        .get(quest_id)
        .copied()
        .unwrap_or_else(|| panic!("no quest node for {quest_id}"))
}

fn selected(app: &App) -> Option<String> {
    app.world().resource::<SelectedQuest>().0.clone()
}

/// Store that accepts nothing and reports whatever it was seeded with.
struct ReadOnlyStore(Vec<String>);

impl ProfileStore for ReadOnlyStore {
    fn completed_quest_ids(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.0.clone())
    }

    fn append_completed_quest_ids(&mut self, _: &str, _: &[String]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

/// Store that accepts writes but cannot be read back.
struct BlindStore;

impl ProfileStore for BlindStore {
    fn completed_quest_ids(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn append_completed_quest_ids(&mut self, _: &str, _: &[String]) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store that only knows alice. Reads for anyone else fail.
struct AliceOnlyStore;

impl ProfileStore for AliceOnlyStore {
    fn completed_quest_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        match user_id {
            "alice" => Ok(vec!["a".to_string()]),
            _ => Err(StoreError::Unavailable(format!("no shard for {user_id}"))),
        }
    }

    fn append_completed_quest_ids(&mut self, _: &str, _: &[String]) -> Result<(), StoreError> {
        Ok(())
    }
}

fn sign_in_as(app: &mut App, user_id: &str) {
    app.world_mut().trigger(SignedIn {
        user_id: user_id.to_string(),
        display_name: user_id.to_string(),
    });
    app.update();
}

#[test]
fn test_nodes_spawn_with_initial_statuses() {
    let mut app = setup_app(ProfileBackend::default());

    let statuses = quest_statuses(app.world_mut());
    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses["a"], QuestStatus::Unlocked);
    for id in ["b", "s1", "s2", "c"] {
        assert_eq!(statuses[id], QuestStatus::Locked, "{id}");
    }

    assert_eq!(selected(&app).as_deref(), Some("a"));
    let mut marked = app
        .world_mut()
        .query_filtered::<&QuestNode, With<Selected>>();
    let marked: Vec<_> = marked.iter(app.world()).map(|node| node.id.clone()).collect();
    assert_eq!(marked, vec!["a".to_string()]);
}

#[test]
fn test_completion_requires_login() {
    let mut app = setup_app(ProfileBackend::default());
    complete(&mut app, "a");

    let log = app.world().resource::<EventLog>();
    assert_eq!(log.login_required, vec!["a".to_string()]);
    assert!(log.completed.is_empty());
    assert!(app.world().resource::<CompletedQuests>().is_empty());
}

#[test]
fn test_full_completion_flow() {
    let mut app = setup_app(ProfileBackend::default());
    sign_in(&mut app);

    // A category that rolls up into itself announces its badge and keeps
    // the selection where it is.
    complete(&mut app, "a");
    assert_eq!(status(&mut app, "a"), QuestStatus::Done);
    assert_eq!(status(&mut app, "b"), QuestStatus::Unlocked);
    assert_eq!(status(&mut app, "s1"), QuestStatus::Unlocked);
    assert_eq!(selected(&app).as_deref(), Some("a"));
    {
        let log = app.world().resource::<EventLog>();
        assert_eq!(log.completed.len(), 1);
        assert_eq!(log.completed[0].rolled_up, None);
        assert_eq!(log.badges[0].quest_id, "a");
        assert_eq!(log.badges[0].badge, "seedling");
    }

    // Locked quests are refused.
    complete(&mut app, "s2");
    assert_eq!(status(&mut app, "s2"), QuestStatus::Locked);
    assert_eq!(app.world().resource::<EventLog>().completed.len(), 1);

    // Without a parent the selection advances to the successor.
    complete(&mut app, "s1");
    assert_eq!(status(&mut app, "s1"), QuestStatus::Done);
    assert_eq!(status(&mut app, "s2"), QuestStatus::Unlocked);
    assert_eq!(status(&mut app, "b"), QuestStatus::Unlocked);
    assert_eq!(selected(&app).as_deref(), Some("s2"));
    assert_eq!(app.world().resource::<EventLog>().badges.len(), 1);

    // The last sub-quest rolls up into its category.
    complete(&mut app, "s2");
    assert_eq!(status(&mut app, "s2"), QuestStatus::Done);
    assert_eq!(status(&mut app, "b"), QuestStatus::Done);
    assert_eq!(status(&mut app, "c"), QuestStatus::Unlocked);
    {
        let log = app.world().resource::<EventLog>();
        assert_eq!(log.completed[2].rolled_up.as_deref(), Some("b"));
        assert_eq!(log.badges[1].quest_id, "b");
        assert_eq!(log.badges[1].badge, "desci");
    }

    // End of the line: nothing to advance to.
    complete(&mut app, "c");
    assert_eq!(status(&mut app, "c"), QuestStatus::Done);
    assert_eq!(selected(&app).as_deref(), Some("s2"));
    assert_eq!(app.world().resource::<EventLog>().completed.len(), 4);

    // Completing again changes nothing.
    complete(&mut app, "c");
    assert_eq!(app.world().resource::<EventLog>().completed.len(), 4);
    assert_eq!(app.world().resource::<CompletedQuests>().len(), 5);
    assert!(app.world().resource::<EventLog>().faults.is_empty());
}

#[test]
fn test_signing_in_hydrates_completed_quests() {
    let backend = ProfileBackend::new(MemoryProfileStore::default().with_profile("user", ["a"]));
    let mut app = setup_app(backend);
    sign_in(&mut app);

    assert!(app.world().resource::<Session>().authenticated);
    assert_eq!(status(&mut app, "a"), QuestStatus::Done);
    assert_eq!(status(&mut app, "b"), QuestStatus::Unlocked);

    app.world_mut().trigger(SignedOut);
    app.update();
    assert!(!app.world().resource::<Session>().authenticated);
    assert_eq!(status(&mut app, "a"), QuestStatus::Unlocked);
}

#[test]
fn test_advance_moves_selection_unless_locked() {
    let backend = ProfileBackend::new(MemoryProfileStore::default().with_profile("user", ["a"]));
    let mut app = setup_app(backend);
    sign_in(&mut app);

    app.world_mut().trigger(AdvanceQuestRequest {
        quest_id: "b".to_string(),
    });
    assert_eq!(selected(&app).as_deref(), Some("s1"));

    app.world_mut().trigger(AdvanceQuestRequest {
        quest_id: "s2".to_string(),
    });
    assert_eq!(selected(&app).as_deref(), Some("s1"));
}

#[test]
fn test_select_quest_accepts_locked_and_faults_on_unknown() {
    let mut app = setup_app(ProfileBackend::default());

    app.world_mut().trigger(SelectQuest {
        quest_id: "c".to_string(),
    });
    app.update();
    assert_eq!(selected(&app).as_deref(), Some("c"));

    app.world_mut().trigger(SelectQuest {
        quest_id: "missing".to_string(),
    });
    app.update();
    assert_eq!(selected(&app).as_deref(), Some("c"));
    assert_eq!(app.world().resource::<EventLog>().faults.len(), 1);
}

#[test]
fn test_rejected_write_is_not_trusted() {
    let mut app = setup_app(ProfileBackend::new(ReadOnlyStore(Vec::new())));
    sign_in(&mut app);
    complete(&mut app, "a");

    assert_eq!(status(&mut app, "a"), QuestStatus::Unlocked);
    let log = app.world().resource::<EventLog>();
    assert!(log.completed.is_empty());
    assert!(log.badges.is_empty());
}

#[test]
fn test_unreadable_store_faults() {
    let mut app = setup_app(ProfileBackend::new(BlindStore));
    sign_in(&mut app);
    complete(&mut app, "a");

    let log = app.world().resource::<EventLog>();
    // Once on sign in, once on the read back after completing.
    assert_eq!(log.faults.len(), 2);
    assert!(log.completed.is_empty());
}

#[test]
fn test_failed_hydration_drops_previous_users_progress() {
    let mut app = setup_app(ProfileBackend::new(AliceOnlyStore));

    sign_in_as(&mut app, "alice");
    assert_eq!(status(&mut app, "a"), QuestStatus::Done);

    sign_in_as(&mut app, "bob");
    assert_eq!(app.world().resource::<Session>().user_id, "bob");
    assert!(app.world().resource::<CompletedQuests>().is_empty());
    assert_eq!(status(&mut app, "a"), QuestStatus::Unlocked);
    assert_eq!(app.world().resource::<EventLog>().faults.len(), 1);
}

#[test]
fn test_unlocked_quest_without_completion_action_is_refused() {
    let backend = ProfileBackend::new(MemoryProfileStore::default().with_profile("user", ["a"]));
    let mut app = setup_app(backend);
    sign_in(&mut app);
    assert_eq!(status(&mut app, "b"), QuestStatus::Unlocked);

    complete(&mut app, "b");

    assert_eq!(status(&mut app, "b"), QuestStatus::Unlocked);
    assert_eq!(status(&mut app, "s1"), QuestStatus::Unlocked);
    assert_eq!(app.world().resource::<CompletedQuests>().len(), 1);
    let log = app.world().resource::<EventLog>();
    assert!(log.completed.is_empty());
    assert!(log.badges.is_empty());
    assert!(log.faults.is_empty());
}

#[test]
fn test_unknown_quest_faults_before_login_check() {
    let mut app = setup_app(ProfileBackend::default());
    complete(&mut app, "missing");

    let log = app.world().resource::<EventLog>();
    assert!(log.login_required.is_empty());
    assert_eq!(log.faults.len(), 1);
    assert!(log.faults[0].contains("missing"));
}

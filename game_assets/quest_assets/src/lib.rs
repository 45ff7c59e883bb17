//! Static quest catalog definitions loaded from `.catalog.ron` assets.
//!
//! A catalog is a two-level tree: an ordered list of [`QuestCategory`] entries,
//! each of which may hold an ordered list of [`SubQuest`]s. Quest ids are unique
//! across both levels, which is what lets every other crate address a quest by
//! its id alone.

mod error;

pub use error::QuestError;

use {
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    serde::{Deserialize, Serialize},
    std::collections::{HashMap, HashSet},
};

pub struct QuestAssetsPlugin;

impl Plugin for QuestAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<QuestCatalog>::new(&["catalog.ron"]));
    }
}

/// Governs which action a quest offers once it is unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestType {
    /// No action of its own. Categories of this type are completed by a
    /// sub-quest rolling up into them.
    #[default]
    None,
    /// Offers a "Complete" action.
    Complete,
    /// Offers a "Next" action that moves on without completing anything.
    Next,
}

/// Rendered content of a quest.
///
/// The presentation layer decides how each kind looks; progression never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestBody {
    /// Plain paragraphs.
    Text(Vec<String>),
    /// Paragraphs followed by a question. Every choice opens the quest's reading.
    Prompt {
        paragraphs: Vec<String>,
        question: String,
        choices: Vec<String>,
    },
    /// Paragraphs followed by a button leading off-site.
    Link {
        paragraphs: Vec<String>,
        label: String,
        url: String,
    },
}

impl Default for QuestBody {
    fn default() -> Self {
        Self::Text(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletePopup {
    pub intro_text: String,
    pub descriptive_text: String,
}

/// Reward shown next to a quest and announced when its category completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub complete_popup: CompletePopup,
}

impl Badge {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A single completable unit, either a category's own content or a sub-quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Globally unique id (a UUID in the shipped catalog).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub title_image: Option<String>,
    #[serde(default)]
    pub kind: QuestType,
    /// Key into [`QuestCatalog::badges`].
    pub badge: String,
    /// Completing this quest also completes the quest with this id.
    #[serde(default)]
    pub complete_parent_id: Option<String>,
    /// Position hint shown to the player, e.g. "2/3".
    #[serde(default)]
    pub completion_step: Option<String>,
    #[serde(default)]
    pub body: QuestBody,
    /// Key of the long-form reading opened from a [`QuestBody::Prompt`].
    #[serde(default)]
    pub reading: Option<String>,
}

impl Quest {
    pub fn new(id: impl Into<String>, kind: QuestType, badge: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            title_image: None,
            kind,
            badge: badge.into(),
            complete_parent_id: None,
            completion_step: None,
            body: QuestBody::default(),
            reading: None,
        }
    }

    pub fn with_complete_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.complete_parent_id = Some(parent_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuest {
    pub list_title: String,
    pub content: Quest,
}

impl SubQuest {
    pub fn new(content: Quest) -> Self {
        Self {
            list_title: content.title.clone(),
            content,
        }
    }
}

/// Top-level entry of the quest log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestCategory {
    pub list_title: String,
    #[serde(default)]
    pub image_unlocked: String,
    #[serde(default)]
    pub image_locked: String,
    pub content: Quest,
    /// Empty for leaf categories.
    #[serde(default)]
    pub sub_quests: Vec<SubQuest>,
}

impl QuestCategory {
    pub fn new(content: Quest) -> Self {
        Self {
            list_title: content.title.clone(),
            image_unlocked: String::new(),
            image_locked: String::new(),
            content,
            sub_quests: Vec::new(),
        }
    }

    pub fn with_sub_quests(mut self, sub_quests: impl IntoIterator<Item = Quest>) -> Self {
        self.sub_quests = sub_quests.into_iter().map(SubQuest::new).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.content.id
    }

    pub fn has_sub_quests(&self) -> bool {
        !self.sub_quests.is_empty()
    }
}

/// The full, ordered quest tree.
#[derive(Asset, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestCatalog {
    #[serde(default)]
    pub badges: HashMap<String, Badge>,
    pub categories: Vec<QuestCategory>,
}

impl QuestCatalog {
    pub fn new(categories: Vec<QuestCategory>) -> Self {
        Self {
            badges: HashMap::new(),
            categories,
        }
    }

    pub fn with_badge(mut self, key: impl Into<String>, badge: Badge) -> Self {
        self.badges.insert(key.into(), badge);
        self
    }

    /// Every quest in traversal order: a category's own content first, then
    /// its sub-quests, then the next category.
    pub fn quests(&self) -> impl Iterator<Item = &Quest> {
        self.categories.iter().flat_map(|category| {
            std::iter::once(&category.content)
                .chain(category.sub_quests.iter().map(|sub| &sub.content))
        })
    }

    pub fn all_ids(&self) -> Vec<String> {
        self.quests().map(|quest| quest.id.clone()).collect()
    }

    pub fn lookup(&self, id: &str) -> Result<&Quest, QuestError> {
        self.quests()
            .find(|quest| quest.id == id)
            .ok_or_else(|| QuestError::NotFound(id.to_owned()))
    }

    /// The category owning `id`: the category itself, or the one holding the
    /// sub-quest.
    pub fn category_of(&self, id: &str) -> Result<&QuestCategory, QuestError> {
        self.categories
            .iter()
            .find(|category| {
                category.id() == id || category.sub_quests.iter().any(|sub| sub.content.id == id)
            })
            .ok_or_else(|| QuestError::NotFound(id.to_owned()))
    }

    pub fn badge(&self, key: &str) -> Option<&Badge> {
        self.badges.get(key)
    }

    /// Checks the structural rules every other crate relies on.
    pub fn validate(&self) -> Result<(), QuestError> {
        if self.categories.is_empty() {
            return Err(QuestError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for quest in self.quests() {
            if !seen.insert(quest.id.as_str()) {
                return Err(QuestError::DuplicateId(quest.id.clone()));
            }
        }

        for quest in self.quests() {
            if !self.badges.contains_key(&quest.badge) {
                return Err(QuestError::UnknownBadge {
                    quest: quest.id.clone(),
                    badge: quest.badge.clone(),
                });
            }

            if let Some(parent) = &quest.complete_parent_id
                && !seen.contains(parent.as_str())
            {
                return Err(QuestError::UnknownParent {
                    quest: quest.id.clone(),
                    parent: parent.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_category_catalog() -> QuestCatalog {
        QuestCatalog::new(vec![
            QuestCategory::new(Quest::new("a", QuestType::Complete, "seedling")),
            QuestCategory::new(Quest::new("b", QuestType::None, "desci")).with_sub_quests([
                Quest::new("s1", QuestType::Complete, "desci").with_complete_parent("b"),
                Quest::new("s2", QuestType::Complete, "desci"),
            ]),
        ])
        .with_badge("seedling", Badge::titled("Seedling"))
        .with_badge("desci", Badge::titled("DeSci"))
    }

    #[test]
    fn test_all_ids_walks_category_then_sub_quests() {
        let catalog = two_category_catalog();
        assert_eq!(catalog.all_ids(), vec!["a", "b", "s1", "s2"]);
    }

    #[test]
    fn test_lookup_finds_sub_quest() {
        let catalog = two_category_catalog();
        let quest = catalog.lookup("s1").unwrap();
        assert_eq!(quest.complete_parent_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_lookup_unknown_id() {
        let catalog = two_category_catalog();
        assert_eq!(
            catalog.lookup("missing"),
            Err(QuestError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_category_of_sub_quest() {
        let catalog = two_category_catalog();
        assert_eq!(catalog.category_of("s2").unwrap().id(), "b");
        assert_eq!(catalog.category_of("a").unwrap().id(), "a");
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let catalog = QuestCatalog::new(vec![
            QuestCategory::new(Quest::new("a", QuestType::None, "x"))
                .with_sub_quests([Quest::new("a", QuestType::Complete, "x")]),
        ])
        .with_badge("x", Badge::titled("X"));
        assert_eq!(
            catalog.validate(),
            Err(QuestError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_unknown_parent() {
        let catalog = QuestCatalog::new(vec![QuestCategory::new(
            Quest::new("a", QuestType::Complete, "x").with_complete_parent("nope"),
        )])
        .with_badge("x", Badge::titled("X"));
        assert!(matches!(
            catalog.validate(),
            Err(QuestError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_fixture_catalog_is_valid() {
        assert_eq!(two_category_catalog().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_unknown_badge() {
        let mut catalog = two_category_catalog();
        catalog.badges.remove("desci");
        assert_eq!(
            catalog.validate(),
            Err(QuestError::UnknownBadge {
                quest: "b".to_string(),
                badge: "desci".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_badges_without_a_badge_table() {
        let catalog = QuestCatalog::new(vec![QuestCategory::new(Quest::new(
            "a",
            QuestType::Complete,
            "no-such-badge",
        ))]);
        assert_eq!(
            catalog.validate(),
            Err(QuestError::UnknownBadge {
                quest: "a".to_string(),
                badge: "no-such-badge".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_catalog() {
        assert_eq!(
            QuestCatalog::default().validate(),
            Err(QuestError::EmptyCatalog)
        );
    }

    #[test]
    fn test_parse_minimal_catalog() {
        let source = r#"(
            badges: {
                "seed": (title: "Seed"),
            },
            categories: [
                (
                    list_title: "Basics",
                    content: (id: "a", title: "Basics", kind: Complete, badge: "seed"),
                ),
                (
                    list_title: "Reading",
                    content: (id: "b", title: "Reading", badge: "seed", body: Text(["hi"])),
                    sub_quests: [
                        (
                            list_title: "First",
                            content: (
                                id: "s1",
                                title: "First",
                                kind: Complete,
                                badge: "seed",
                                complete_parent_id: Some("b"),
                            ),
                        ),
                    ],
                ),
            ],
        )"#;

        let catalog: QuestCatalog = ron::from_str(source).expect("catalog should parse");
        assert_eq!(catalog.all_ids(), vec!["a", "b", "s1"]);
        assert_eq!(catalog.lookup("b").unwrap().kind, QuestType::None);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_shipped_onboarding_catalog_is_valid() {
        let source = include_str!("../../../assets/quests/onboarding.catalog.ron");
        let catalog: QuestCatalog = ron::from_str(source).expect("onboarding catalog should parse");

        catalog.validate().expect("onboarding catalog should validate");
        assert_eq!(catalog.categories.len(), 6);
        assert_eq!(catalog.all_ids().len(), 15);
        assert_eq!(
            catalog.all_ids().first().map(String::as_str),
            Some("8e97016c-97e0-41a3-be3b-67ec5195f282")
        );
    }
}

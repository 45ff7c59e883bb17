use {
    bevy::{platform::collections::HashMap, prelude::*},
    quest_assets::{Quest, QuestCatalog, QuestError},
};

/// Where a quest id sits in the catalog tree and in the flattened trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuestLocation {
    position: usize,
    category: usize,
    sub_quest: Option<usize>,
}

/// The catalog flattened once into traversal order.
///
/// Built when the catalog is installed and never recomputed afterwards: every
/// status query and successor lookup goes through the precomputed sequence and
/// id map.
#[derive(Resource, Debug, Default)]
pub struct QuestTrail {
    catalog: QuestCatalog,
    sequence: Vec<String>,
    locations: HashMap<String, QuestLocation>,
}

impl QuestTrail {
    pub fn new(catalog: QuestCatalog) -> Result<Self, QuestError> {
        catalog.validate()?;

        let mut sequence = Vec::new();
        let mut locations = HashMap::default();
        for (category_index, category) in catalog.categories.iter().enumerate() {
            let ids = std::iter::once((None, &category.content.id)).chain(
                category
                    .sub_quests
                    .iter()
                    .enumerate()
                    .map(|(sub_index, sub)| (Some(sub_index), &sub.content.id)),
            );

            for (sub_quest, id) in ids {
                locations.insert(
                    id.clone(),
                    QuestLocation {
                        position: sequence.len(),
                        category: category_index,
                        sub_quest,
                    },
                );
                sequence.push(id.clone());
            }
        }

        debug!(quests = sequence.len(), "linearized quest catalog");
        Ok(Self {
            catalog,
            sequence,
            locations,
        })
    }

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    /// Every quest id in traversal order.
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.sequence.first().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Result<usize, QuestError> {
        self.location(id).map(|location| location.position)
    }

    pub fn lookup(&self, id: &str) -> Result<&Quest, QuestError> {
        let location = self.location(id)?;
        let category = &self.catalog.categories[location.category];
        Ok(match location.sub_quest {
            Some(sub_index) => &category.sub_quests[sub_index].content,
            None => &category.content,
        })
    }

    /// Id of the category owning `id`, or `None` when `id` is a category.
    pub fn parent_category(&self, id: &str) -> Result<Option<&str>, QuestError> {
        let location = self.location(id)?;
        Ok(location
            .sub_quest
            .map(|_| self.catalog.categories[location.category].id()))
    }

    /// The structurally next quest, regardless of its status.
    pub fn next_id(&self, id: &str) -> Result<Option<&str>, QuestError> {
        let position = self.position(id)?;
        Ok(self.sequence.get(position + 1).map(String::as_str))
    }

    fn location(&self, id: &str) -> Result<QuestLocation, QuestError> {
        self.locations
            .get(id)
            .copied()
            .ok_or_else(|| QuestError::NotFound(id.to_owned()))
    }
}

use {
    crate::QuestTrail,
    bevy::prelude::*,
    quest_assets::{Badge, Quest, QuestError, QuestType},
    quest_components::QuestStatus,
    quest_resources::CompletedQuests,
};

/// The active point of the trail: the first category whose own id is not
/// completed, and that category's first uncompleted sub-quest.
///
/// Everything before it is done, everything after it is locked. Cached as a
/// resource and only recomputed when the completed set or the trail changes.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestFrontier {
    pub category: Option<String>,
    pub sub_quest: Option<String>,
}

impl QuestFrontier {
    /// Status of `id` against this frontier. Callers must already know `id` is
    /// in the catalog.
    pub fn status_of(
        &self,
        id: &str,
        completed: &CompletedQuests,
    ) -> Result<QuestStatus, QuestError> {
        if completed.contains(id) {
            return Ok(QuestStatus::Done);
        }

        // Only reachable when every category is completed but `id` is not,
        // i.e. the completed set skipped ahead of the trail.
        let Some(category) = &self.category else {
            return Err(QuestError::InvariantViolation(id.to_owned()));
        };

        if category == id || self.sub_quest.as_deref() == Some(id) {
            Ok(QuestStatus::Unlocked)
        } else {
            Ok(QuestStatus::Locked)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.category.is_none()
    }
}

/// What the quest box offers for a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestAction {
    /// Quests of type `None` have no button.
    Hidden,
    Locked,
    Completed,
    Complete,
    Next,
}

impl QuestAction {
    pub fn derive(kind: QuestType, status: QuestStatus) -> Self {
        match (kind, status) {
            (QuestType::None, _) => Self::Hidden,
            (_, QuestStatus::Locked) => Self::Locked,
            (_, QuestStatus::Done) => Self::Completed,
            (QuestType::Complete, QuestStatus::Unlocked) => Self::Complete,
            (QuestType::Next, QuestStatus::Unlocked) => Self::Next,
        }
    }
}

/// Everything the completion handler needs to know before touching the store.
#[derive(Debug)]
pub struct CompletionPlan<'a> {
    pub quest: &'a Quest,
    pub status: QuestStatus,
    /// The quest's own id, followed by its roll-up parent when that differs.
    pub ids: Vec<String>,
}

impl CompletionPlan<'_> {
    pub fn rolled_up(&self) -> Option<&str> {
        self.ids.get(1).map(String::as_str)
    }
}

impl QuestTrail {
    pub fn frontier(&self, completed: &CompletedQuests) -> QuestFrontier {
        let Some(category) = self
            .catalog()
            .categories
            .iter()
            .find(|category| !completed.contains(category.id()))
        else {
            return QuestFrontier::default();
        };

        let sub_quest = category
            .sub_quests
            .iter()
            .find(|sub| !completed.contains(&sub.content.id))
            .map(|sub| sub.content.id.clone());

        QuestFrontier {
            category: Some(category.id().to_owned()),
            sub_quest,
        }
    }

    /// Done, Unlocked or Locked for `id` given the completed set.
    pub fn status_of(
        &self,
        id: &str,
        completed: &CompletedQuests,
    ) -> Result<QuestStatus, QuestError> {
        self.position(id)?;
        self.frontier(completed).status_of(id, completed)
    }

    /// Ids that completing `id` adds to the completed set.
    pub fn completion_ids(&self, id: &str) -> Result<Vec<String>, QuestError> {
        let quest = self.lookup(id)?;
        let mut ids = vec![quest.id.clone()];
        if let Some(parent) = &quest.complete_parent_id
            && parent != &quest.id
        {
            ids.push(parent.clone());
        }
        Ok(ids)
    }

    pub fn plan_completion(
        &self,
        id: &str,
        completed: &CompletedQuests,
    ) -> Result<CompletionPlan<'_>, QuestError> {
        Ok(CompletionPlan {
            quest: self.lookup(id)?,
            status: self.status_of(id, completed)?,
            ids: self.completion_ids(id)?,
        })
    }

    /// Applies a completion and its roll-up directly to a completed set.
    /// Returns how many ids were new.
    pub fn complete(&self, id: &str, completed: &mut CompletedQuests) -> Result<usize, QuestError> {
        Ok(completed.append(self.completion_ids(id)?))
    }

    pub fn action_for(
        &self,
        id: &str,
        completed: &CompletedQuests,
    ) -> Result<QuestAction, QuestError> {
        let quest = self.lookup(id)?;
        let status = self.status_of(id, completed)?;
        Ok(QuestAction::derive(quest.kind, status))
    }

    /// Share of catalog quests completed, 0 to 100. Ids outside the catalog
    /// are ignored.
    pub fn progress_percent(&self, completed: &CompletedQuests) -> f32 {
        if self.is_empty() {
            return 0.0;
        }

        let done = self
            .sequence()
            .iter()
            .filter(|id| completed.contains(id))
            .count();
        done as f32 * 100.0 / self.len() as f32
    }

    /// Progress snapped to the nearest multiple of 5, as the progress bar shows it.
    pub fn rounded_progress(&self, completed: &CompletedQuests) -> u32 {
        ((self.progress_percent(completed) / 5.0).round() * 5.0) as u32
    }

    /// Badges of completed categories, in catalog order.
    pub fn earned_badges(&self, completed: &CompletedQuests) -> Vec<&Badge> {
        self.catalog()
            .categories
            .iter()
            .filter(|category| completed.contains(category.id()))
            .filter_map(|category| self.catalog().badge(&category.content.badge))
            .collect()
    }
}

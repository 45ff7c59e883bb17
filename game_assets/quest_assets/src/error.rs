use thiserror::Error;

/// Failures raised by catalog lookups and progression queries.
///
/// `NotFound` and `InvariantViolation` mean the caller handed over an id or a
/// completed set that the catalog cannot account for. They are never turned
/// into a default status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("quest `{0}` is not in the catalog")]
    NotFound(String),

    #[error("no unfinished category left while quest `{0}` is not done")]
    InvariantViolation(String),

    #[error("quest id `{0}` appears more than once in the catalog")]
    DuplicateId(String),

    #[error("quest `{quest}` references unknown badge `{badge}`")]
    UnknownBadge { quest: String, badge: String },

    #[error("quest `{quest}` rolls up into `{parent}`, which is not in the catalog")]
    UnknownParent { quest: String, parent: String },

    #[error("catalog contains no quests")]
    EmptyCatalog,
}

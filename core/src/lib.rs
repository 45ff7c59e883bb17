use {
    bevy::prelude::*,
    loading::{CatalogSource, DEFAULT_CATALOG_PATH, LoadingManagerPlugin},
    progression::ProgressionPlugin,
    quest_assets::QuestAssetsPlugin,
    states::AppState,
};

mod systems;

/// Everything the quest trail needs to run, minus rendering.
pub struct CorePlugin {
    /// Catalog asset path, relative to the asset folder.
    pub catalog_path: String,
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self {
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
        }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .add_plugins((QuestAssetsPlugin, ProgressionPlugin, LoadingManagerPlugin))
            .insert_resource(CatalogSource::new(self.catalog_path.clone()))
            .add_systems(OnEnter(AppState::Running), systems::report_progress)
            .add_systems(
                Update,
                systems::report_progress
                    .run_if(in_state(AppState::Running).and(systems::progress_changed)),
            );
    }
}

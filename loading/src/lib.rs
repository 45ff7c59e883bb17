mod resources;

use {
    crate::resources::CatalogHandle,
    bevy::{asset::LoadState, prelude::*},
    progression::QuestTrail,
    quest_assets::QuestCatalog,
    quest_events::QuestFault,
    states::AppState,
};

pub const DEFAULT_CATALOG_PATH: &str = "quests/onboarding.catalog.ron";

/// Asset path of the quest catalog, relative to the asset folder.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub path: String,
}

impl CatalogSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_PATH)
    }
}

pub struct LoadingManagerPlugin;

impl Plugin for LoadingManagerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CatalogSource>()
            .init_resource::<LoadingStatus>()
            .add_systems(Startup, start_loading)
            .add_systems(
                Update,
                check_catalog_loaded
                    .run_if(in_state(AppState::Loading).and(resource_exists::<CatalogHandle>)),
            )
            .add_systems(OnEnter(AppState::Running), finish_loading);
    }
}

#[derive(Resource, Default, Debug)]
pub struct LoadingStatus {
    pub current_phase: String,
    pub detail: String,
}

fn start_loading(
    mut commands: Commands,
    source: Res<CatalogSource>,
    asset_server: Res<AssetServer>,
    mut status: ResMut<LoadingStatus>,
) {
    info!(path = %source.path, "started loading quest catalog");
    status.current_phase = "Loading Assets".into();
    status.detail = source.path.clone();
    commands.insert_resource(CatalogHandle(asset_server.load(source.path.clone())));
}

/// Installs the trail once the catalog asset is available. A catalog that
/// fails to load or validate is reported and loading stops.
fn check_catalog_loaded(
    mut commands: Commands,
    handle: Res<CatalogHandle>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<QuestCatalog>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut status: ResMut<LoadingStatus>,
) {
    let Some(catalog) = catalogs.get(&handle.0) else {
        if let LoadState::Failed(error) = asset_server.load_state(handle.0.id()) {
            fail_loading(&mut commands, &mut status, error);
        }
        return;
    };

    match QuestTrail::new(catalog.clone()) {
        Ok(trail) => {
            info!(quests = trail.len(), "quest catalog loaded");
            status.current_phase = "Ready".into();
            commands.insert_resource(trail);
            next_state.set(AppState::Running);
        }
        Err(error) => fail_loading(&mut commands, &mut status, error),
    }
}

fn fail_loading(
    commands: &mut Commands,
    status: &mut LoadingStatus,
    error: impl std::fmt::Display,
) {
    error!(%error, "quest catalog rejected");
    status.current_phase = "Failed".into();
    status.detail = error.to_string();
    commands.remove_resource::<CatalogHandle>();
    commands.trigger(QuestFault {
        message: error.to_string(),
    });
}

fn finish_loading(mut status: ResMut<LoadingStatus>) {
    info!("loading finished");
    status.detail.clear();
}

//! Define common resources used for asset loading

use {bevy::prelude::*, quest_assets::QuestCatalog};

#[derive(Debug, Resource)]
pub(super) struct CatalogHandle(pub Handle<QuestCatalog>);

mod walkthrough;

use {
    bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*, state::app::StatesPlugin},
    quest_core::CorePlugin,
    std::time::Duration,
};

fn main() -> AppExit {
    // An optional first argument replaces the catalog asset path.
    let core = std::env::args()
        .nth(1)
        .map_or_else(CorePlugin::default, |catalog_path| CorePlugin { catalog_path });

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(16))),
            LogPlugin {
                filter: "error,loading=debug,\
                    progression=debug,\
                    quest_core=info,\
                    quest_trail=info"
                    .into(),
                level: bevy::log::Level::DEBUG,
                ..Default::default()
            },
            AssetPlugin::default(),
            StatesPlugin,
        ))
        .add_plugins(core)
        .add_plugins(walkthrough::WalkthroughPlugin)
        .run()
}

mod roster;

use bevy::prelude::*;

pub use roster::{
    dismiss_selection_system, ingest_records, setup_scene, PlayerRoster, SelectedPlayer,
};

pub fn scene_plugin(app: &mut App) {
    app.init_resource::<SelectedPlayer>()
        .add_systems(Startup, setup_scene)
        .add_systems(Update, (ingest_records, dismiss_selection_system));
}

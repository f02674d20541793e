//! Roster snapshot state: ingest_records system, PlayerRoster, SelectedPlayer.

use bevy::log::info;
use bevy::prelude::*;

use crate::data::{PlayerRecord, RecordChannel};

/// Latest full snapshot of the players table.
#[derive(Resource, Default, Debug)]
pub struct PlayerRoster {
    pub records: Vec<PlayerRecord>,
    /// Snapshots received so far; zero means still loading.
    pub snapshots: u64,
}

impl PlayerRoster {
    pub fn is_loaded(&self) -> bool {
        self.snapshots > 0
    }

    pub fn replace(&mut self, records: Vec<PlayerRecord>) {
        self.records = records;
        self.snapshots += 1;
    }
}

/// Player whose profile popup is open, if any.
#[derive(Resource, Default, Debug)]
pub struct SelectedPlayer(pub Option<PlayerRecord>);

pub fn setup_scene(mut commands: Commands) {
    commands.insert_resource(PlayerRoster::default());
    commands.spawn(Camera2d);
}

/// Keeps only the newest snapshot waiting in the channel.
pub fn ingest_records(channel: Res<RecordChannel>, mut roster: ResMut<PlayerRoster>) {
    let Some(latest) = channel.0.try_iter().last() else {
        return;
    };
    if roster.is_loaded() && roster.records == latest {
        return;
    }
    info!("tierlist: roster updated, {} players", latest.len());
    roster.replace(latest);
}

pub fn dismiss_selection_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut selected: ResMut<SelectedPlayer>,
) {
    if keys.just_pressed(KeyCode::Escape) && selected.0.is_some() {
        selected.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_scene_inserts_roster_and_camera() {
        let mut app = App::new();
        app.add_systems(Startup, setup_scene);

        app.update();

        let roster = app.world().resource::<PlayerRoster>();
        assert!(!roster.is_loaded());

        let world = app.world_mut();
        assert_eq!(world.query::<&Camera2d>().iter(world).count(), 1);
    }

    #[test]
    fn ingest_keeps_newest_snapshot() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new();
        app.insert_resource(RecordChannel(rx))
            .init_resource::<PlayerRoster>()
            .add_systems(Update, ingest_records);

        tx.send(vec![PlayerRecord::new("Old", "HT1", "EU")]).unwrap();
        tx.send(vec![
            PlayerRecord::new("Alice", "HT1", "EU"),
            PlayerRecord::new("Bob", "LT2", "AS"),
        ])
        .unwrap();
        app.update();

        let roster = app.world().resource::<PlayerRoster>();
        assert_eq!(roster.records.len(), 2);
        assert_eq!(roster.records[0].ign, "Alice");
        assert_eq!(roster.snapshots, 1);
    }

    #[test]
    fn empty_snapshot_still_marks_loaded() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new();
        app.insert_resource(RecordChannel(rx))
            .init_resource::<PlayerRoster>()
            .add_systems(Update, ingest_records);

        app.update();
        assert!(!app.world().resource::<PlayerRoster>().is_loaded());

        tx.send(Vec::new()).unwrap();
        app.update();
        assert!(app.world().resource::<PlayerRoster>().is_loaded());
    }

    #[test]
    fn escape_clears_selection() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(SelectedPlayer(Some(PlayerRecord::new("Steve", "HT1", "EU"))))
            .add_systems(Update, dismiss_selection_system);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();

        assert!(app.world().resource::<SelectedPlayer>().0.is_none());
    }
}

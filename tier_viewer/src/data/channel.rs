use std::path::Path;

use bevy::log::info;
use crossbeam_channel::Receiver;

use crate::data::{PlayerRecord, RecordFetcher, RecordSource, StoreError, SupabaseFetcher};

/// Bevy resource holding the channel from the roster fetcher thread.
/// Drained by `ingest_records`.
#[derive(bevy::prelude::Resource)]
pub struct RecordChannel(pub Receiver<Vec<PlayerRecord>>);

/// Open a channel for the configured source: a polling store fetcher or a fixture replay.
pub fn init_record_channel(source: &RecordSource) -> Result<RecordChannel, StoreError> {
    match source {
        RecordSource::Store(config) => Ok(RecordChannel(SupabaseFetcher::spawn(config.clone()))),
        RecordSource::Fixture(path) => init_fixture_channel(path),
    }
}

/// Create a channel that replays one pre-recorded snapshot from a JSON fixture file.
/// The file is read and decoded up front so a bad fixture fails at startup.
pub fn init_fixture_channel(path: &Path) -> Result<RecordChannel, StoreError> {
    let json = std::fs::read_to_string(path)?;
    let records: Vec<PlayerRecord> = serde_json::from_str(&json)?;
    info!(
        "tierlist: replaying {} players from {}",
        records.len(),
        path.display()
    );

    let (tx, rx) = crossbeam_channel::bounded(1);
    // Capacity 1 holds the single snapshot; the sender drops right after.
    let _ = tx.send(records);

    Ok(RecordChannel(rx))
}

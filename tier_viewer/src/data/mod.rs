mod channel;
mod model;
pub mod store;

use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::Receiver;
use url::Url;

pub use channel::{init_fixture_channel, init_record_channel, RecordChannel};
pub use model::{skin_key, PlayerRecord, Region};
pub use store::{StoreError, SupabaseFetcher};

/// Connection settings for the hosted `players` table.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub base_url: Url,
    pub anon_key: Option<String>,
    pub refresh: Duration,
}

/// Where roster snapshots come from.
#[derive(Clone, Debug)]
pub enum RecordSource {
    Store(StoreConfig),
    /// JSON array of records replayed once, for offline runs and tests.
    Fixture(PathBuf),
}

/// Interface for roster fetchers running off the main thread.
/// Each message on the receiver is a complete snapshot of the table.
pub trait RecordFetcher: Send + 'static {
    fn spawn(config: StoreConfig) -> Receiver<Vec<PlayerRecord>>;
}

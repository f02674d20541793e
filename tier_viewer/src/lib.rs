//! Tierlist viewer: ranked player tables and a rotating 3D skin preview.
//!
//! Library root: ranking engine, data sources, viewport lifecycle and the app builder.

pub mod assets;
pub mod config;
pub mod data;
pub mod ranking;
pub mod scene;
mod ui;
pub mod viewport;

pub mod prelude;
pub mod sdk;

pub use data::{
    init_fixture_channel, init_record_channel, PlayerRecord, RecordChannel, RecordFetcher,
    RecordSource, StoreConfig, StoreError, SupabaseFetcher,
};
pub use ranking::{find_by_ign, group_by_tier, top_n};

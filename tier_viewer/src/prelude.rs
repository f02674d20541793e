//! Minimal prelude for SDK consumers.

pub use crate::config::{viewer_config, ConfigError, ViewerConfig};
pub use crate::data::{PlayerRecord, RecordFetcher, RecordSource, StoreConfig};
pub use crate::ranking::{find_by_ign, group_by_tier, top_n, RankBadge, RankTitle, Tier};
pub use crate::sdk::TierlistBuilder;
pub use crate::viewport::{ModelViewport, ViewportHost, ViewportPhase};

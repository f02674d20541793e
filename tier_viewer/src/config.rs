//! Env parsing and constants.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bevy::log::warn;
use url::Url;

use crate::data::{RecordSource, StoreConfig};
use crate::ranking::DEFAULT_LEADERBOARD_SIZE;

const FIXTURE_ENV: &str = "TIERLIST_FIXTURE";
const STORE_URL_ENV: &str = "SUPABASE_URL";
const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
const SKIN_BASE_ENV: &str = "SKIN_BASE_URL";
const REFRESH_ENV: &str = "REFRESH_SECS";
const LEADERBOARD_SIZE_ENV: &str = "LEADERBOARD_SIZE";

pub const DEFAULT_SKIN_BASE: &str = "https://minotar.net";
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no record source: set SUPABASE_URL or TIERLIST_FIXTURE")]
    NoRecordSource,
    #[error("invalid SUPABASE_URL {raw:?}: {source}")]
    InvalidStoreUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid skin base URL {raw:?}: {source}")]
    InvalidSkinBase {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot open record source: {0}")]
    Records(#[from] crate::data::StoreError),
}

/// Everything the viewer reads from the environment.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub source: RecordSource,
    pub skin_base: Url,
    pub leaderboard_size: usize,
}

/// Builds the viewer config from env vars.
/// A fixture path wins over the store; optional values fall back to defaults.
pub fn viewer_config() -> Result<ViewerConfig, ConfigError> {
    Ok(ViewerConfig {
        source: record_source()?,
        skin_base: skin_base()?,
        leaderboard_size: env_parse(LEADERBOARD_SIZE_ENV, DEFAULT_LEADERBOARD_SIZE),
    })
}

fn record_source() -> Result<RecordSource, ConfigError> {
    if let Some(path) = non_empty_env(FIXTURE_ENV) {
        return Ok(RecordSource::Fixture(PathBuf::from(path)));
    }

    let raw = non_empty_env(STORE_URL_ENV).ok_or(ConfigError::NoRecordSource)?;
    let base_url = raw
        .parse::<Url>()
        .map_err(|source| ConfigError::InvalidStoreUrl { raw, source })?;

    Ok(RecordSource::Store(StoreConfig {
        base_url,
        anon_key: non_empty_env(ANON_KEY_ENV),
        refresh: Duration::from_secs(env_parse(REFRESH_ENV, DEFAULT_REFRESH.as_secs())),
    }))
}

fn skin_base() -> Result<Url, ConfigError> {
    if let Some(raw) = non_empty_env(SKIN_BASE_ENV) {
        match raw.parse::<Url>() {
            Ok(url) => return Ok(url),
            Err(err) => warn!("tierlist: invalid URL in {SKIN_BASE_ENV}: {raw:?} ({err})"),
        }
    }
    default_skin_base()
}

pub fn default_skin_base() -> Result<Url, ConfigError> {
    DEFAULT_SKIN_BASE
        .parse()
        .map_err(|source| ConfigError::InvalidSkinBase {
            raw: DEFAULT_SKIN_BASE.to_string(),
            source,
        })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    let Some(raw) = non_empty_env(key) else {
        return default;
    };
    raw.parse().unwrap_or_else(|_| {
        warn!("tierlist: ignoring invalid {key}: {raw:?}");
        default
    })
}

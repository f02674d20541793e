//! Roster fetcher: dedicated thread + reqwest → PostgREST `players` table.

use std::thread;

use bevy::log::{info, warn};
use crossbeam_channel::{Receiver, Sender};
use reqwest::StatusCode;
use url::Url;

use crate::data::{PlayerRecord, RecordFetcher, StoreConfig};

const PLAYERS_PATH: &str = "rest/v1/players";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store answered {0}")]
    Status(StatusCode),
    #[error("bad store URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("cannot read fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode records: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Polls the Supabase REST endpoint and publishes each full snapshot.
pub struct SupabaseFetcher;

impl RecordFetcher for SupabaseFetcher {
    fn spawn(config: StoreConfig) -> Receiver<Vec<PlayerRecord>> {
        let (tx, rx) = crossbeam_channel::bounded(4);
        thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    warn!("tierlist: failed to build tokio runtime: {err}");
                    return;
                }
            };
            rt.block_on(poll_loop(config, tx));
        });
        rx
    }
}

async fn poll_loop(config: StoreConfig, tx: Sender<Vec<PlayerRecord>>) {
    let url = match players_url(&config.base_url) {
        Ok(url) => url,
        Err(err) => {
            warn!("tierlist: {err}");
            return;
        }
    };
    let client = reqwest::Client::new();

    loop {
        match fetch_players(&client, &url, config.anon_key.as_deref()).await {
            Ok(records) => {
                info!("tierlist: fetched {} players", records.len());
                if tx.send(records).is_err() {
                    return;
                }
            }
            // The previous snapshot stays on screen until the next poll succeeds.
            Err(err) => warn!("tierlist: roster fetch failed: {err}"),
        }
        tokio::time::sleep(config.refresh).await;
    }
}

/// `{base}/rest/v1/players?select=*`, tolerating a base without a trailing slash.
pub fn players_url(base: &Url) -> Result<Url, StoreError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let mut url = base.join(PLAYERS_PATH)?;
    url.query_pairs_mut().append_pair("select", "*");
    Ok(url)
}

async fn fetch_players(
    client: &reqwest::Client,
    url: &Url,
    anon_key: Option<&str>,
) -> Result<Vec<PlayerRecord>, StoreError> {
    let mut request = client.get(url.clone());
    if let Some(key) = anon_key {
        request = request.header("apikey", key).bearer_auth(key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Status(status));
    }
    Ok(response.json().await?)
}

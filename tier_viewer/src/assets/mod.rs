//! Skin and thumbnail downloads on a worker thread.
//!
//! Requests go in over a tokio channel so the worker can await them; decoded
//! images come back over crossbeam and are drained once per frame.

mod thumbnails;

use std::thread;

use bevy::asset::RenderAssetUsages;
use bevy::image::{CompressedImageFormats, ImageSampler, ImageType, TextureError};
use bevy::log::{debug, warn};
use bevy::prelude::*;
use crossbeam_channel::Receiver;
use reqwest::StatusCode;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::viewport::InstanceId;

pub use thumbnails::{Thumbnail, Thumbnails};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("cannot decode image: {0}")]
    Decode(#[from] TextureError),
    #[error("asset worker is gone")]
    Closed,
}

#[derive(Debug)]
pub enum AssetRequest {
    /// Full skin texture for a preview instance.
    Skin { instance: InstanceId, url: Url },
    /// Leaderboard head icon, with a second URL tried on failure.
    Thumbnail { ign: String, url: Url, fallback: Url },
}

#[derive(Debug)]
pub enum AssetResponse {
    Skin {
        instance: InstanceId,
        result: Result<Image, AssetError>,
    },
    Thumbnail {
        ign: String,
        result: Result<Image, AssetError>,
    },
}

/// Handle to the download worker.
#[derive(Resource)]
pub struct AssetFetcher {
    requests: UnboundedSender<AssetRequest>,
    responses: Receiver<AssetResponse>,
}

impl AssetFetcher {
    /// Wraps existing channel ends. Tests use this to play the worker.
    pub fn new(requests: UnboundedSender<AssetRequest>, responses: Receiver<AssetResponse>) -> Self {
        Self {
            requests,
            responses,
        }
    }

    pub fn spawn() -> Self {
        let (req_tx, mut req_rx) = tokio::sync::mpsc::unbounded_channel::<AssetRequest>();
        let (resp_tx, resp_rx) = crossbeam_channel::unbounded();

        thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    warn!("tierlist: failed to build asset runtime: {err}");
                    return;
                }
            };
            rt.block_on(async move {
                let client = reqwest::Client::new();
                while let Some(request) = req_rx.recv().await {
                    let client = client.clone();
                    let tx = resp_tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(serve(&client, request).await);
                    });
                }
            });
        });

        Self::new(req_tx, resp_rx)
    }

    pub fn request(&self, request: AssetRequest) -> Result<(), AssetError> {
        self.requests.send(request).map_err(|_| AssetError::Closed)
    }

    pub fn try_recv(&self) -> Option<AssetResponse> {
        self.responses.try_recv().ok()
    }
}

async fn serve(client: &reqwest::Client, request: AssetRequest) -> AssetResponse {
    match request {
        AssetRequest::Skin { instance, url } => AssetResponse::Skin {
            instance,
            result: fetch_image(client, &url).await,
        },
        AssetRequest::Thumbnail { ign, url, fallback } => {
            let result = match fetch_image(client, &url).await {
                Ok(image) => Ok(image),
                Err(err) => {
                    debug!("tierlist: thumbnail for {ign} unavailable ({err}), using fallback");
                    fetch_image(client, &fallback).await
                }
            };
            AssetResponse::Thumbnail { ign, result }
        }
    }
}

async fn fetch_image(client: &reqwest::Client, url: &Url) -> Result<Image, AssetError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AssetError::Status(status));
    }
    let bytes = response.bytes().await?;
    decode_png(&bytes)
}

/// Decodes a PNG with nearest-neighbour sampling, which keeps skin pixels crisp.
pub fn decode_png(bytes: &[u8]) -> Result<Image, AssetError> {
    Ok(Image::from_buffer(
        bytes,
        ImageType::Extension("png"),
        CompressedImageFormats::NONE,
        true,
        ImageSampler::nearest(),
        RenderAssetUsages::default(),
    )?)
}

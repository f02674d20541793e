use std::collections::HashMap;

use bevy::log::warn;
use bevy::prelude::*;
use url::Url;

use crate::assets::{AssetError, AssetFetcher, AssetRequest};
use crate::viewport::{fallback_thumbnail_url, thumbnail_url};

#[derive(Clone, Debug, PartialEq)]
pub enum Thumbnail {
    Pending,
    Ready(Handle<Image>),
    /// Both the player's icon and the fallback failed; draw a placeholder.
    Missing,
}

/// Head icons keyed by lowercase IGN. Each IGN is fetched at most once.
#[derive(Resource, Default, Debug)]
pub struct Thumbnails {
    entries: HashMap<String, Thumbnail>,
}

impl Thumbnails {
    pub fn get(&self, ign: &str) -> Option<&Thumbnail> {
        self.entries.get(&ign.trim().to_lowercase())
    }

    /// Queues a download unless one was already started for `ign`.
    pub fn request(&mut self, fetcher: &AssetFetcher, skin_base: &Url, ign: &str) {
        let key = ign.trim().to_lowercase();
        if self.entries.contains_key(&key) {
            return;
        }

        let urls = thumbnail_url(skin_base, ign).and_then(|url| Ok((url, fallback_thumbnail_url(skin_base)?)));
        let state = match urls {
            Ok((url, fallback)) => match fetcher.request(AssetRequest::Thumbnail {
                ign: key.clone(),
                url,
                fallback,
            }) {
                Ok(()) => Thumbnail::Pending,
                Err(err) => {
                    warn!("tierlist: cannot queue thumbnail for {ign}: {err}");
                    Thumbnail::Missing
                }
            },
            Err(err) => {
                warn!("tierlist: no thumbnail URL for {ign}: {err}");
                Thumbnail::Missing
            }
        };
        self.entries.insert(key, state);
    }

    pub fn resolve(&mut self, ign: &str, result: Result<Handle<Image>, AssetError>) {
        let state = match result {
            Ok(handle) => Thumbnail::Ready(handle),
            Err(err) => {
                warn!("tierlist: thumbnail for {ign} failed: {err}");
                Thumbnail::Missing
            }
        };
        self.entries.insert(ign.trim().to_lowercase(), state);
    }
}

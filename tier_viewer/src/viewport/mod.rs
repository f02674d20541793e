//! Rotating 3D skin preview for the selected player.

mod host;
pub mod humanoid;
mod lifecycle;
mod ticks;

use bevy::prelude::*;

use crate::assets::Thumbnails;

pub use host::{
    drive_ticks, ingest_assets, sync_selection, BevyViewportHost, HostParams, PreviewCamera,
    PreviewModel, PreviewSurfaces, Surface,
};
pub use lifecycle::{
    fallback_thumbnail_url, skin_url, thumbnail_url, CameraPose, InstanceId, ModelViewport,
    TickHandle, ViewportHost, ViewportPhase, DEFAULT_SURFACE_SIZE, SKIN_CAMERA, YAW_STEP,
};
pub use ticks::TickScheduler;

/// Preview and asset plumbing. Expects `AssetFetcher` to be inserted.
/// Without a `ModelViewport` resource only thumbnails are served.
pub fn viewport_plugin(app: &mut App) {
    app.init_resource::<TickScheduler>()
        .init_resource::<PreviewSurfaces>()
        .init_resource::<Thumbnails>()
        .add_systems(
            Update,
            (
                (sync_selection, drive_ticks)
                    .chain()
                    .run_if(resource_exists::<ModelViewport>),
                ingest_assets,
                host::dispose_on_exit,
            )
                .chain(),
        );
}

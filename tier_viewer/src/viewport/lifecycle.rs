//! Preview lifecycle: one instance per selected IGN, torn down before the next.
//!
//! `ModelViewport` only decides *what* happens; every side effect goes through
//! a [`ViewportHost`]. The Bevy host spawns cameras and meshes, the test host
//! records calls.
//!
//! ```text
//! Uninitialized ─select─▶ Mounting ─▶ TextureLoading ─ok─▶ Animating
//!                                          │ err                │
//!                                          ▼                    │
//!                                        Blank                  │
//!          any state ─select other / unmount─▶ Disposed ◀───────┘
//! ```

use std::f32::consts::TAU;
use std::fmt;

use bevy::log::{debug, info, warn};
use bevy::math::{UVec2, Vec3};
use bevy::prelude::Resource;
use url::Url;

use crate::data::skin_key;

/// Default surface size, matching the profile popup.
pub const DEFAULT_SURFACE_SIZE: UVec2 = UVec2::new(220, 320);

/// Yaw added per tick, in radians.
pub const YAW_STEP: f32 = 0.01;

/// Fixed full-body shot. Overrides whatever framing the model would get by default.
pub const SKIN_CAMERA: CameraPose = CameraPose {
    position: Vec3::new(0.0, 18.0, 75.0),
    target: Vec3::new(0.0, 18.0, 0.0),
    fov_degrees: 25.0,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view.
    pub fov_degrees: f32,
}

/// Identity of one mounted preview. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// A single outstanding redraw request, issued by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportPhase {
    Uninitialized,
    Mounting,
    TextureLoading,
    /// Texture fetch failed; the surface stays mounted and empty.
    Blank,
    Animating,
    Disposed,
}

/// Side effects the lifecycle needs from a renderer.
pub trait ViewportHost {
    type Texture;

    fn create_surface(&mut self, instance: InstanceId, size: UVec2);
    /// Starts an async fetch; the result comes back through
    /// [`ModelViewport::texture_loaded`].
    fn fetch_texture(&mut self, instance: InstanceId, url: Url);
    fn frame_model(&mut self, instance: InstanceId, texture: Self::Texture, pose: &CameraPose);
    fn request_tick(&mut self, instance: InstanceId) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
    fn draw(&mut self, instance: InstanceId, yaw: f32);
    fn release_surface(&mut self, instance: InstanceId);
}

#[derive(Debug)]
struct Instance {
    id: InstanceId,
    /// Lowercase IGN, for reselect checks.
    key: String,
    phase: ViewportPhase,
    pending_tick: Option<TickHandle>,
    yaw: f32,
}

/// The skin preview state machine. At most one instance is alive at a time.
#[derive(Resource, Debug)]
pub struct ModelViewport {
    skin_base: Url,
    surface_size: UVec2,
    active: Option<Instance>,
    idle_phase: ViewportPhase,
    next_id: u64,
}

impl ModelViewport {
    pub fn new(skin_base: Url) -> Self {
        Self {
            skin_base,
            surface_size: DEFAULT_SURFACE_SIZE,
            active: None,
            idle_phase: ViewportPhase::Uninitialized,
            next_id: 0,
        }
    }

    pub fn with_surface_size(mut self, size: UVec2) -> Self {
        self.surface_size = size;
        self
    }

    pub fn phase(&self) -> ViewportPhase {
        self.active.as_ref().map_or(self.idle_phase, |a| a.phase)
    }

    pub fn active_instance(&self) -> Option<InstanceId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn yaw(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.yaw)
    }

    pub fn surface_size(&self) -> UVec2 {
        self.surface_size
    }

    /// Points the preview at `ign`, or clears it with `None`.
    /// Selecting the IGN already shown is a no-op; anything else disposes
    /// the current instance before mounting a fresh one.
    pub fn select<H: ViewportHost>(&mut self, host: &mut H, ign: Option<&str>) {
        let wanted = ign.map(str::trim).filter(|s| !s.is_empty());

        if let (Some(ign), Some(active)) = (wanted, &self.active) {
            if active.key == ign.to_lowercase() {
                return;
            }
        }

        self.dispose(host);
        if let Some(ign) = wanted {
            self.mount(host, ign);
        }
    }

    fn mount<H: ViewportHost>(&mut self, host: &mut H, ign: &str) {
        let id = InstanceId(self.next_id);
        self.next_id += 1;

        let mut instance = Instance {
            id,
            key: ign.to_lowercase(),
            phase: ViewportPhase::Mounting,
            pending_tick: None,
            yaw: 0.0,
        };
        host.create_surface(id, self.surface_size);

        match skin_url(&self.skin_base, ign) {
            Ok(url) => {
                info!("tierlist: loading skin {url} for preview {}", id.0);
                instance.phase = ViewportPhase::TextureLoading;
                host.fetch_texture(id, url);
            }
            Err(err) => {
                warn!("tierlist: no skin URL for {ign:?}: {err}");
                instance.phase = ViewportPhase::Blank;
            }
        }
        self.active = Some(instance);
    }

    /// Completion of a fetch started by [`ViewportHost::fetch_texture`].
    /// Ignored unless `instance` is still the live one and waiting on it.
    /// Returns whether the texture was applied.
    pub fn texture_loaded<H, E>(
        &mut self,
        host: &mut H,
        instance: InstanceId,
        result: Result<H::Texture, E>,
    ) -> bool
    where
        H: ViewportHost,
        E: fmt::Display,
    {
        let Some(active) = self
            .active
            .as_mut()
            .filter(|a| a.id == instance && a.phase == ViewportPhase::TextureLoading)
        else {
            debug!("tierlist: dropping texture for stale preview {}", instance.0);
            return false;
        };

        match result {
            Ok(texture) => {
                host.frame_model(instance, texture, &SKIN_CAMERA);
                active.phase = ViewportPhase::Animating;
                active.yaw = 0.0;
                host.draw(instance, active.yaw);
                active.pending_tick = Some(host.request_tick(instance));
                true
            }
            Err(err) => {
                warn!("tierlist: skin fetch failed for preview {}: {err}", instance.0);
                active.phase = ViewportPhase::Blank;
                false
            }
        }
    }

    /// One animation step. Only the handle most recently issued to the live
    /// instance advances the loop; each step requests exactly one successor.
    pub fn tick<H: ViewportHost>(&mut self, host: &mut H, handle: TickHandle) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.phase != ViewportPhase::Animating || active.pending_tick != Some(handle) {
            return false;
        }

        active.yaw = (active.yaw + YAW_STEP) % TAU;
        host.draw(active.id, active.yaw);
        active.pending_tick = Some(host.request_tick(active.id));
        true
    }

    /// Cancels the pending tick and releases the surface. Safe to repeat.
    pub fn dispose<H: ViewportHost>(&mut self, host: &mut H) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(handle) = active.pending_tick {
            host.cancel_tick(handle);
        }
        host.release_surface(active.id);
        self.idle_phase = ViewportPhase::Disposed;
        debug!("tierlist: disposed preview {}", active.id.0);
    }

    pub fn unmount<H: ViewportHost>(&mut self, host: &mut H) {
        self.dispose(host);
    }
}

/// `{base}/skin/{Ign}` with the IGN's first letter uppercased.
pub fn skin_url(base: &Url, ign: &str) -> Result<Url, url::ParseError> {
    endpoint(base, &["skin", &skin_key(ign)])
}

/// `{base}/helm/{ign}/32.png`.
pub fn thumbnail_url(base: &Url, ign: &str) -> Result<Url, url::ParseError> {
    endpoint(base, &["helm", ign.trim(), "32.png"])
}

/// Thumbnail shown when a player has no skin of their own.
pub fn fallback_thumbnail_url(base: &Url) -> Result<Url, url::ParseError> {
    thumbnail_url(base, "Steve")
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

//! Bevy side of the preview: offscreen camera, skin meshes and per-frame systems.

use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::ecs::system::SystemParam;
use bevy::log::warn;
use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::render::view::RenderLayers;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiUserTextures};
use url::Url;

use crate::assets::{AssetFetcher, AssetRequest, AssetResponse, Thumbnails};
use crate::scene::SelectedPlayer;
use crate::viewport::humanoid::{self, SkinLayout};
use crate::viewport::lifecycle::{CameraPose, InstanceId, ModelViewport, TickHandle, ViewportHost};
use crate::viewport::ticks::TickScheduler;

/// Lifts the figure so its middle sits on the camera's look-at height.
const MODEL_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 0.0);
const FIRST_PREVIEW_LAYER: usize = 1;
const PREVIEW_LAYERS: u64 = 8;

#[derive(Component)]
pub struct PreviewCamera(pub InstanceId);

#[derive(Component)]
pub struct PreviewModel(pub InstanceId);

/// GPU-side resources owned by one preview instance.
#[derive(Debug)]
pub struct Surface {
    pub target: Handle<Image>,
    pub size: UVec2,
    /// Set when egui is running; the popup draws this.
    pub egui_texture: Option<egui::TextureId>,
    camera: Entity,
    model: Option<Entity>,
    skin: Option<Handle<Image>>,
    layers: RenderLayers,
}

#[derive(Resource, Default, Debug)]
pub struct PreviewSurfaces {
    surfaces: HashMap<InstanceId, Surface>,
}

impl PreviewSurfaces {
    pub fn get(&self, instance: InstanceId) -> Option<&Surface> {
        self.surfaces.get(&instance)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

fn preview_layers(instance: InstanceId) -> RenderLayers {
    RenderLayers::layer(FIRST_PREVIEW_LAYER + (instance.0 % PREVIEW_LAYERS) as usize)
}

fn render_target(size: UVec2) -> Image {
    let extent = Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    };
    let mut image = Image::new_fill(
        extent,
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

/// Resources the Bevy host borrows for one system run.
#[derive(SystemParam)]
pub struct HostParams<'w, 's> {
    commands: Commands<'w, 's>,
    images: ResMut<'w, Assets<Image>>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    surfaces: ResMut<'w, PreviewSurfaces>,
    ticks: ResMut<'w, TickScheduler>,
    fetcher: Res<'w, AssetFetcher>,
    egui_textures: Option<ResMut<'w, EguiUserTextures>>,
}

impl<'w, 's> HostParams<'w, 's> {
    fn host(&mut self) -> BevyViewportHost<'_, 'w, 's> {
        BevyViewportHost {
            commands: &mut self.commands,
            images: &mut *self.images,
            meshes: &mut *self.meshes,
            materials: &mut *self.materials,
            surfaces: &mut *self.surfaces,
            ticks: &mut *self.ticks,
            fetcher: &*self.fetcher,
            egui_textures: self.egui_textures.as_deref_mut(),
        }
    }
}

pub struct BevyViewportHost<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    images: &'a mut Assets<Image>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    surfaces: &'a mut PreviewSurfaces,
    ticks: &'a mut TickScheduler,
    fetcher: &'a AssetFetcher,
    egui_textures: Option<&'a mut EguiUserTextures>,
}

impl ViewportHost for BevyViewportHost<'_, '_, '_> {
    type Texture = Image;

    fn create_surface(&mut self, instance: InstanceId, size: UVec2) {
        let target = self.images.add(render_target(size));
        let layers = preview_layers(instance);
        let camera = self
            .commands
            .spawn((
                Camera3d::default(),
                Camera {
                    target: RenderTarget::Image(target.clone().into()),
                    clear_color: ClearColorConfig::Custom(Color::NONE),
                    order: -1,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
                layers.clone(),
                PreviewCamera(instance),
            ))
            .id();
        let egui_texture = self
            .egui_textures
            .as_deref_mut()
            .map(|textures| textures.add_image(target.clone_weak()));

        self.surfaces.surfaces.insert(
            instance,
            Surface {
                target,
                size,
                egui_texture,
                camera,
                model: None,
                skin: None,
                layers,
            },
        );
    }

    fn fetch_texture(&mut self, instance: InstanceId, url: Url) {
        if let Err(err) = self.fetcher.request(AssetRequest::Skin { instance, url }) {
            warn!("tierlist: cannot queue skin for preview {}: {err}", instance.0);
        }
    }

    fn frame_model(&mut self, instance: InstanceId, texture: Image, pose: &CameraPose) {
        let Some(surface) = self.surfaces.surfaces.get_mut(&instance) else {
            return;
        };

        let layout = SkinLayout::detect(texture.width(), texture.height());
        let skin = self.images.add(texture);
        let solid = self.materials.add(StandardMaterial {
            base_color_texture: Some(skin.clone()),
            unlit: true,
            ..default()
        });
        let shell = self.materials.add(StandardMaterial {
            base_color_texture: Some(skin.clone()),
            unlit: true,
            alpha_mode: AlphaMode::Mask(0.5),
            cull_mode: None,
            double_sided: true,
            ..default()
        });

        let parts: Vec<_> = humanoid::parts(layout)
            .iter()
            .map(|part| {
                let material = if part.overlay { shell.clone() } else { solid.clone() };
                (self.meshes.add(part.mesh(layout)), material, part.center)
            })
            .collect();

        let layers = surface.layers.clone();
        let model = self
            .commands
            .spawn((
                PreviewModel(instance),
                Transform::from_translation(MODEL_OFFSET),
                Visibility::default(),
                layers.clone(),
            ))
            .with_children(|parent| {
                for (mesh, material, center) in parts {
                    parent.spawn((
                        Mesh3d(mesh),
                        MeshMaterial3d(material),
                        Transform::from_translation(center),
                        layers.clone(),
                    ));
                }
            })
            .id();

        self.commands.entity(surface.camera).insert((
            Transform::from_translation(pose.position).looking_at(pose.target, Vec3::Y),
            Projection::Perspective(PerspectiveProjection {
                fov: pose.fov_degrees.to_radians(),
                aspect_ratio: surface.size.x as f32 / surface.size.y as f32,
                ..default()
            }),
        ));
        surface.model = Some(model);
        surface.skin = Some(skin);
    }

    fn request_tick(&mut self, instance: InstanceId) -> TickHandle {
        self.ticks.request(instance)
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.ticks.cancel(handle);
    }

    fn draw(&mut self, instance: InstanceId, yaw: f32) {
        let Some(model) = self.surfaces.get(instance).and_then(|s| s.model) else {
            return;
        };
        self.commands.entity(model).insert(
            Transform::from_translation(MODEL_OFFSET).with_rotation(Quat::from_rotation_y(yaw)),
        );
    }

    fn release_surface(&mut self, instance: InstanceId) {
        let Some(surface) = self.surfaces.surfaces.remove(&instance) else {
            return;
        };
        self.commands.entity(surface.camera).despawn_recursive();
        if let Some(model) = surface.model {
            self.commands.entity(model).despawn_recursive();
        }
        if let Some(textures) = self.egui_textures.as_deref_mut() {
            textures.remove_image(&surface.target);
        }
        self.images.remove(&surface.target);
        if let Some(skin) = &surface.skin {
            self.images.remove(skin);
        }
    }
}

/// Mounts, swaps or clears the preview when the selected player changes.
pub fn sync_selection(
    selected: Res<SelectedPlayer>,
    mut viewport: ResMut<ModelViewport>,
    mut params: HostParams,
) {
    if !selected.is_changed() {
        return;
    }
    let ign = selected.0.as_ref().map(|record| record.ign.as_str());
    viewport.select(&mut params.host(), ign);
}

/// Routes finished downloads: skins to the viewport, icons to the thumbnail cache.
pub fn ingest_assets(
    viewport: Option<ResMut<ModelViewport>>,
    mut thumbnails: ResMut<Thumbnails>,
    mut params: HostParams,
) {
    let mut viewport = viewport;
    loop {
        let Some(response) = params.fetcher.try_recv() else {
            break;
        };
        match response {
            AssetResponse::Skin { instance, result } => {
                if let Some(viewport) = viewport.as_mut() {
                    viewport.texture_loaded(&mut params.host(), instance, result);
                }
            }
            AssetResponse::Thumbnail { ign, result } => {
                let result = result.map(|image| params.images.add(image));
                thumbnails.resolve(&ign, result);
            }
        }
    }
}

/// Fires due animation ticks, unless the window lost focus.
pub fn drive_ticks(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ModelViewport>,
    mut params: HostParams,
) {
    if windows.get_single().is_ok_and(|window| !window.focused) {
        return;
    }
    for (handle, _) in params.ticks.take_due() {
        viewport.tick(&mut params.host(), handle);
    }
}

/// Releases the live preview on app exit.
pub fn dispose_on_exit(
    mut exits: EventReader<AppExit>,
    viewport: Option<ResMut<ModelViewport>>,
    mut params: HostParams,
) {
    if exits.read().next().is_none() {
        return;
    }
    if let Some(mut viewport) = viewport {
        viewport.unmount(&mut params.host());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PlayerRecord;
    use crate::viewport::{viewport_plugin, ViewportPhase};

    struct Harness {
        app: App,
        requests: tokio::sync::mpsc::UnboundedReceiver<AssetRequest>,
        responses: crossbeam_channel::Sender<AssetResponse>,
    }

    fn harness() -> Harness {
        let (req_tx, requests) = tokio::sync::mpsc::unbounded_channel();
        let (responses, resp_rx) = crossbeam_channel::unbounded();

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .add_event::<AppExit>()
            .init_resource::<SelectedPlayer>()
            .init_resource::<Thumbnails>()
            .insert_resource(AssetFetcher::new(req_tx, resp_rx))
            .insert_resource(ModelViewport::new("https://minotar.net".parse().unwrap()))
            .add_plugins(viewport_plugin);
        app.update();

        Harness {
            app,
            requests,
            responses,
        }
    }

    fn select(app: &mut App, ign: Option<&str>) {
        app.world_mut().resource_mut::<SelectedPlayer>().0 =
            ign.map(|ign| PlayerRecord::new(ign, "HT1", "EU"));
        app.update();
    }

    fn count<C: Component>(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&C>().iter(world).count()
    }

    #[test]
    fn selection_drives_full_preview_lifecycle() {
        let mut h = harness();

        select(&mut h.app, Some("steve"));
        assert_eq!(count::<PreviewCamera>(&mut h.app), 1);
        assert_eq!(h.app.world().resource::<PreviewSurfaces>().len(), 1);

        let Ok(AssetRequest::Skin { instance, url }) = h.requests.try_recv() else {
            panic!("expected a skin request");
        };
        assert_eq!(url.as_str(), "https://minotar.net/skin/Steve");

        h.responses
            .send(AssetResponse::Skin {
                instance,
                result: Ok(Image::default()),
            })
            .unwrap();
        h.app.update();

        let viewport = h.app.world().resource::<ModelViewport>();
        assert_eq!(viewport.phase(), ViewportPhase::Animating);
        assert_eq!(count::<PreviewModel>(&mut h.app), 1);

        h.app.update();
        h.app.update();
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 1);
        assert!(h.app.world().resource::<ModelViewport>().yaw().unwrap() > 0.0);

        select(&mut h.app, None);
        assert_eq!(count::<PreviewCamera>(&mut h.app), 0);
        assert_eq!(count::<PreviewModel>(&mut h.app), 0);
        assert!(h.app.world().resource::<PreviewSurfaces>().is_empty());
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 0);
    }

    #[test]
    fn late_skin_for_replaced_preview_is_dropped() {
        let mut h = harness();

        select(&mut h.app, Some("Steve"));
        let Ok(AssetRequest::Skin { instance: steve, .. }) = h.requests.try_recv() else {
            panic!("expected a skin request");
        };
        select(&mut h.app, Some("Alex"));
        assert_eq!(count::<PreviewCamera>(&mut h.app), 1);

        h.responses
            .send(AssetResponse::Skin {
                instance: steve,
                result: Ok(Image::default()),
            })
            .unwrap();
        h.app.update();

        assert_eq!(count::<PreviewModel>(&mut h.app), 0);
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 0);
        assert_eq!(
            h.app.world().resource::<ModelViewport>().phase(),
            ViewportPhase::TextureLoading
        );
    }

    #[test]
    fn failed_skin_leaves_blank_preview_that_still_tears_down() {
        let mut h = harness();

        select(&mut h.app, Some("Steve"));
        let Ok(AssetRequest::Skin { instance, .. }) = h.requests.try_recv() else {
            panic!("expected a skin request");
        };
        h.responses
            .send(AssetResponse::Skin {
                instance,
                result: Err(crate::assets::AssetError::Closed),
            })
            .unwrap();
        h.app.update();
        h.app.update();

        assert_eq!(
            h.app.world().resource::<ModelViewport>().phase(),
            ViewportPhase::Blank
        );
        assert_eq!(count::<PreviewModel>(&mut h.app), 0);
        assert_eq!(count::<PreviewCamera>(&mut h.app), 1);
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 0);

        select(&mut h.app, None);
        assert_eq!(count::<PreviewCamera>(&mut h.app), 0);
        assert!(h.app.world().resource::<PreviewSurfaces>().is_empty());
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 0);
    }

    #[test]
    fn app_exit_releases_animating_preview() {
        let mut h = harness();

        select(&mut h.app, Some("Alex"));
        let Ok(AssetRequest::Skin { instance, .. }) = h.requests.try_recv() else {
            panic!("expected a skin request");
        };
        h.responses
            .send(AssetResponse::Skin {
                instance,
                result: Ok(Image::default()),
            })
            .unwrap();
        h.app.update();
        h.app.update();
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 1);

        h.app.world_mut().send_event(AppExit::Success);
        h.app.update();

        assert_eq!(
            h.app.world().resource::<ModelViewport>().phase(),
            ViewportPhase::Disposed
        );
        assert_eq!(count::<PreviewCamera>(&mut h.app), 0);
        assert_eq!(count::<PreviewModel>(&mut h.app), 0);
        assert!(h.app.world().resource::<PreviewSurfaces>().is_empty());
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 0);

        h.app.update();
        assert_eq!(h.app.world().resource::<TickScheduler>().pending(), 0);
    }

    #[test]
    fn thumbnails_are_stored_as_images() {
        let mut h = harness();
        h.responses
            .send(AssetResponse::Thumbnail {
                ign: "steve".into(),
                result: Ok(Image::default()),
            })
            .unwrap();
        h.app.update();

        let thumbs = h.app.world().resource::<Thumbnails>();
        assert!(matches!(thumbs.get("Steve"), Some(crate::assets::Thumbnail::Ready(_))));
    }
}

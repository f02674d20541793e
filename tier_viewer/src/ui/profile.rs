//! Selected-player popup with the rotating skin preview.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::ranking::Tier;
use crate::scene::SelectedPlayer;
use crate::ui::theme;
use crate::viewport::{ModelViewport, PreviewSurfaces, ViewportPhase};

pub fn profile_popup_system(
    mut contexts: EguiContexts,
    mut selected: ResMut<SelectedPlayer>,
    viewport: Option<Res<ModelViewport>>,
    surfaces: Res<PreviewSurfaces>,
) {
    let Some(record) = selected.0.clone() else {
        return;
    };

    let phase = viewport.as_ref().map(|vp| vp.phase());
    let preview = viewport
        .as_ref()
        .and_then(|vp| vp.active_instance())
        .and_then(|id| surfaces.get(id))
        .and_then(|surface| surface.egui_texture.map(|id| (id, surface.size)));

    let mut open = true;
    egui::Window::new(record.ign.as_str())
        .id(egui::Id::new("profile"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(theme::popup_frame())
        .show(contexts.ctx_mut(), |ui| {
            theme::apply_text_style(ui);

            match (phase, preview) {
                (Some(ViewportPhase::Animating), Some((texture, size))) => {
                    ui.add(egui::Image::new(egui::load::SizedTexture::new(
                        texture,
                        [size.x as f32, size.y as f32],
                    )));
                }
                (Some(phase), Some((_, size))) => preview_placeholder(ui, phase, size),
                _ => {}
            }
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Region");
                theme::region_chip(ui, &record.region, record.region());
            });
            ui.horizontal(|ui| {
                ui.label("Tier");
                match Tier::parse(&record.tier) {
                    Some(tier) => theme::chip(
                        ui,
                        tier.to_string(),
                        theme::band_color(tier.band),
                        egui::Color32::BLACK,
                    ),
                    None if record.is_retired() => {
                        theme::chip(ui, "Retired", egui::Color32::DARK_GRAY, theme::TEXT)
                    }
                    None => theme::chip(ui, "Unranked", egui::Color32::DARK_GRAY, theme::TEXT),
                }
            });
            if !record.gamemode.trim().is_empty() {
                ui.label(egui::RichText::new(&record.gamemode).color(theme::MUTED));
            }
            ui.add_space(12.0);
            theme::dismiss_hint(ui);
        });

    if !open {
        selected.0 = None;
    }
}

fn preview_placeholder(ui: &mut egui::Ui, phase: ViewportPhase, size: UVec2) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(size.x as f32, size.y as f32),
        egui::Sense::hover(),
    );
    if phase == ViewportPhase::TextureLoading {
        ui.put(rect, egui::Spinner::new());
    }
}

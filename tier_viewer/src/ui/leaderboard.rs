use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::assets::{AssetFetcher, Thumbnail, Thumbnails};
use crate::ranking::{top_n, RankedEntry};
use crate::scene::{PlayerRoster, SelectedPlayer};
use crate::ui::{theme, ViewSettings};

const ICON_SIDE: f32 = 32.0;

pub fn leaderboard_system(
    mut contexts: EguiContexts,
    roster: Res<PlayerRoster>,
    settings: Res<ViewSettings>,
    fetcher: Res<AssetFetcher>,
    mut thumbnails: ResMut<Thumbnails>,
    mut selected: ResMut<SelectedPlayer>,
) {
    let rows = top_n(&roster.records, settings.leaderboard_size);

    // Icons are registered with egui before the context is borrowed for drawing.
    let icons: Vec<Option<egui::TextureId>> = rows
        .iter()
        .map(|row| {
            let ign = &row.record.ign;
            if thumbnails.get(ign).is_none() {
                thumbnails.request(&fetcher, &settings.skin_base, ign);
            }
            match thumbnails.get(ign) {
                Some(Thumbnail::Ready(handle)) => Some(contexts.add_image(handle.clone_weak())),
                _ => None,
            }
        })
        .collect();

    let mut clicked = None;
    egui::CentralPanel::default()
        .frame(theme::page_frame())
        .show(contexts.ctx_mut(), |ui| {
            theme::apply_text_style(ui);
            if !roster.is_loaded() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading players...");
                });
                return;
            }
            if rows.is_empty() {
                ui.label(egui::RichText::new("No ranked players yet.").color(theme::MUTED));
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (row, icon) in rows.iter().zip(&icons) {
                    if leaderboard_row(ui, row, *icon).clicked() {
                        clicked = Some(row.record.clone());
                    }
                    ui.add_space(6.0);
                }
            });
        });

    if let Some(record) = clicked {
        selected.0 = Some(record);
    }
}

fn leaderboard_row(
    ui: &mut egui::Ui,
    row: &RankedEntry<'_>,
    icon: Option<egui::TextureId>,
) -> egui::Response {
    theme::row_frame()
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                theme::position_box(ui, row.position + 1, row.badge());
                theme::thumbnail(ui, icon, ICON_SIDE);
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&row.record.ign).size(16.0).strong());
                    ui.label(
                        egui::RichText::new(row.title().label())
                            .size(12.0)
                            .color(theme::MUTED),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    theme::chip(
                        ui,
                        row.tier.to_string(),
                        theme::band_color(row.tier.band),
                        egui::Color32::BLACK,
                    );
                    theme::region_chip(ui, &row.record.region, row.record.region());
                });
            });
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}

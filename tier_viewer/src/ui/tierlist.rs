use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::assets::{AssetFetcher, Thumbnail, Thumbnails};
use crate::data::PlayerRecord;
use crate::ranking::{group_by_tier, Band, Tier, TierGroup, TIER_COUNT};
use crate::scene::{PlayerRoster, SelectedPlayer};
use crate::ui::{theme, ViewSettings};

const ICON_SIDE: f32 = 24.0;

/// Queues head icons for every player shown in the tier columns.
pub fn request_tierlist_thumbnails(
    roster: Res<PlayerRoster>,
    settings: Res<ViewSettings>,
    fetcher: Res<AssetFetcher>,
    mut thumbnails: ResMut<Thumbnails>,
) {
    for group in group_by_tier(&roster.records) {
        for (_, record) in group.iter() {
            thumbnails.request(&fetcher, &settings.skin_base, &record.ign);
        }
    }
}

pub fn tierlist_system(
    mut contexts: EguiContexts,
    roster: Res<PlayerRoster>,
    thumbnails: Res<Thumbnails>,
    mut selected: ResMut<SelectedPlayer>,
) {
    let groups = group_by_tier(&roster.records);
    let icons: Vec<Vec<Option<egui::TextureId>>> = groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|(_, record)| match thumbnails.get(&record.ign) {
                    Some(Thumbnail::Ready(handle)) => Some(contexts.add_image(handle.clone_weak())),
                    _ => None,
                })
                .collect()
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

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(TIER_COUNT, |columns| {
                    for ((column, group), icons) in columns.iter_mut().zip(&groups).zip(&icons) {
                        tier_header(column, group);
                        column.add_space(6.0);
                        if group.is_empty() {
                            column.label(egui::RichText::new("No players").color(theme::MUTED));
                        }
                        for ((band, record), icon) in group.iter().zip(icons) {
                            let tier = Tier::new(band, group.rank);
                            if tier_entry(column, tier, record, *icon).clicked() {
                                clicked = Some(record.clone());
                            }
                        }
                    }
                });
            });
        });

    if let Some(record) = clicked {
        selected.0 = Some(record);
    }
}

fn tier_header(ui: &mut egui::Ui, group: &TierGroup<'_>) {
    let (fill, color) = theme::badge_colors(group.badge());
    egui::Frame::default()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(format!("Tier {}", group.rank))
                    .size(16.0)
                    .strong()
                    .color(color),
            );
        });
}

fn tier_entry(
    ui: &mut egui::Ui,
    tier: Tier,
    record: &PlayerRecord,
    icon: Option<egui::TextureId>,
) -> egui::Response {
    let text = match tier.band {
        Band::High => egui::Color32::BLACK,
        Band::Low => egui::Color32::WHITE,
    };
    theme::row_frame()
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                theme::thumbnail(ui, icon, ICON_SIDE);
                theme::chip(ui, tier.to_string(), theme::band_color(tier.band), text);
                ui.label(egui::RichText::new(&record.ign).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    theme::region_chip(ui, &record.region, record.region());
                });
            });
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetRequest, AssetResponse};

    fn app_with(
        records: Vec<PlayerRecord>,
    ) -> (App, tokio::sync::mpsc::UnboundedReceiver<AssetRequest>) {
        let (req_tx, requests) = tokio::sync::mpsc::unbounded_channel();
        let (_resp_tx, resp_rx) = crossbeam_channel::unbounded::<AssetResponse>();

        let mut roster = PlayerRoster::default();
        roster.replace(records);

        let mut app = App::new();
        app.insert_resource(roster)
            .insert_resource(ViewSettings {
                leaderboard_size: 10,
                skin_base: "https://minotar.net".parse().unwrap(),
            })
            .insert_resource(AssetFetcher::new(req_tx, resp_rx))
            .init_resource::<Thumbnails>()
            .add_systems(Update, request_tierlist_thumbnails);
        (app, requests)
    }

    fn drain(requests: &mut tokio::sync::mpsc::UnboundedReceiver<AssetRequest>) -> Vec<String> {
        let mut urls = Vec::new();
        while let Ok(request) = requests.try_recv() {
            let AssetRequest::Thumbnail { url, fallback, .. } = request else {
                panic!("expected a thumbnail request");
            };
            assert_eq!(fallback.as_str(), "https://minotar.net/helm/Steve/32.png");
            urls.push(url.to_string());
        }
        urls.sort();
        urls
    }

    #[test]
    fn tier_columns_queue_one_icon_per_player() {
        let (mut app, mut requests) = app_with(vec![
            PlayerRecord::new("Alice", "HT1", "eu"),
            PlayerRecord::new("Bob", "LT3", "as"),
            PlayerRecord::new("alice", "LT2", "na"),
            PlayerRecord::new("Carl", "R5", "eu"),
            PlayerRecord::new("Dan", "XT9", "eu"),
        ]);

        app.update();
        assert_eq!(
            drain(&mut requests),
            [
                "https://minotar.net/helm/Alice/32.png",
                "https://minotar.net/helm/Bob/32.png",
            ]
        );

        app.update();
        assert!(drain(&mut requests).is_empty(), "icons are fetched once");
        assert!(matches!(
            app.world().resource::<Thumbnails>().get("BOB"),
            Some(Thumbnail::Pending)
        ));
    }
}

//! Shared frames, colours and small badge widgets.

use bevy_egui::egui::{self, Color32, CornerRadius, Margin, RichText};

use crate::data::Region;
use crate::ranking::{Band, RankBadge};

pub const TEXT: Color32 = Color32::from_rgb(220, 224, 235);
pub const MUTED: Color32 = Color32::from_rgb(140, 146, 165);
pub const ACCENT: Color32 = Color32::from_rgb(250, 204, 21);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
const PLACEHOLDER: Color32 = Color32::from_rgb(75, 85, 99);

pub fn page_frame() -> egui::Frame {
    egui::Frame::default()
        .fill(Color32::from_rgb(17, 17, 27))
        .inner_margin(Margin::same(16))
}

pub fn bar_frame() -> egui::Frame {
    egui::Frame::default()
        .fill(Color32::from_rgba_premultiplied(15, 15, 25, 235))
        .inner_margin(Margin::symmetric(16, 10))
}

pub fn row_frame() -> egui::Frame {
    egui::Frame::default()
        .fill(Color32::from_rgb(31, 33, 46))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(8))
}

pub fn popup_frame() -> egui::Frame {
    egui::Frame::default()
        .fill(Color32::from_rgba_premultiplied(15, 15, 25, 240))
        .corner_radius(CornerRadius::same(10))
        .inner_margin(Margin::same(14))
}

pub fn apply_text_style(ui: &mut egui::Ui) {
    ui.visuals_mut().override_text_color = Some(TEXT);
}

/// Fill and text colour for a position box or tier header.
pub fn badge_colors(badge: RankBadge) -> (Color32, Color32) {
    match badge {
        RankBadge::Gold => (Color32::from_rgb(250, 204, 21), Color32::BLACK),
        RankBadge::Silver => (Color32::from_rgb(209, 213, 219), Color32::BLACK),
        RankBadge::Bronze => (Color32::from_rgb(205, 127, 50), Color32::BLACK),
        RankBadge::Plain => (Color32::from_rgb(55, 65, 81), TEXT),
    }
}

pub fn region_color(region: Region) -> Color32 {
    match region {
        Region::Asia => Color32::from_rgb(185, 52, 52),
        Region::Europe => Color32::from_rgb(30, 150, 72),
        Region::Other => Color32::from_rgb(107, 114, 128),
    }
}

pub fn band_color(band: Band) -> Color32 {
    match band {
        Band::High => Color32::from_rgb(202, 160, 20),
        Band::Low => Color32::from_rgb(120, 110, 70),
    }
}

pub fn chip(ui: &mut egui::Ui, text: impl Into<String>, fill: Color32, color: Color32) {
    egui::Frame::default()
        .fill(fill)
        .corner_radius(CornerRadius::same(4))
        .inner_margin(Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text.into()).size(12.0).strong().color(color));
        });
}

pub fn region_chip(ui: &mut egui::Ui, raw: &str, region: Region) {
    let label = raw.trim().to_uppercase();
    let label = if label.is_empty() { "?".to_string() } else { label };
    chip(ui, label, region_color(region), Color32::WHITE);
}

pub fn position_box(ui: &mut egui::Ui, number: usize, badge: RankBadge) {
    let (fill, color) = badge_colors(badge);
    egui::Frame::default()
        .fill(fill)
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.label(RichText::new(number.to_string()).size(18.0).strong().color(color));
        });
}

/// Head icon, or a grey square while it loads or when none exists.
pub fn thumbnail(ui: &mut egui::Ui, texture: Option<egui::TextureId>, side: f32) {
    match texture {
        Some(id) => {
            ui.add(egui::Image::new(egui::load::SizedTexture::new(id, [side, side])));
        }
        None => {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());
            ui.painter().rect_filled(rect, CornerRadius::same(3), PLACEHOLDER);
        }
    }
}

pub fn dismiss_hint(ui: &mut egui::Ui) {
    ui.label(RichText::new("Esc to dismiss").size(11.0).color(MUTED));
}

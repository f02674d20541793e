use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::ranking::{legend, RankBadge, RankTitle};
use crate::scene::{PlayerRoster, SelectedPlayer};
use crate::ui::theme;
use crate::ui::{Tab, UiPanels, ViewState};

const DISCORD_INVITE: &str = "https://discord.gg/XgKWMDzWbz";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CouncilRole {
    Owner,
    Executor,
}

impl CouncilRole {
    fn label(self) -> &'static str {
        match self {
            CouncilRole::Owner => "Network Owner",
            CouncilRole::Executor => "Network Executor",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            CouncilRole::Owner => theme::ERROR,
            CouncilRole::Executor => theme::ACCENT,
        }
    }
}

/// Network staff, owner first.
const HIGH_COUNCIL: [(CouncilRole, &str); 4] = [
    (CouncilRole::Owner, "D3adre4p"),
    (CouncilRole::Executor, "ahaz3m_"),
    (CouncilRole::Executor, "Pojavxpain"),
    (CouncilRole::Executor, "Pojavxcpvp"),
];

pub fn header_system(
    mut contexts: EguiContexts,
    mut view: ResMut<ViewState>,
    roster: Res<PlayerRoster>,
    panels: Res<UiPanels>,
    mut selected: ResMut<SelectedPlayer>,
) {
    let ctx = contexts.ctx_mut();
    let mut submitted = false;

    egui::TopBottomPanel::top("header")
        .frame(theme::bar_frame())
        .show(ctx, |ui| {
            theme::apply_text_style(ui);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Tierlist")
                        .size(20.0)
                        .strong()
                        .color(theme::ACCENT),
                );
                ui.add_space(12.0);

                for (tab, label) in [(Tab::Leaderboard, "Leaderboard"), (Tab::Tierlist, "Tierlist")] {
                    if panels.shows(tab) && ui.selectable_label(view.tab == tab, label).clicked() {
                        view.tab = tab;
                    }
                }
                ui.separator();

                ui.label("Ranking").on_hover_ui(ranking_legend);
                if ui.selectable_label(view.info_open, "Information").clicked() {
                    view.info_open = !view.info_open;
                }
                if ui.selectable_label(view.council_open, "High Council").clicked() {
                    view.council_open = !view.council_open;
                }
                ui.hyperlink_to("Discord", DISCORD_INVITE);

                if panels.search {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let clicked = ui.button("Search").clicked();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut view.search)
                                .hint_text("Search player...")
                                .desired_width(180.0),
                        );
                        if response.changed() {
                            view.search_error = None;
                        }
                        let entered =
                            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        submitted = clicked || entered;
                    });
                }
            });

            if let Some(message) = view.search_error {
                ui.label(egui::RichText::new(message).color(theme::ERROR));
            }
        });

    if view.info_open {
        let mut open = true;
        egui::Window::new("Information")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 64.0])
            .frame(theme::popup_frame())
            .show(ctx, information);
        view.info_open = open;
    }

    if view.council_open {
        let mut open = true;
        egui::Window::new("High Council")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 220.0])
            .frame(theme::popup_frame())
            .show(ctx, high_council);
        view.council_open = open;
    }

    if submitted {
        if let Some(record) = view.submit_search(&roster.records) {
            selected.0 = Some(record);
        }
    }
}

/// Tier strength order, strongest first.
fn ranking_legend(ui: &mut egui::Ui) {
    ui.label(egui::RichText::new("Tier order").strong());
    ui.horizontal_wrapped(|ui| {
        for (i, tier) in legend().enumerate() {
            if i > 0 {
                ui.label(egui::RichText::new(">").color(theme::MUTED));
            }
            theme::chip(ui, tier.to_string(), theme::band_color(tier.band), egui::Color32::BLACK);
        }
    });
}

fn information(ui: &mut egui::Ui) {
    theme::apply_text_style(ui);
    ui.label("Leaderboard titles");
    ui.add_space(6.0);
    egui::Grid::new("titles").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        let first_positions = [0, 1, 4, 7];
        for (title, position) in RankTitle::ALL.iter().zip(first_positions) {
            let (fill, color) = theme::badge_colors(RankBadge::for_position(position));
            theme::chip(ui, title.span(), fill, color);
            ui.label(title.label());
            ui.end_row();
        }
    });
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new("Click a player to open their profile.")
            .size(12.0)
            .color(theme::MUTED),
    );
}

fn high_council(ui: &mut egui::Ui) {
    theme::apply_text_style(ui);
    egui::Grid::new("council").num_columns(2).spacing([12.0, 4.0]).show(ui, |ui| {
        for (role, ign) in HIGH_COUNCIL {
            ui.label(egui::RichText::new(role.label()).strong().color(role.color()));
            ui.label(ign);
            ui.end_row();
        }
    });
}

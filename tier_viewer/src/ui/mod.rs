//! egui panels: header with search, leaderboard and tierlist tabs, profile popup.

mod header;
mod leaderboard;
mod profile;
mod theme;
mod tierlist;

use bevy::log::info;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use url::Url;

use crate::data::PlayerRecord;
use crate::ranking::find_by_ign;

pub const NOT_FOUND: &str = "Player not found";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Leaderboard,
    Tierlist,
}

/// Per-view toggles and the search box contents.
#[derive(Resource, Debug, Default)]
pub struct ViewState {
    pub tab: Tab,
    pub info_open: bool,
    pub council_open: bool,
    pub search: String,
    pub search_error: Option<&'static str>,
}

impl ViewState {
    /// Looks the search text up in `records`. A hit clears the error and
    /// returns the record to select; a miss sets the inline message.
    pub fn submit_search(&mut self, records: &[PlayerRecord]) -> Option<PlayerRecord> {
        if self.search.trim().is_empty() {
            self.search_error = None;
            return None;
        }
        match find_by_ign(records, &self.search) {
            Some(record) => {
                info!("tierlist: search hit {}", record.ign);
                self.search_error = None;
                Some(record.clone())
            }
            None => {
                self.search_error = Some(NOT_FOUND);
                None
            }
        }
    }
}

/// Settings the panels read every frame.
#[derive(Resource, Clone, Debug)]
pub struct ViewSettings {
    pub leaderboard_size: usize,
    pub skin_base: Url,
}

/// Which parts of the UI are enabled.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiPanels {
    pub leaderboard: bool,
    pub tierlist: bool,
    pub search: bool,
}

impl Default for UiPanels {
    fn default() -> Self {
        Self {
            leaderboard: true,
            tierlist: true,
            search: true,
        }
    }
}

impl UiPanels {
    pub fn first_tab(&self) -> Option<Tab> {
        if self.leaderboard {
            Some(Tab::Leaderboard)
        } else if self.tierlist {
            Some(Tab::Tierlist)
        } else {
            None
        }
    }

    pub fn shows(&self, tab: Tab) -> bool {
        match tab {
            Tab::Leaderboard => self.leaderboard,
            Tab::Tierlist => self.tierlist,
        }
    }
}

fn tab_is(tab: Tab) -> impl Fn(Res<ViewState>, Res<UiPanels>) -> bool + Clone {
    move |view: Res<ViewState>, panels: Res<UiPanels>| view.tab == tab && panels.shows(tab)
}

fn select_first_tab(mut view: ResMut<ViewState>, panels: Res<UiPanels>) {
    if let Some(tab) = panels.first_tab() {
        view.tab = tab;
    }
}

pub fn ui_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .init_resource::<ViewState>()
        .init_resource::<UiPanels>()
        .add_systems(Startup, select_first_tab)
        .add_systems(
            Update,
            (
                header::header_system,
                leaderboard::leaderboard_system.run_if(tab_is(Tab::Leaderboard)),
                (tierlist::request_tierlist_thumbnails, tierlist::tierlist_system)
                    .chain()
                    .run_if(tab_is(Tab::Tierlist)),
                profile::profile_popup_system,
            )
                .chain(),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new("Alice", "HT1", "eu"),
            PlayerRecord::new("Carl", "R5", "eu"),
        ]
    }

    #[test]
    fn search_hit_returns_record_and_clears_error() {
        let mut view = ViewState {
            search: "  ALICE ".into(),
            search_error: Some(NOT_FOUND),
            ..default()
        };
        let hit = view.submit_search(&roster());
        assert_eq!(hit.map(|r| r.ign), Some("Alice".to_string()));
        assert_eq!(view.search_error, None);
    }

    #[test]
    fn search_miss_shows_not_found() {
        let mut view = ViewState {
            search: "nobody".into(),
            ..default()
        };
        assert!(view.submit_search(&roster()).is_none());
        assert_eq!(view.search_error, Some("Player not found"));
    }

    #[test]
    fn retired_players_are_searchable() {
        let mut view = ViewState {
            search: "carl".into(),
            ..default()
        };
        assert!(view.submit_search(&roster()).is_some());
    }

    #[test]
    fn blank_search_does_nothing() {
        let mut view = ViewState {
            search: "   ".into(),
            search_error: Some(NOT_FOUND),
            ..default()
        };
        assert!(view.submit_search(&roster()).is_none());
        assert_eq!(view.search_error, None);
    }

    #[test]
    fn first_tab_skips_disabled_panels() {
        let panels = UiPanels {
            leaderboard: false,
            ..default()
        };
        assert_eq!(panels.first_tab(), Some(Tab::Tierlist));
        assert!(!panels.shows(Tab::Leaderboard));

        let none = UiPanels {
            leaderboard: false,
            tierlist: false,
            search: true,
        };
        assert_eq!(none.first_tab(), None);
    }

    #[test]
    fn startup_moves_to_first_enabled_tab() {
        let mut app = App::new();
        app.init_resource::<ViewState>()
            .insert_resource(UiPanels {
                leaderboard: false,
                ..default()
            })
            .add_systems(Startup, select_first_tab);
        app.update();
        assert_eq!(app.world().resource::<ViewState>().tab, Tab::Tierlist);
    }
}

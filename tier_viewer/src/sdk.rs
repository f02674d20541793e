//! SDK entry points and builder for composing the tierlist app.

use bevy::prelude::*;

use crate::assets::AssetFetcher;
use crate::config::{self, ConfigError, ViewerConfig};
use crate::data::init_record_channel;
use crate::scene::scene_plugin;
use crate::ui::{ui_plugin, UiPanels, ViewSettings};
use crate::viewport::{viewport_plugin, ModelViewport};

/// Builder for constructing the tierlist app with optional panels.
pub struct TierlistBuilder {
    config: Option<ViewerConfig>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    enable_leaderboard: bool,
    enable_tierlist: bool,
    enable_search: bool,
    enable_preview: bool,
}

impl Default for TierlistBuilder {
    fn default() -> Self {
        Self {
            config: None,
            window_title: "Tierlist".to_string(),
            window_resolution: (1100.0, 760.0),
            clear_color: Color::srgb(0.07, 0.07, 0.1),
            enable_leaderboard: true,
            enable_tierlist: true,
            enable_search: true,
            enable_preview: true,
        }
    }
}

impl TierlistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration instead of reading the environment.
    pub fn config(mut self, config: ViewerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn disable_leaderboard(mut self) -> Self {
        self.enable_leaderboard = false;
        self
    }

    pub fn disable_tierlist(mut self) -> Self {
        self.enable_tierlist = false;
        self
    }

    pub fn disable_search(mut self) -> Self {
        self.enable_search = false;
        self
    }

    /// Skip the 3D skin preview; the profile popup still opens.
    pub fn disable_preview(mut self) -> Self {
        self.enable_preview = false;
        self
    }

    /// Build the Bevy app. Fails only on configuration problems.
    pub fn build(self) -> Result<App, ConfigError> {
        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }));

        // Read after the log plugin is up so config warnings are visible.
        let config = match self.config {
            Some(config) => config,
            None => config::viewer_config()?,
        };
        let channel = init_record_channel(&config.source)?;

        app.insert_resource(ClearColor(self.clear_color))
            .insert_resource(channel)
            .insert_resource(AssetFetcher::spawn())
            .insert_resource(ViewSettings {
                leaderboard_size: config.leaderboard_size,
                skin_base: config.skin_base.clone(),
            })
            .insert_resource(UiPanels {
                leaderboard: self.enable_leaderboard,
                tierlist: self.enable_tierlist,
                search: self.enable_search,
            })
            .add_plugins((scene_plugin, viewport_plugin, ui_plugin));

        if self.enable_preview {
            app.insert_resource(ModelViewport::new(config.skin_base));
        }

        Ok(app)
    }
}

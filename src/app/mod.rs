//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
pub mod model;
mod update;

pub use model::{Focus, Model, ToastLevel, View};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::story::Story;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    title: Option<String>,
    export_dir: PathBuf,
    story: Option<Story>,
    play_only: bool,
    start_in_json: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application with an empty story.
    pub fn new() -> Self {
        Self {
            title: None,
            export_dir: PathBuf::from("."),
            story: None,
            play_only: false,
            start_in_json: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Start with a story title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Set the directory exports are written into.
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// Start with a loaded story instead of an empty one.
    pub fn with_story(mut self, story: Story) -> Self {
        self.story = Some(story);
        self
    }

    /// Run as a player only: start in the playthrough and quit on exit.
    pub const fn with_play_only(mut self, enabled: bool) -> Self {
        self.play_only = enabled;
        self
    }

    /// Open on the raw JSON view instead of the cards view.
    pub const fn with_json_view(mut self, enabled: bool) -> Self {
        self.start_in_json = enabled;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. story::Story)
    clippy::module_name_repetitions
)]

//! # Storyloom
//!
//! A terminal editor for branching choose-your-path stories.
//!
//! Storyloom edits a story as a deck of numbered cards:
//! - A draft form appends new cards with auto-assigned ids
//! - Committed cards are edited in place, field by field
//! - Any card can be toggled into an ending and back
//! - The whole story exports as pretty-printed JSON
//! - Exported stories play back in the terminal
//!
//! ## Architecture
//!
//! Storyloom uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`story`]: Story types and JSON export
//! - [`ui`]: Terminal UI components
//! - [`scratch`]: Freeform buffer behind the raw JSON view
//! - [`config`]: Flag-file configuration
//! - [`trace`]: Optional action log

pub mod app;
pub mod config;
pub mod scratch;
pub mod story;
pub mod trace;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::story::{Card, Choice, Draft, Story};
    pub use crate::ui::viewport::Viewport;
}

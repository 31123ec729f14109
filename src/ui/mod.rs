//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`render`]: Frame composition for the cards, JSON and preview views
//! - [`overlays`]: Help popup

pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::help_line_count;
pub use render::{render, split_panes};

pub const DRAFT_PANE_PERCENT: u16 = 40;
pub const CARDS_PANE_PERCENT: u16 = 60;

use ratatui::layout::Rect;

/// Rows available to the main content area; the bottom row belongs to the
/// status bar.
pub const fn content_height(height: u16) -> u16 {
    height.saturating_sub(1)
}

/// Rows inside a bordered pane within the content area.
pub const fn content_inner_height(height: u16) -> u16 {
    content_height(height).saturating_sub(2)
}

/// Width and height of the cards-pane viewport for a given terminal size.
pub fn cards_viewport_size(width: u16, height: u16) -> (u16, u16) {
    let area = Rect::new(0, 0, width, content_height(height));
    let cards = split_panes(area)[1];
    (cards.width.saturating_sub(2), cards.height.saturating_sub(2))
}

#[cfg(test)]
mod tests;

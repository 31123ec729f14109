//! Viewport management for scrolling the card list.
//!
//! The [`Viewport`] struct tracks the visible slice of the flattened
//! card rows and handles all scroll operations, including keeping the
//! selected row on screen as the selection moves.

use std::ops::Range;

/// Manages the visible portion of the card list.
///
/// The viewport tracks:
/// - Pane dimensions (width, height)
/// - Current scroll offset (in rows)
/// - Total number of rows
///
/// # Example
///
/// ```
/// use storyloom::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(60, 20, 100);
/// assert_eq!(vp.visible_range(), 0..20);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_rows: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Pane width in columns
    /// * `height` - Pane height in rows
    /// * `total_rows` - Total rows in the card list
    pub const fn new(width: u16, height: u16, total_rows: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_rows,
        }
    }

    /// Get the current scroll offset.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Get the viewport width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the viewport height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of rows in the card list.
    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Get the range of visible rows.
    ///
    /// Returns a range from the current offset to offset + height,
    /// clamped to the list bounds.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.height as usize).min(self.total_rows);
        start..end
    }

    /// Get the scroll percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        if self.total_rows == 0 {
            return 100;
        }

        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }

        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    /// Check if we can scroll up.
    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    /// Check if we can scroll down.
    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    /// Scroll up by n rows.
    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Scroll down by n rows.
    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    /// Scroll up one page.
    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Go to the beginning of the list.
    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Go to the end of the list.
    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll the minimum amount needed to bring `row` on screen.
    ///
    /// Rows above the window pull the offset up to the row; rows below
    /// push the offset down so the row becomes the last visible one.
    pub fn ensure_visible(&mut self, row: usize) {
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.height as usize {
            self.offset = (row + 1).saturating_sub(self.height as usize);
        }
        self.offset = self.offset.min(self.max_offset());
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        // Clamp offset if the list is now shorter than the viewport
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total number of rows (e.g., after add/delete/toggle).
    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Calculate the maximum valid offset.
    const fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.height as usize)
    }
}

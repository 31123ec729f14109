use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::scratch::ScratchBuffer;
use crate::story::{Card, Draft, Story};
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which screen fills the main area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Draft form on the left, card list on the right
    Cards,
    /// Full-frame raw JSON scratch view
    Json,
}

/// Which pane receives navigation keys in the cards view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Draft,
    Cards,
}

/// A selectable row in the draft (form) pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRow {
    /// Story title field
    Title,
    /// Draft card text field
    Text,
    /// Option label field for the given key
    OptionText(String),
    /// Option destination field for the given key
    OptionNext(String),
    /// The add-card action row
    Submit,
}

/// A selectable row inside one committed card block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRow {
    /// Card text field
    Text,
    /// Option label field for the given key
    OptionText(String),
    /// Option destination field for the given key
    OptionNext(String),
    /// The ending checkbox row
    Ending,
}

/// One display row in the flattened cards pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardsSlot {
    /// `Card <id>` header line for the card at this index (not selectable)
    Header(usize),
    /// Selectable field row: (card index, row index within the card)
    Field(usize, usize),
    /// Separator between cards (not selectable)
    Blank,
}

/// Which field an in-flight edit writes back to on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    StoryTitle,
    DraftText,
    DraftOptionText(String),
    DraftOptionNext(String),
    CardText(u32),
    CardOptionText(u32, String),
    CardOptionNext(u32, String),
}

/// A single-line field edit in progress.
///
/// The buffer is committed back into the story or draft on Enter and
/// thrown away on Esc. Numeric fields parse on commit; an unparseable
/// value keeps the field's previous contents without comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    /// Field the buffer writes back to
    pub target: EditTarget,
    /// Current edit contents
    pub buffer: String,
    /// Byte offset of the cursor within `buffer`
    pub cursor: usize,
}

impl FieldEdit {
    /// Start editing `value` with the cursor at the end.
    pub fn new(target: EditTarget, value: &str) -> Self {
        Self {
            target,
            buffer: value.to_string(),
            cursor: value.len(),
        }
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Delete the character before the cursor (Backspace).
    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_char_len = self.buffer[..self.cursor]
            .chars()
            .next_back()
            .map_or(1, char::len_utf8);
        let start = self.cursor - prev_char_len;
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Delete the character at the cursor (Delete key).
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        let char_len = self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.buffer.replace_range(self.cursor..self.cursor + char_len, "");
    }

    /// Move the cursor one character left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_char_len = self.buffer[..self.cursor]
            .chars()
            .next_back()
            .map_or(1, char::len_utf8);
        self.cursor -= prev_char_len;
    }

    /// Move the cursor one character right.
    pub fn move_right(&mut self) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        let char_len = self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.cursor += char_len;
    }

    /// Move the cursor to the start of the buffer.
    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end of the buffer.
    pub const fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }
}

/// A running playthrough of the story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Id of the card currently shown
    pub current: u32,
    /// Ids of previously visited cards, oldest first
    pub trail: Vec<u32>,
    /// Index of the highlighted option within the card's sorted keys
    pub selected: usize,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. `update`
/// consumes and returns the model; side effects read it afterwards.
pub struct Model {
    /// The story being edited
    pub story: Story,
    /// In-progress form data for the next card
    pub draft: Draft,
    /// Which screen fills the main area
    pub view: View,
    /// Which pane receives navigation keys
    pub focus: Focus,
    /// Selected row index in the draft pane
    pub draft_selected: usize,
    /// Selected card index in the cards pane
    pub selected_card: usize,
    /// Selected row index within the selected card
    pub selected_row: usize,
    /// Viewport managing cards-pane scroll
    pub viewport: Viewport,
    /// Last known terminal size (columns, rows)
    pub terminal: (u16, u16),
    /// In-flight single-line field edit
    pub edit: Option<FieldEdit>,
    /// Scratch buffer for the raw JSON view (dropped on view exit)
    pub json_buffer: Option<ScratchBuffer>,
    /// Scroll offset for the JSON view (first visible line index)
    pub json_scroll_offset: usize,
    /// Running playthrough, when preview is active
    pub preview: Option<Preview>,
    /// True when started via `play` - leaving preview quits the app
    pub play_only: bool,
    /// Directory exports are written into
    pub export_dir: PathBuf,
    /// Most recent export path, shown in the status bar
    pub last_export: Option<PathBuf>,
    /// Whether the help overlay is visible
    pub help_visible: bool,
    /// Scroll offset within the help overlay
    pub help_scroll_offset: usize,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("view", &self.view)
            .field("focus", &self.focus)
            .field("cards", &self.story.entries.len())
            .field("play_only", &self.play_only)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model with default settings.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        let (pane_width, pane_height) =
            crate::ui::cards_viewport_size(terminal_size.0, terminal_size.1);
        Self {
            story: Story::default(),
            draft: Draft::template(),
            view: View::Cards,
            focus: Focus::Draft,
            draft_selected: 0,
            selected_card: 0,
            selected_row: 0,
            viewport: Viewport::new(pane_width, pane_height, 0),
            terminal: terminal_size,
            edit: None,
            json_buffer: None,
            json_scroll_offset: 0,
            preview: None,
            play_only: false,
            export_dir: PathBuf::from("."),
            last_export: None,
            help_visible: false,
            help_scroll_offset: 0,
            config_global_path: None,
            config_local_path: None,
            toast: None,
            should_quit: false,
        }
    }

    /// Set the story title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        if let Some(title) = title {
            self.story.title = title;
        }
        self
    }

    /// Set the export directory.
    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// Replace the story wholesale (play mode).
    #[must_use]
    pub fn with_story(mut self, story: Story) -> Self {
        self.story = story;
        self.sync_cards_viewport();
        self
    }

    /// Mark this session as play-only: leaving preview quits.
    #[must_use]
    pub const fn with_play_only(mut self) -> Self {
        self.play_only = true;
        self
    }

    /// Record the config paths for display in the help overlay.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global: Option<PathBuf>,
        local: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global;
        self.config_local_path = local;
        self
    }

    /// The draft row currently selected, if any.
    pub fn current_draft_row(&self) -> Option<DraftRow> {
        draft_rows(&self.draft).get(self.draft_selected).cloned()
    }

    /// The card id and row currently selected in the cards pane, if any.
    pub fn current_card_row(&self) -> Option<(u32, CardRow)> {
        let card = self.story.entries.get(self.selected_card)?;
        card_rows(card)
            .get(self.selected_row)
            .map(|row| (card.id, row.clone()))
    }

    /// Position of the current selection within the flattened slots.
    pub fn selected_slot_index(&self) -> Option<usize> {
        cards_slots(&self.story).iter().position(|slot| {
            matches!(slot, CardsSlot::Field(card, row)
                if *card == self.selected_card && *row == self.selected_row)
        })
    }

    pub(super) fn selection_next(&mut self) {
        let Some(card) = self.story.entries.get(self.selected_card) else {
            return;
        };
        if self.selected_row + 1 < card_rows(card).len() {
            self.selected_row += 1;
        } else if self.selected_card + 1 < self.story.entries.len() {
            self.selected_card += 1;
            self.selected_row = 0;
        }
        self.scroll_selection_into_view();
    }

    pub(super) fn selection_prev(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        } else if self.selected_card > 0 {
            self.selected_card -= 1;
            let rows = card_rows(&self.story.entries[self.selected_card]).len();
            self.selected_row = rows.saturating_sub(1);
        }
        self.scroll_selection_into_view();
    }

    pub(super) fn selection_first(&mut self) {
        self.selected_card = 0;
        self.selected_row = 0;
        self.scroll_selection_into_view();
    }

    pub(super) fn selection_last(&mut self) {
        if self.story.entries.is_empty() {
            return;
        }
        self.selected_card = self.story.entries.len() - 1;
        let rows = card_rows(&self.story.entries[self.selected_card]).len();
        self.selected_row = rows.saturating_sub(1);
        self.scroll_selection_into_view();
    }

    /// Clamp the cards-pane selection after structural changes.
    pub(super) fn clamp_cards_selection(&mut self) {
        if self.story.entries.is_empty() {
            self.selected_card = 0;
            self.selected_row = 0;
            return;
        }
        self.selected_card = self.selected_card.min(self.story.entries.len() - 1);
        let rows = card_rows(&self.story.entries[self.selected_card]).len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    /// Refresh the viewport's row count after the story changed shape.
    pub(super) fn sync_cards_viewport(&mut self) {
        self.viewport.set_total_rows(cards_slots(&self.story).len());
    }

    pub(super) fn scroll_selection_into_view(&mut self) {
        if let Some(idx) = self.selected_slot_index() {
            self.viewport.ensure_visible(idx);
        }
    }

    /// Rows available to the JSON view.
    pub(super) fn json_view_rows(&self) -> usize {
        crate::ui::content_inner_height(self.terminal.1) as usize
    }

    /// Keep the JSON cursor on screen after edits or cursor motion.
    pub(super) fn follow_json_cursor(&mut self) {
        let Some(buffer) = &self.json_buffer else {
            return;
        };
        let rows = self.json_view_rows().max(1);
        let line = buffer.cursor().line;
        if line < self.json_scroll_offset {
            self.json_scroll_offset = line;
        } else if line >= self.json_scroll_offset + rows {
            self.json_scroll_offset = line + 1 - rows;
        }
    }

    /// Clamp the JSON scroll offset to the buffer length.
    pub(super) fn clamp_json_scroll(&mut self) {
        let Some(buffer) = &self.json_buffer else {
            return;
        };
        let rows = self.json_view_rows().max(1);
        let max = buffer.line_count().saturating_sub(rows);
        self.json_scroll_offset = self.json_scroll_offset.min(max);
    }

    /// Start a playthrough at the entry card.
    ///
    /// Starts at the card with id 1 when present, otherwise at the
    /// first entry. An empty story shows a warning instead.
    pub(super) fn start_preview(&mut self) {
        let Some(start) = preview_start_id(&self.story) else {
            self.show_toast(ToastLevel::Warning, "Nothing to preview yet");
            return;
        };
        self.preview = Some(Preview {
            current: start,
            trail: Vec::new(),
            selected: 0,
        });
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

/// The selectable rows of the draft pane, in display order.
pub fn draft_rows(draft: &Draft) -> Vec<DraftRow> {
    let mut rows = vec![DraftRow::Title, DraftRow::Text];
    for key in draft.options.keys() {
        rows.push(DraftRow::OptionText(key.clone()));
        rows.push(DraftRow::OptionNext(key.clone()));
    }
    rows.push(DraftRow::Submit);
    rows
}

/// The selectable rows of one card block, in display order.
pub fn card_rows(card: &Card) -> Vec<CardRow> {
    let mut rows = vec![CardRow::Text];
    for key in card.options.keys() {
        rows.push(CardRow::OptionText(key.clone()));
        rows.push(CardRow::OptionNext(key.clone()));
    }
    rows.push(CardRow::Ending);
    rows
}

/// Flatten the card list into display rows for rendering and hit-testing.
pub fn cards_slots(story: &Story) -> Vec<CardsSlot> {
    let mut slots = Vec::new();
    for (card_idx, card) in story.entries.iter().enumerate() {
        if card_idx > 0 {
            slots.push(CardsSlot::Blank);
        }
        slots.push(CardsSlot::Header(card_idx));
        for row_idx in 0..card_rows(card).len() {
            slots.push(CardsSlot::Field(card_idx, row_idx));
        }
    }
    slots
}

/// The card a playthrough starts on: id 1 when present, else the first
/// entry. `None` for an empty story.
pub fn preview_start_id(story: &Story) -> Option<u32> {
    story
        .card(1)
        .map(|card| card.id)
        .or_else(|| story.entries.first().map(|card| card.id))
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}

use crate::app::Model;
use crate::app::model::{
    CardRow, CardsSlot, DraftRow, EditTarget, FieldEdit, Focus, Preview, ToastLevel, View,
    cards_slots, draft_rows, preview_start_id,
};
use crate::scratch::{Direction, ScratchBuffer, display_col_to_byte};
use crate::story::export::story_json;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Selection
    /// Move the selection down one row in the focused pane
    SelectNext,
    /// Move the selection up one row in the focused pane
    SelectPrev,
    /// Jump to the first row of the focused pane
    SelectFirst,
    /// Jump to the last row of the focused pane
    SelectLast,
    /// Select a cards-pane display row directly (mouse click)
    SelectSlot(usize),
    /// Select a draft-pane row directly (mouse click)
    SelectDraftRow(usize),
    /// Scroll the cards pane up by n rows
    ScrollUp(usize),
    /// Scroll the cards pane down by n rows
    ScrollDown(usize),
    /// Scroll the cards pane up one page
    PageUp,
    /// Scroll the cards pane down one page
    PageDown,
    /// Switch focus between the draft and cards panes
    SwitchFocus,

    // Views
    /// Switch between the cards view and the raw JSON view
    ToggleView,
    /// Toggle the help overlay
    ToggleHelp,
    /// Hide the help overlay
    HideHelp,
    /// Scroll the help overlay up by n rows
    HelpScrollUp(usize),
    /// Scroll the help overlay down by n rows
    HelpScrollDown(usize),

    // Field editing
    /// Activate the selected row (edit a field, submit, or toggle)
    BeginEdit,
    /// Jump straight into editing the story title
    BeginTitleEdit,
    /// Insert a character at the edit cursor
    EditInsertChar(char),
    /// Delete the character before the edit cursor (Backspace)
    EditDeleteBack,
    /// Delete the character at the edit cursor (Delete)
    EditDeleteForward,
    /// Move the edit cursor one character left
    EditMoveLeft,
    /// Move the edit cursor one character right
    EditMoveRight,
    /// Move the edit cursor to the start of the field (Home)
    EditMoveHome,
    /// Move the edit cursor to the end of the field (End)
    EditMoveEnd,
    /// Write the edit buffer back into the story or draft
    CommitEdit,
    /// Throw the edit buffer away
    CancelEdit,

    // Story operations
    /// Append the draft as a new card
    SubmitDraft,
    /// Toggle the selected card between ending and branching
    ToggleEnding,
    /// Delete the selected card
    DeleteCard,
    /// Write the story to disk
    Export,

    // JSON scratch view
    /// Insert a character at the scratch cursor
    JsonInsertChar(char),
    /// Split the scratch line at the cursor (Enter)
    JsonSplitLine,
    /// Delete the character before the scratch cursor (Backspace)
    JsonDeleteBack,
    /// Delete the character at the scratch cursor (Delete)
    JsonDeleteForward,
    /// Move the scratch cursor in a direction
    JsonMoveCursor(Direction),
    /// Move the scratch cursor to the beginning of the line (Home)
    JsonMoveHome,
    /// Move the scratch cursor to the end of the line (End)
    JsonMoveEnd,
    /// Move the scratch cursor to the start of the buffer (Ctrl+Home)
    JsonMoveToStart,
    /// Move the scratch cursor to the end of the buffer (Ctrl+End)
    JsonMoveToEnd,
    /// Scroll the JSON view up by n lines
    JsonScrollUp(usize),
    /// Scroll the JSON view down by n lines
    JsonScrollDown(usize),
    /// Move the scratch cursor to a clicked (view row, display col)
    JsonClickAt(usize, usize),
    /// Copy the scratch buffer to the system clipboard
    CopyJson,

    // Preview
    /// Start a playthrough of the story
    EnterPreview,
    /// Leave the playthrough and return to the editor
    ExitPreview,
    /// Follow the option with this key
    PreviewChoose(char),
    /// Highlight the next option
    PreviewSelectNext,
    /// Highlight the previous option
    PreviewSelectPrev,
    /// Follow the highlighted option
    PreviewFollow,
    /// Step back to the previously visited card
    PreviewBack,
    /// Restart the playthrough from the entry card
    PreviewRestart,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Selection
        Message::SelectNext => match model.focus {
            Focus::Draft => {
                let max = draft_rows(&model.draft).len().saturating_sub(1);
                model.draft_selected = (model.draft_selected + 1).min(max);
            }
            Focus::Cards => model.selection_next(),
        },
        Message::SelectPrev => match model.focus {
            Focus::Draft => {
                model.draft_selected = model.draft_selected.saturating_sub(1);
            }
            Focus::Cards => model.selection_prev(),
        },
        Message::SelectFirst => match model.focus {
            Focus::Draft => model.draft_selected = 0,
            Focus::Cards => model.selection_first(),
        },
        Message::SelectLast => match model.focus {
            Focus::Draft => {
                model.draft_selected = draft_rows(&model.draft).len().saturating_sub(1);
            }
            Focus::Cards => model.selection_last(),
        },
        Message::SelectSlot(idx) => {
            model.edit = None;
            match cards_slots(&model.story).get(idx) {
                Some(CardsSlot::Field(card, row)) => {
                    model.focus = Focus::Cards;
                    model.selected_card = *card;
                    model.selected_row = *row;
                }
                Some(CardsSlot::Header(card)) => {
                    model.focus = Focus::Cards;
                    model.selected_card = *card;
                    model.selected_row = 0;
                }
                Some(CardsSlot::Blank) | None => {}
            }
        }
        Message::SelectDraftRow(idx) => {
            model.edit = None;
            if idx < draft_rows(&model.draft).len() {
                model.focus = Focus::Draft;
                model.draft_selected = idx;
            }
        }
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::SwitchFocus => {
            if model.view == View::Cards {
                model.focus = match model.focus {
                    Focus::Draft => Focus::Cards,
                    Focus::Cards => Focus::Draft,
                };
            }
        }

        // Views
        Message::ToggleView => match model.view {
            View::Cards => match story_json(&model.story) {
                Ok(text) => {
                    model.json_buffer = Some(ScratchBuffer::from_text(&text));
                    model.json_scroll_offset = 0;
                    model.view = View::Json;
                }
                Err(err) => {
                    model.show_toast(ToastLevel::Error, format!("Could not serialize: {err}"));
                }
            },
            View::Json => {
                // Scratch edits are never parsed back; the buffer is
                // dropped and the next visit reserializes from state.
                model.json_buffer = None;
                model.view = View::Cards;
            }
        },
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::HelpScrollUp(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(n);
        }
        Message::HelpScrollDown(n) => {
            let max = crate::ui::help_line_count().saturating_sub(1);
            model.help_scroll_offset = (model.help_scroll_offset + n).min(max);
        }

        // Field editing
        Message::BeginEdit => activate_selection(&mut model),
        Message::BeginTitleEdit => {
            model.edit = Some(FieldEdit::new(EditTarget::StoryTitle, &model.story.title));
        }
        Message::EditInsertChar(ch) => {
            if let Some(edit) = &mut model.edit {
                edit.insert_char(ch);
            }
        }
        Message::EditDeleteBack => {
            if let Some(edit) = &mut model.edit {
                edit.delete_back();
            }
        }
        Message::EditDeleteForward => {
            if let Some(edit) = &mut model.edit {
                edit.delete_forward();
            }
        }
        Message::EditMoveLeft => {
            if let Some(edit) = &mut model.edit {
                edit.move_left();
            }
        }
        Message::EditMoveRight => {
            if let Some(edit) = &mut model.edit {
                edit.move_right();
            }
        }
        Message::EditMoveHome => {
            if let Some(edit) = &mut model.edit {
                edit.move_home();
            }
        }
        Message::EditMoveEnd => {
            if let Some(edit) = &mut model.edit {
                edit.move_end();
            }
        }
        Message::CommitEdit => commit_edit(&mut model),
        Message::CancelEdit => {
            model.edit = None;
        }

        // Story operations
        Message::SubmitDraft => submit_draft(&mut model),
        Message::ToggleEnding => toggle_ending(&mut model),
        Message::DeleteCard => delete_selected_card(&mut model),
        // Export/CopyJson: handled in effects (side effects)
        Message::Export | Message::CopyJson | Message::Redraw => {}

        // JSON scratch view
        Message::JsonInsertChar(ch) => {
            if let Some(buf) = &mut model.json_buffer {
                buf.insert_char(ch);
            }
            model.follow_json_cursor();
        }
        Message::JsonSplitLine => {
            if let Some(buf) = &mut model.json_buffer {
                buf.split_line();
            }
            model.follow_json_cursor();
        }
        Message::JsonDeleteBack => {
            if let Some(buf) = &mut model.json_buffer {
                buf.delete_back();
            }
            model.follow_json_cursor();
            model.clamp_json_scroll();
        }
        Message::JsonDeleteForward => {
            if let Some(buf) = &mut model.json_buffer {
                buf.delete_forward();
            }
            model.clamp_json_scroll();
        }
        Message::JsonMoveCursor(dir) => {
            if let Some(buf) = &mut model.json_buffer {
                buf.move_cursor(dir);
            }
            model.follow_json_cursor();
        }
        Message::JsonMoveHome => {
            if let Some(buf) = &mut model.json_buffer {
                buf.move_home();
            }
        }
        Message::JsonMoveEnd => {
            if let Some(buf) = &mut model.json_buffer {
                buf.move_end();
            }
        }
        Message::JsonMoveToStart => {
            if let Some(buf) = &mut model.json_buffer {
                buf.move_to_start();
            }
            model.follow_json_cursor();
        }
        Message::JsonMoveToEnd => {
            if let Some(buf) = &mut model.json_buffer {
                buf.move_to_end();
            }
            model.follow_json_cursor();
        }
        Message::JsonScrollUp(n) => {
            model.json_scroll_offset = model.json_scroll_offset.saturating_sub(n);
        }
        Message::JsonScrollDown(n) => {
            model.json_scroll_offset += n;
            model.clamp_json_scroll();
        }
        Message::JsonClickAt(row, display_col) => {
            let offset = model.json_scroll_offset;
            if let Some(buf) = &mut model.json_buffer {
                let line = (offset + row).min(buf.line_count().saturating_sub(1));
                let col = buf
                    .line_at(line)
                    .map_or(0, |text| display_col_to_byte(&text, display_col));
                buf.move_to(line, col);
            }
        }

        // Preview
        Message::EnterPreview => model.start_preview(),
        Message::ExitPreview => {
            if model.play_only {
                model.should_quit = true;
            } else {
                model.preview = None;
            }
        }
        Message::PreviewChoose(ch) => {
            let target = model.preview.as_ref().and_then(|preview| {
                model
                    .story
                    .card(preview.current)
                    .and_then(|card| card.options.get(&ch.to_string()))
                    .map(|choice| choice.next_id)
            });
            match target {
                Some(next) => preview_follow(&mut model, next),
                None if model.preview.is_some() => {
                    model.show_toast(ToastLevel::Warning, format!("No option {ch}"));
                }
                None => {}
            }
        }
        Message::PreviewSelectNext => {
            let count = preview_option_count(&model);
            if let Some(preview) = &mut model.preview
                && count > 0
            {
                preview.selected = (preview.selected + 1).min(count - 1);
            }
        }
        Message::PreviewSelectPrev => {
            if let Some(preview) = &mut model.preview {
                preview.selected = preview.selected.saturating_sub(1);
            }
        }
        Message::PreviewFollow => {
            let target = model.preview.as_ref().and_then(|preview| {
                model
                    .story
                    .card(preview.current)
                    .and_then(|card| card.options.values().nth(preview.selected))
                    .map(|choice| choice.next_id)
            });
            if let Some(next) = target {
                preview_follow(&mut model, next);
            }
        }
        Message::PreviewBack => {
            if let Some(preview) = &mut model.preview
                && let Some(prev) = preview.trail.pop()
            {
                preview.current = prev;
                preview.selected = 0;
            }
        }
        Message::PreviewRestart => {
            if model.preview.is_some()
                && let Some(start) = preview_start_id(&model.story)
            {
                model.preview = Some(Preview {
                    current: start,
                    trail: Vec::new(),
                    selected: 0,
                });
            }
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal = (width, height);
            let (pane_width, pane_height) = crate::ui::cards_viewport_size(width, height);
            model.viewport.resize(pane_width, pane_height);
            model.scroll_selection_into_view();
            model.clamp_json_scroll();
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

/// Activate the selected row: open a field edit, or run the row's
/// action for the submit and ending rows.
fn activate_selection(model: &mut Model) {
    match model.focus {
        Focus::Draft => match model.current_draft_row() {
            Some(DraftRow::Title) => {
                model.edit = Some(FieldEdit::new(EditTarget::StoryTitle, &model.story.title));
            }
            Some(DraftRow::Text) => {
                model.edit = Some(FieldEdit::new(EditTarget::DraftText, &model.draft.text));
            }
            Some(DraftRow::OptionText(key)) => {
                if let Some(choice) = model.draft.options.get(&key) {
                    let value = choice.text.clone();
                    model.edit = Some(FieldEdit::new(EditTarget::DraftOptionText(key), &value));
                }
            }
            Some(DraftRow::OptionNext(key)) => {
                if let Some(choice) = model.draft.options.get(&key) {
                    let value = choice.next_id.to_string();
                    model.edit = Some(FieldEdit::new(EditTarget::DraftOptionNext(key), &value));
                }
            }
            Some(DraftRow::Submit) => submit_draft(model),
            None => {}
        },
        Focus::Cards => match model.current_card_row() {
            Some((id, CardRow::Text)) => {
                if let Some(card) = model.story.card(id) {
                    let value = card.text.clone();
                    model.edit = Some(FieldEdit::new(EditTarget::CardText(id), &value));
                }
            }
            Some((id, CardRow::OptionText(key))) => {
                if let Some(choice) = model.story.card(id).and_then(|card| card.options.get(&key)) {
                    let value = choice.text.clone();
                    model.edit = Some(FieldEdit::new(EditTarget::CardOptionText(id, key), &value));
                }
            }
            Some((id, CardRow::OptionNext(key))) => {
                if let Some(choice) = model.story.card(id).and_then(|card| card.options.get(&key)) {
                    let value = choice.next_id.to_string();
                    model.edit = Some(FieldEdit::new(EditTarget::CardOptionNext(id, key), &value));
                }
            }
            Some((_, CardRow::Ending)) => toggle_ending(model),
            None => {}
        },
    }
}

/// Write the finished edit buffer back to its target field.
///
/// Numeric destination fields parse on commit; an unparseable value
/// keeps the previous contents without comment.
fn commit_edit(model: &mut Model) {
    let Some(edit) = model.edit.take() else {
        return;
    };
    match edit.target {
        EditTarget::StoryTitle => model.story.title = edit.buffer,
        EditTarget::DraftText => model.draft.text = edit.buffer,
        EditTarget::DraftOptionText(key) => {
            if let Some(choice) = model.draft.options.get_mut(&key) {
                choice.text = edit.buffer;
            }
        }
        EditTarget::DraftOptionNext(key) => {
            if let (Some(choice), Ok(next)) =
                (model.draft.options.get_mut(&key), edit.buffer.parse())
            {
                choice.next_id = next;
            }
        }
        EditTarget::CardText(id) => {
            if let Some(card) = model.story.card_mut(id) {
                card.text = edit.buffer;
            }
        }
        EditTarget::CardOptionText(id, key) => {
            if let Some(choice) = model
                .story
                .card_mut(id)
                .and_then(|card| card.options.get_mut(&key))
            {
                choice.text = edit.buffer;
            }
        }
        EditTarget::CardOptionNext(id, key) => {
            let parsed = edit.buffer.parse();
            if let (Some(choice), Ok(next)) = (
                model
                    .story
                    .card_mut(id)
                    .and_then(|card| card.options.get_mut(&key)),
                parsed,
            ) {
                choice.next_id = next;
            }
        }
    }
}

/// Append the draft as a new card. The draft keeps its contents, so a
/// repeat submit adds another card with the same text.
fn submit_draft(model: &mut Model) {
    let id = model.story.push_draft(&model.draft);
    model.sync_cards_viewport();
    model.show_toast(ToastLevel::Info, format!("Added card {id}"));
}

/// Toggle the selected card between ending and branching.
///
/// Turning a card into an ending clears its options. Turning it back
/// installs the stock two-option template, not whatever the card had
/// before.
fn toggle_ending(model: &mut Model) {
    let Some(card) = model.story.entries.get_mut(model.selected_card) else {
        return;
    };
    if card.is_ending() {
        card.restore_default_options();
    } else {
        card.clear_options();
    }
    model.clamp_cards_selection();
    model.sync_cards_viewport();
    model.scroll_selection_into_view();
}

fn delete_selected_card(model: &mut Model) {
    let Some(id) = model
        .story
        .entries
        .get(model.selected_card)
        .map(|card| card.id)
    else {
        return;
    };
    model.story.remove_card(id);
    model.clamp_cards_selection();
    model.sync_cards_viewport();
    model.scroll_selection_into_view();
    model.show_toast(ToastLevel::Info, format!("Deleted card {id}"));
}

/// Advance the playthrough to `next`, recording the current card in
/// the trail. A missing destination reports the dangling id instead.
fn preview_follow(model: &mut Model, next: u32) {
    if model.story.card(next).is_none() {
        model.show_toast(ToastLevel::Error, format!("No card with id {next}"));
        return;
    }
    if let Some(preview) = &mut model.preview {
        preview.trail.push(preview.current);
        preview.current = next;
        preview.selected = 0;
    }
}

fn preview_option_count(model: &Model) -> usize {
    model
        .preview
        .as_ref()
        .and_then(|preview| model.story.card(preview.current))
        .map_or(0, |card| card.options.len())
}

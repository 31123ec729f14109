use super::*;
use crate::app::{Message, Model, update};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn model_with_cards(count: usize) -> Model {
    let mut model = Model::new((80, 24));
    for _ in 0..count {
        model = update(model, Message::SubmitDraft);
    }
    model
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn row_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|col| buffer[(col, row)].symbol())
        .collect()
}

// ---- Geometry ----

#[test]
fn test_split_panes_follows_percentages() {
    let chunks = split_panes(Rect::new(0, 0, 80, 23));
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].width, 32);
    assert_eq!(chunks[1].width, 48);
    assert_eq!(chunks[1].x, 32);
}

#[test]
fn test_content_height_reserves_status_row() {
    assert_eq!(content_height(24), 23);
    assert_eq!(content_inner_height(24), 21);
    assert_eq!(content_height(0), 0);
}

#[test]
fn test_cards_viewport_size_tracks_cards_pane() {
    // 80 cols -> cards pane is 48 wide, minus 2 for borders
    assert_eq!(cards_viewport_size(80, 24), (46, 21));
}

// ---- Cards view ----

#[test]
fn test_render_shows_draft_form_and_empty_cards() {
    let mut model = Model::new((80, 24));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let content = buffer_text(&terminal);
    assert!(content.contains("Draft"), "draft pane title missing");
    assert!(content.contains("Cards (0)"), "cards pane title missing");
    assert!(content.contains("Title:"));
    assert!(content.contains("[ Add card ]"));
    assert!(content.contains("No cards yet"));
}

#[test]
fn test_render_shows_submitted_card() {
    let mut model = model_with_cards(1);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let content = buffer_text(&terminal);
    assert!(content.contains("Cards (1)"));
    assert!(content.contains("Card 1"));
    assert!(content.contains("[ ] Ending"));
}

#[test]
fn test_render_marks_ending_card() {
    let mut model = model_with_cards(1);
    model = update(model, Message::ToggleEnding);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    assert!(buffer_text(&terminal).contains("[x] Ending"));
}

#[test]
fn test_render_marks_selected_draft_row() {
    let mut model = Model::new((80, 24));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    // First inner row of the draft pane carries the selection marker.
    assert!(row_text(&terminal, 1).contains("> Title:"));
}

#[test]
fn test_render_marks_selected_card_row_when_focused() {
    let mut model = model_with_cards(1);
    model = update(model, Message::SwitchFocus);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    // Header at row 1, first selectable field at row 2.
    assert!(row_text(&terminal, 1).contains("Card 1"));
    assert!(row_text(&terminal, 2).contains("> Text:"));
}

#[test]
fn test_rendered_rows_line_up_with_slots() {
    // Hit-testing maps clicked rows straight onto the slot list, so the
    // rendered card blocks must stay one line per slot.
    let mut model = model_with_cards(2);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    // Card 1: header + 6 field rows, then a blank, then the next header.
    assert!(row_text(&terminal, 1).contains("Card 1"));
    assert!(row_text(&terminal, 9).contains("Card 2"));
}

#[test]
fn test_render_shows_field_edit_cursor() {
    let mut model = Model::new((80, 24));
    model = update(model, Message::BeginTitleEdit);
    model = update(model, Message::EditInsertChar('A'));

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let buffer = terminal.backend().buffer();
    let has_cursor_cell = buffer
        .content()
        .iter()
        .any(|c| c.bg == ratatui::style::Color::White);
    assert!(has_cursor_cell, "block cursor should be visible while editing");
}

// ---- Status and toast bars ----

#[test]
fn test_status_bar_shows_export_filename() {
    let mut model = Model::new((80, 24)).with_title(Some(String::from("My Tale")));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let status = row_text(&terminal, 23);
    assert!(status.contains("my_tale.json"));
    assert!(status.contains("cards: 0"));
    assert!(status.contains("?:help"));
}

#[test]
fn test_toast_replaces_status_bar() {
    // Previewing an empty story raises a warning toast.
    let mut model = Model::new((80, 24));
    model = update(model, Message::EnterPreview);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let status = row_text(&terminal, 23);
    assert!(status.contains("[warn] Nothing to preview yet"));
    assert!(!status.contains("?:help"));
}

// ---- JSON view ----

#[test]
fn test_render_json_view_shows_serialized_story() {
    let mut model = model_with_cards(1);
    model = update(model, Message::ToggleView);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let content = buffer_text(&terminal);
    assert!(content.contains("\"title\""));
    assert!(content.contains("\"entries\""));
    assert!(content.contains("never read back"));
    assert!(row_text(&terminal, 23).contains("SCRATCH"));
}

// ---- Preview ----

#[test]
fn test_render_preview_screen() {
    let mut model = model_with_cards(2);
    model = update(model, Message::EnterPreview);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let content = buffer_text(&terminal);
    assert!(content.contains("Card 1"));
    assert!(content.contains("1. The first choice."));
    assert!(content.contains("2. The second choice."));
    assert!(row_text(&terminal, 23).contains("PLAY"));
    assert!(row_text(&terminal, 23).contains("Esc:editor"));
}

#[test]
fn test_render_preview_ending_shows_the_end() {
    let mut model = model_with_cards(1);
    model = update(model, Message::ToggleEnding);
    model = update(model, Message::EnterPreview);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    assert!(buffer_text(&terminal).contains("The End"));
}

#[test]
fn test_render_preview_shows_trail() {
    let mut model = model_with_cards(3);
    model = update(model, Message::EnterPreview);
    model = update(model, Message::PreviewChoose('1'));

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    assert!(buffer_text(&terminal).contains("Path: 1 -> 2"));
}

#[test]
fn test_preview_status_bar_in_play_mode() {
    let mut model = model_with_cards(1).with_play_only();
    model = update(model, Message::EnterPreview);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    assert!(row_text(&terminal, 23).contains("Esc:quit"));
}

// ---- Help overlay ----

#[test]
fn test_render_help_overlay() {
    let mut model = Model::new((80, 24));
    model = update(model, Message::ToggleHelp);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let content = buffer_text(&terminal);
    assert!(content.contains("Help"));
    assert!(content.contains("Switch pane focus"));
    assert!(content.contains("Esc closes"));
}

#[test]
fn test_help_overlay_scrolls() {
    let mut model = Model::new((80, 24));
    model = update(model, Message::ToggleHelp);
    let top_before = {
        let mut terminal = create_test_terminal();
        terminal.draw(|frame| render(&mut model, frame)).unwrap();
        buffer_text(&terminal)
    };

    model = update(model, Message::HelpScrollDown(5));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();
    let after = buffer_text(&terminal);

    assert!(top_before.contains("Switch pane focus"));
    assert!(!after.contains("Switch pane focus"));
}

#[test]
fn test_help_line_count_covers_all_sections() {
    // The clamp in scrolling relies on this matching the overlay content.
    assert!(help_line_count() > 30);
}

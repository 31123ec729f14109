use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::model::{
    CardRow, CardsSlot, DraftRow, EditTarget, FieldEdit, card_rows, cards_slots, draft_rows,
};
use crate::app::{Focus, Model, View};
use crate::story::Card;
use crate::story::export::export_filename;

use super::{CARDS_PANE_PERCENT, DRAFT_PANE_PERCENT, overlays, status};

pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(DRAFT_PANE_PERCENT),
            Constraint::Percentage(CARDS_PANE_PERCENT),
        ])
        .split(area)
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();

    if model.preview.is_some() {
        render_preview(model, frame, area);
    } else {
        match model.view {
            View::Cards => render_cards_view(model, frame, area),
            View::Json => render_json_view(model, frame, area),
        }
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_cards_view(model: &Model, frame: &mut Frame, area: Rect) {
    // Reserve the last line for the status bar; a toast takes its place
    // so the panes never change height.
    let content_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let chunks = split_panes(content_area);
    render_draft_pane(model, frame, chunks[0]);
    render_cards_pane(model, frame, chunks[1]);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, status_area);
    } else if model.edit.is_some() {
        render_edit_status_bar(model, frame, status_area);
    } else {
        status::render_status_bar(model, frame, status_area);
    }
}

fn render_edit_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(edit) = &model.edit else {
        return;
    };

    let field = match &edit.target {
        EditTarget::StoryTitle => String::from("title"),
        EditTarget::DraftText => String::from("draft text"),
        EditTarget::DraftOptionText(key) => format!("draft option {key} label"),
        EditTarget::DraftOptionNext(key) => format!("draft option {key} target"),
        EditTarget::CardText(id) => format!("card {id} text"),
        EditTarget::CardOptionText(id, key) => format!("card {id} option {key} label"),
        EditTarget::CardOptionNext(id, key) => format!("card {id} option {key} target"),
    };

    let status = format!(" EDIT  {field}  Enter:commit  Esc:cancel");

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::Magenta).fg(Color::White));

    frame.render_widget(status_bar, area);
}

fn render_draft_pane(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Draft;
    let rows = draft_rows(&model.draft);

    let content: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let selected = focused && idx == model.draft_selected;
            draft_row_line(model, row, selected)
        })
        .collect();

    let block = Block::default()
        .title(" Draft ")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn draft_row_line(model: &Model, row: &DraftRow, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let (label, value, target) = match row {
        DraftRow::Title => (
            String::from("Title: "),
            model.story.title.clone(),
            EditTarget::StoryTitle,
        ),
        DraftRow::Text => (
            String::from("Text: "),
            model.draft.text.clone(),
            EditTarget::DraftText,
        ),
        DraftRow::OptionText(key) => (
            format!("Option {key}: "),
            model
                .draft
                .options
                .get(key)
                .map(|choice| choice.text.clone())
                .unwrap_or_default(),
            EditTarget::DraftOptionText(key.clone()),
        ),
        DraftRow::OptionNext(key) => (
            String::from("  -> card "),
            model
                .draft
                .options
                .get(key)
                .map(|choice| choice.next_id.to_string())
                .unwrap_or_default(),
            EditTarget::DraftOptionNext(key.clone()),
        ),
        DraftRow::Submit => {
            let style = if selected {
                Style::default().add_modifier(Modifier::BOLD).reversed()
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            return Line::styled(format!("{marker} [ Add card ]"), style);
        }
    };

    if let Some(edit) = model.edit.as_ref().filter(|edit| edit.target == target) {
        return edit_line(marker, &label, edit);
    }

    let style = if selected {
        Style::default().reversed()
    } else {
        Style::default()
    };
    Line::styled(format!("{marker} {label}{value}"), style)
}

fn render_cards_pane(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Cards;
    let slots = cards_slots(&model.story);

    let mut content: Vec<Line> = Vec::new();
    if slots.is_empty() {
        content.push(Line::styled(
            " No cards yet - fill in the draft and press a",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for slot_idx in model.viewport.visible_range() {
            let Some(slot) = slots.get(slot_idx) else {
                break;
            };
            content.push(cards_slot_line(model, slot, focused));
        }
    }

    let block = Block::default()
        .title(format!(" Cards ({}) ", model.story.entries.len()))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn cards_slot_line(model: &Model, slot: &CardsSlot, focused: bool) -> Line<'static> {
    match slot {
        CardsSlot::Blank => Line::raw(""),
        CardsSlot::Header(card_idx) => {
            let id = model
                .story
                .entries
                .get(*card_idx)
                .map_or(0, |card| card.id);
            Line::styled(
                format!("Card {id}"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        }
        CardsSlot::Field(card_idx, row_idx) => {
            let Some(card) = model.story.entries.get(*card_idx) else {
                return Line::raw("");
            };
            let Some(row) = card_rows(card).get(*row_idx).cloned() else {
                return Line::raw("");
            };
            let selected = focused
                && *card_idx == model.selected_card
                && *row_idx == model.selected_row;
            card_row_line(model, card, &row, selected)
        }
    }
}

fn card_row_line(model: &Model, card: &Card, row: &CardRow, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let (label, value, target) = match row {
        CardRow::Text => (
            String::from("Text: "),
            card.text.clone(),
            EditTarget::CardText(card.id),
        ),
        CardRow::OptionText(key) => (
            format!("Option {key}: "),
            card.options
                .get(key)
                .map(|choice| choice.text.clone())
                .unwrap_or_default(),
            EditTarget::CardOptionText(card.id, key.clone()),
        ),
        CardRow::OptionNext(key) => (
            String::from("  -> card "),
            card.options
                .get(key)
                .map(|choice| choice.next_id.to_string())
                .unwrap_or_default(),
            EditTarget::CardOptionNext(card.id, key.clone()),
        ),
        CardRow::Ending => {
            let mark = if card.is_ending() { "x" } else { " " };
            let style = if selected {
                Style::default().reversed()
            } else {
                Style::default()
            };
            return Line::styled(format!("{marker} [{mark}] Ending"), style);
        }
    };

    if let Some(edit) = model.edit.as_ref().filter(|edit| edit.target == target) {
        return edit_line(marker, &label, edit);
    }

    let style = if selected {
        Style::default().reversed()
    } else {
        Style::default()
    };
    Line::styled(format!("{marker} {label}{value}"), style)
}

/// Render an in-flight field edit, keeping the row's label prefix.
fn edit_line(marker: &str, label: &str, edit: &FieldEdit) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{marker} {label}"))];
    spans.extend(cursor_spans(&edit.buffer, edit.cursor));
    Line::from(spans)
}

/// Split a line at the cursor column into before / block cursor / after.
fn cursor_spans(text: &str, cursor: usize) -> Vec<Span<'static>> {
    let col = cursor.min(text.len());
    let cursor_len = text[col..].chars().next().map_or(0, char::len_utf8);

    let mut spans = Vec::new();
    if col > 0 {
        spans.push(Span::raw(text[..col].to_string()));
    }
    let cursor_char = if cursor_len == 0 {
        String::from(" ")
    } else {
        text[col..col + cursor_len].to_string()
    };
    spans.push(Span::styled(
        cursor_char,
        Style::default().bg(Color::White).fg(Color::Black),
    ));
    if col + cursor_len < text.len() {
        spans.push(Span::raw(text[col + cursor_len..].to_string()));
    }
    spans
}

fn render_json_view(model: &Model, frame: &mut Frame, area: Rect) {
    let content_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let block = Block::default()
        .title(" JSON scratch - edits are never read back ")
        .borders(Borders::ALL);
    let inner = block.inner(content_area);

    let mut content: Vec<Line> = Vec::new();
    if let Some(buf) = &model.json_buffer {
        let cursor = buf.cursor();
        let start = model.json_scroll_offset;
        let end = (start + inner.height as usize).min(buf.line_count());
        for line_idx in start..end {
            let line_text = buf.line_at(line_idx).unwrap_or_default();
            if line_idx == cursor.line {
                content.push(Line::from(cursor_spans(&line_text, cursor.col)));
            } else {
                content.push(Line::raw(line_text));
            }
        }
    }

    frame.render_widget(Clear, content_area);
    frame.render_widget(Paragraph::new(content).block(block), content_area);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, status_area);
    } else {
        render_json_status_bar(model, frame, status_area);
    }
}

fn render_json_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = export_filename(&model.story.title);

    let cursor_info = model.json_buffer.as_ref().map_or_else(String::new, |buf| {
        let cursor = buf.cursor();
        format!("  Ln {}, Col {}", cursor.line + 1, cursor.col + 1)
    });

    let status =
        format!(" SCRATCH  {filename}{cursor_info}  Esc:cards  Ctrl+S:export  Ctrl+Y:copy");

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::Magenta).fg(Color::White));

    frame.render_widget(status_bar, area);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(preview) = &model.preview else {
        return;
    };

    let content_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let title = if model.story.title.trim().is_empty() {
        String::from(" Preview ")
    } else {
        format!(" Preview - {} ", model.story.title)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::uniform(1));

    let mut content: Vec<Line> = Vec::new();
    if let Some(card) = model.story.card(preview.current) {
        content.push(Line::styled(
            format!("Card {}", card.id),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        content.push(Line::raw(""));
        content.push(Line::raw(card.text.clone()));
        content.push(Line::raw(""));

        if card.is_ending() {
            content.push(Line::styled(
                "The End",
                Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ));
        } else {
            for (idx, (key, choice)) in card.options.iter().enumerate() {
                let selected = idx == preview.selected;
                let marker = if selected { ">" } else { " " };
                let style = if selected {
                    Style::default().reversed()
                } else {
                    Style::default()
                };
                content.push(Line::styled(
                    format!("{marker} {key}. {}", choice.text),
                    style,
                ));
            }
        }
    } else {
        content.push(Line::styled(
            format!("No card with id {}", preview.current),
            Style::default().fg(Color::Red),
        ));
    }

    if !preview.trail.is_empty() {
        let mut path: Vec<String> = preview.trail.iter().map(ToString::to_string).collect();
        path.push(preview.current.to_string());
        content.push(Line::raw(""));
        content.push(Line::styled(
            format!("Path: {}", path.join(" -> ")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Clear, content_area);
    frame.render_widget(
        Paragraph::new(content)
            .block(block)
            .wrap(Wrap { trim: false }),
        content_area,
    );

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, status_area);
    } else {
        render_preview_status_bar(model, frame, status_area);
    }
}

fn render_preview_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(preview) = &model.preview else {
        return;
    };

    let exit_hint = if model.play_only { "quit" } else { "editor" };
    let status = format!(
        " PLAY  card {}  depth {}  1-9:choose  Enter:follow  Backspace:back  r:restart  Esc:{}",
        preview.current,
        preview.trail.len() + 1,
        exit_hint
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::Green).fg(Color::Black));

    frame.render_widget(status_bar, area);
}

use crossterm::event::{
    self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::model::{Focus, View};
use crate::app::{App, Message, Model};
use crate::scratch::Direction;

impl App {
    pub(super) fn handle_event(&self, event: Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Resize(w, h) => Some(Message::Resize(w, h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: event::KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Message::HelpScrollUp(1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::HelpScrollDown(1)),
                _ => Some(Message::HideHelp),
            };
        }

        if model.preview.is_some() {
            return match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::Quit)
                }
                KeyCode::Char(c) if c.is_ascii_digit() => Some(Message::PreviewChoose(c)),
                KeyCode::Char('j') | KeyCode::Down => Some(Message::PreviewSelectNext),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::PreviewSelectPrev),
                KeyCode::Enter => Some(Message::PreviewFollow),
                KeyCode::Backspace => Some(Message::PreviewBack),
                KeyCode::Char('r') => Some(Message::PreviewRestart),
                KeyCode::Esc | KeyCode::Char('p') => Some(Message::ExitPreview),
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
                _ => None,
            };
        }

        if model.edit.is_some() {
            return match key.code {
                KeyCode::Enter => Some(Message::CommitEdit),
                KeyCode::Esc => Some(Message::CancelEdit),
                KeyCode::Backspace => Some(Message::EditDeleteBack),
                KeyCode::Delete => Some(Message::EditDeleteForward),
                KeyCode::Left => Some(Message::EditMoveLeft),
                KeyCode::Right => Some(Message::EditMoveRight),
                KeyCode::Home => Some(Message::EditMoveHome),
                KeyCode::End => Some(Message::EditMoveEnd),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::Quit)
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Some(Message::EditInsertChar(c))
                }
                _ => None,
            };
        }

        if model.view == View::Json {
            return match key.code {
                KeyCode::Esc => Some(Message::ToggleView),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::Export)
                }
                KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::CopyJson)
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::Quit)
                }
                KeyCode::Enter => Some(Message::JsonSplitLine),
                KeyCode::Backspace => Some(Message::JsonDeleteBack),
                KeyCode::Delete => Some(Message::JsonDeleteForward),
                KeyCode::Up => Some(Message::JsonMoveCursor(Direction::Up)),
                KeyCode::Down => Some(Message::JsonMoveCursor(Direction::Down)),
                KeyCode::Left => Some(Message::JsonMoveCursor(Direction::Left)),
                KeyCode::Right => Some(Message::JsonMoveCursor(Direction::Right)),
                KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::JsonMoveToStart)
                }
                KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::JsonMoveToEnd)
                }
                KeyCode::Home => Some(Message::JsonMoveHome),
                KeyCode::End => Some(Message::JsonMoveEnd),
                KeyCode::PageUp => Some(Message::JsonScrollUp(json_page(model))),
                KeyCode::PageDown => Some(Message::JsonScrollDown(json_page(model))),
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Some(Message::JsonInsertChar(c))
                }
                _ => None,
            };
        }

        // Normal key handling (cards view)
        match key.code {
            // Selection
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectPrev),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::SelectFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Message::SelectLast),
            KeyCode::PageUp => {
                if model.viewport.can_scroll_up() {
                    Some(Message::PageUp)
                } else {
                    None
                }
            }
            KeyCode::PageDown => {
                if model.viewport.can_scroll_down() {
                    Some(Message::PageDown)
                } else {
                    None
                }
            }
            KeyCode::Tab => Some(Message::SwitchFocus),

            // Editing
            KeyCode::Enter => Some(Message::BeginEdit),
            KeyCode::Char('t') => Some(Message::BeginTitleEdit),
            KeyCode::Char('a') => Some(Message::SubmitDraft),
            KeyCode::Char(' ') if model.focus == Focus::Cards => Some(Message::ToggleEnding),
            KeyCode::Char('d') if model.focus == Focus::Cards => Some(Message::DeleteCard),

            // Views
            KeyCode::Char('v') => Some(Message::ToggleView),
            KeyCode::Char('p') => Some(Message::EnterPreview),
            KeyCode::Char('s') => Some(Message::Export),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),

            // Quit
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::Quit)
            }

            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.preview.is_some() {
            return None;
        }

        let content = Rect::new(
            0,
            0,
            model.terminal.0,
            crate::ui::content_height(model.terminal.1),
        );

        if model.view == View::Json {
            return match mouse.kind {
                MouseEventKind::ScrollDown => Some(Message::JsonScrollDown(3)),
                MouseEventKind::ScrollUp => Some(Message::JsonScrollUp(3)),
                MouseEventKind::Down(MouseButton::Left) => {
                    let inner = inner_rect(content);
                    if point_in_rect(mouse.column, mouse.row, inner) {
                        let row = usize::from(mouse.row - inner.y);
                        let col = usize::from(mouse.column - inner.x);
                        Some(Message::JsonClickAt(row, col))
                    } else {
                        None
                    }
                }
                _ => None,
            };
        }

        let chunks = crate::ui::split_panes(content);
        let draft_area = chunks[0];
        let cards_area = chunks[1];

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let draft_inner = inner_rect(draft_area);
                if point_in_rect(mouse.column, mouse.row, draft_inner) {
                    let idx = usize::from(mouse.row - draft_inner.y);
                    return Some(Message::SelectDraftRow(idx));
                }
                let cards_inner = inner_rect(cards_area);
                if point_in_rect(mouse.column, mouse.row, cards_inner) {
                    let slot = model.viewport.offset() + usize::from(mouse.row - cards_inner.y);
                    return Some(Message::SelectSlot(slot));
                }
                None
            }
            MouseEventKind::ScrollDown => {
                if model.viewport.can_scroll_down() {
                    Some(Message::ScrollDown(3))
                } else {
                    None
                }
            }
            MouseEventKind::ScrollUp => {
                if model.viewport.can_scroll_up() {
                    Some(Message::ScrollUp(3))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub(super) fn view(&self, model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Number of lines a PageUp/PageDown moves in the JSON view.
fn json_page(model: &Model) -> usize {
    model.json_view_rows().max(1)
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Shrink a bordered area to its contents.
fn inner_rect(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

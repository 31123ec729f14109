use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model};
use crate::story::export::export_filename;

/// Status bar for the cards view; the JSON and preview screens render
/// their own bars.
pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = export_filename(&model.story.title);

    let focus_indicator = match model.focus {
        Focus::Draft => " [draft]",
        Focus::Cards => " [cards]",
    };

    let export_info = model
        .last_export
        .as_ref()
        .map_or_else(String::new, |path| format!("  saved: {}", path.display()));

    let status = format!(
        " {}  [{}%]  cards: {}{}{}  ?:help",
        filename,
        model.viewport.scroll_percent(),
        model.story.entries.len(),
        focus_indicator,
        export_info
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        crate::app::ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        crate::app::ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        crate::app::ToastLevel::Error => {
            ("[error]", Style::default().bg(Color::Red).fg(Color::White))
        }
    };
    let toast = Paragraph::new(format!("{} {}", prefix, message)).style(style);
    frame.render_widget(toast, area);
}

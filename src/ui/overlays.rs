use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

/// Total number of lines in the help overlay, used to clamp scrolling.
pub fn help_line_count() -> usize {
    help_lines("", "").len()
}

fn help_lines(global_cfg: &str, local_cfg: &str) -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut all_lines: Vec<Line> = Vec::new();

    // Global
    all_lines.push(Line::styled("Global", section_style));
    all_lines.push(Line::raw("  Tab                 Switch pane focus"));
    all_lines.push(Line::raw("  v                   Toggle cards / JSON view"));
    all_lines.push(Line::raw("  p                   Preview a playthrough"));
    all_lines.push(Line::raw("  s                   Export story JSON"));
    all_lines.push(Line::raw("  t                   Edit the story title"));
    all_lines.push(Line::raw("  q / Ctrl-c          Quit"));
    all_lines.push(Line::raw("  ? / F1              Toggle help"));
    all_lines.push(Line::raw(""));

    // Draft pane
    all_lines.push(Line::styled("Draft pane", section_style));
    all_lines.push(Line::raw("  j/k or Up/Down      Move between fields"));
    all_lines.push(Line::raw("  Enter               Edit field / add card"));
    all_lines.push(Line::raw("  a                   Add card from anywhere"));
    all_lines.push(Line::raw("  g / G, Home / End   First / last row"));
    all_lines.push(Line::raw(""));

    // Cards pane
    all_lines.push(Line::styled("Cards pane", section_style));
    all_lines.push(Line::raw("  j/k or Up/Down      Move between fields"));
    all_lines.push(Line::raw("  Enter               Edit field / toggle ending"));
    all_lines.push(Line::raw("  Space               Toggle ending on card"));
    all_lines.push(Line::raw("  d                   Delete selected card"));
    all_lines.push(Line::raw("  PageUp/PageDown     Scroll"));
    all_lines.push(Line::raw("  Mouse click/wheel   Select / scroll"));
    all_lines.push(Line::raw(""));

    // Field editing
    all_lines.push(Line::styled("Field editing", section_style));
    all_lines.push(Line::raw("  Enter               Commit"));
    all_lines.push(Line::raw("  Esc                 Cancel"));
    all_lines.push(Line::raw("  Arrows, Home/End    Move cursor"));
    all_lines.push(Line::raw(""));

    // JSON view
    all_lines.push(Line::styled("JSON view", section_style));
    all_lines.push(Line::raw("  Esc                 Back to cards (edits dropped)"));
    all_lines.push(Line::raw("  Ctrl-s              Export"));
    all_lines.push(Line::raw("  Ctrl-y              Copy JSON to clipboard"));
    all_lines.push(Line::raw("  Arrows, Home/End    Move cursor"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Buffer start / end"));
    all_lines.push(Line::raw("  PageUp/PageDown     Scroll"));
    all_lines.push(Line::raw(""));

    // Preview
    all_lines.push(Line::styled("Preview", section_style));
    all_lines.push(Line::raw("  1-9                 Choose option by key"));
    all_lines.push(Line::raw("  j/k or Up/Down      Highlight option"));
    all_lines.push(Line::raw("  Enter               Follow highlighted option"));
    all_lines.push(Line::raw("  Backspace           Step back"));
    all_lines.push(Line::raw("  r                   Restart from the top"));
    all_lines.push(Line::raw("  Esc / p             Leave preview"));
    all_lines.push(Line::raw(""));

    // Config
    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    all_lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let dim_style = Style::default().fg(Color::Indexed(245));
    let all_lines = help_lines(&global_cfg, &local_cfg);

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = content_height_u16 as usize;
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);

    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    // Footer hint
    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} Esc closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

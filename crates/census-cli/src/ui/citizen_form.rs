//! Add/edit form — one row per field with its inline error.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::citizen_detail::display_value;
use crate::app::App;

const LABEL_WIDTH: usize = 16;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(form) = app.form.as_ref() else {
    return;
  };

  let mut title = format!(" {} ", form.mode().title());
  if form.is_submitting() {
    title.push_str("— Saving… ");
  }

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let focused = app.focused_field();
  let mut lines: Vec<Line> = Vec::new();

  for field in App::form_fields() {
    let is_focused = field == focused;
    let raw = form.value(field);

    // Select fields show the option label between arrows.
    let value = match field.choices() {
      Some(_) if raw.is_empty() => "‹ choose ›".to_string(),
      Some(_) => format!("‹ {} ›", display_value(field, raw)),
      None if is_focused => format!("{raw}_"),
      None => raw.to_string(),
    };

    let label_style = if is_focused {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };

    lines.push(Line::from(vec![
      Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
      Span::raw(" "),
      Span::raw(value),
    ]));

    if let Some(message) = form.error(field) {
      lines.push(Line::from(Span::styled(
        format!("{:LABEL_WIDTH$} {message}", ""),
        Style::default().fg(Color::Red),
      )));
    }
  }

  f.render_widget(Paragraph::new(lines), inner);
}

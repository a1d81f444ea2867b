//! Citizen detail pane — right panel, read-only view of the highlighted record.

use census_core::{citizen::Citizen, validate::Field};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let citizen = app.cursor_citizen();
  let title = citizen
    .map(Citizen::full_name)
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| "Detail".to_string());

  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(citizen) = citizen else {
    let hint = Paragraph::new("Select a citizen to see the record.")
      .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, inner);
    return;
  };

  let mut lines: Vec<Line> = Vec::new();
  if let Some(id) = &citizen.id {
    lines.push(row("id", id.as_str()));
    lines.push(Line::from(""));
  }
  for field in App::form_fields() {
    lines.push(row(field.label(), &display_value(field, field.get(citizen))));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn row<'a>(label: &str, value: &str) -> Line<'a> {
  Line::from(vec![
    Span::styled(
      format!("{label:<16}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value.to_string()),
  ])
}

/// The label of a select value, the raw text otherwise.
pub fn display_value(field: Field, value: &str) -> String {
  field
    .choices()
    .and_then(|choices| choices.into_iter().find(|c| c.value == value))
    .map(|c| c.label.to_string())
    .unwrap_or_else(|| value.to_string())
}

//! Village lookup pane — replaces the detail pane while toggled on.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let villages = app.villages.as_deref().unwrap_or_default();

  let block = Block::default()
    .title(format!(" Villages ({}) ", villages.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if villages.is_empty() {
    f.render_widget(
      Paragraph::new("No villages.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let lines: Vec<Line> = villages
    .iter()
    .map(|v| {
      Line::from(vec![
        Span::styled(format!("{:>4}  ", v.id), Style::default().fg(Color::Cyan)),
        Span::raw(v.name.clone()),
      ])
    })
    .collect();
  f.render_widget(Paragraph::new(lines), inner);
}

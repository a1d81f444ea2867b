//! TUI rendering — orchestrates all panes.

pub mod citizen_detail;
pub mod citizen_form;
pub mod citizen_list;
pub mod village_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{
  alert::AlertKind,
  app::{App, Screen},
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " census  [a] add  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  if app.screen == Screen::CitizenForm {
    citizen_form::draw(f, area, app);
    return;
  }

  // Split into left list pane (35%) and right pane (65%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  citizen_list::draw(f, cols[0], app);

  if app.show_villages {
    village_list::draw(f, cols[1], app);
  } else {
    citizen_detail::draw(f, cols[1], app);
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    _ if app.pending_delete.is_some() => ("DELETE", "Delete this citizen? y confirm  any key cancel"),
    Screen::CitizenList if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc cancel  Enter edit",
    ),
    Screen::CitizenList => (
      "LIST",
      "↑↓/jk navigate  a add  Enter edit  d delete  v villages  r reload  q quit",
    ),
    Screen::CitizenForm => (
      "FORM",
      "↑↓/Tab field  ←→ choose  Enter save  Ctrl-R reset  Esc cancel",
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  // Progress of a running request wins over alerts, which win over hints.
  let status_span = match app.alerts.current() {
    _ if app.is_busy() => Span::styled(
      format!("  {}", app.status_msg),
      Style::default().fg(Color::Yellow),
    ),
    Some(alert) if app.pending_delete.is_none() => {
      let color = match alert.kind {
        AlertKind::Success => Color::Green,
        AlertKind::Error => Color::Red,
      };
      Span::styled(format!("  {}", alert.message), Style::default().fg(color))
    }
    _ => Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  };

  let line = Line::from(vec![mode_span, status_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

//! TUI rendering. Lays out the panes and draws the header and status bar.

pub mod form;
pub mod records;
pub mod sidebar;

use chrono::Local;
use folio_admin::NoticeLevel;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " folio admin",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  );
  let source_style = if app.offline {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::Gray)
  };
  let source = Span::styled(format!("  {}", app.source), source_style);
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let used = (left.content.chars().count()
    + source.content.chars().count()
    + right.content.chars().count()) as u16;
  let pad = area.width.saturating_sub(used);

  let line = Line::from(vec![left, source, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Length(24),
      Constraint::Percentage(30),
      Constraint::Min(0),
    ])
    .split(area);

  sidebar::draw(f, cols[0], app);
  records::draw_list(f, cols[1], app);
  match &app.mode {
    Mode::Edit(editor) => form::draw(f, cols[2], editor),
    _ => records::draw_detail(f, cols[2], app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.mode {
    Mode::Browse => (
      "BROWSE",
      "tab focus  ↑↓ move  a add  e edit  d delete  h hide/show  r retry  / filter  q quit",
    ),
    Mode::Filter => ("FILTER", "type to filter  enter keep  esc clear"),
    Mode::Edit(_) => (
      "EDIT",
      "↑↓ field  type to edit  space toggle  ^N add slot  ^X remove slot  ^S save  esc cancel",
    ),
    Mode::ConfirmDelete { .. } => ("DELETE", "y confirm  any other key cancels"),
  };

  let (message, colour) = match (&app.mode, &app.status) {
    (Mode::ConfirmDelete { label, .. }, _) => {
      (format!("Delete \"{label}\"? This cannot be undone."), Color::Red)
    }
    (_, Some(notice)) => {
      let colour = match notice.level {
        NoticeLevel::Info => Color::Gray,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
      };
      (notice.message.clone(), colour)
    }
    (_, None) => (hints.to_string(), Color::DarkGray),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let message_span = Span::styled(format!("  {message}"), Style::default().fg(colour));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, message_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

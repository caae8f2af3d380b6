//! Collection sidebar: one line per collection with its phase.

use folio_admin::Phase;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::{App, Focus};

fn badge(phase: Phase) -> (&'static str, Color) {
  match phase {
    Phase::Unloaded => ("○", Color::DarkGray),
    Phase::Loading => ("…", Color::Yellow),
    Phase::Loaded => ("●", Color::Green),
    Phase::Mutating => ("◐", Color::Cyan),
    Phase::Error => ("✗", Color::Red),
  }
}

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let border = if app.focus == Focus::Collections {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(" Sections ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let items: Vec<ListItem> = app
    .collections
    .iter()
    .map(|&collection| {
      let view = app.admin.view(collection);
      let (glyph, colour) = badge(view.phase());
      let count = if collection.is_singleton() {
        String::new()
      } else {
        format!(" {}", view.rows().len())
      };
      ListItem::new(Line::from(vec![
        Span::styled(format!("{glyph} "), Style::default().fg(colour)),
        Span::raw(collection.label()),
        Span::styled(count, Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.selected));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD)),
    area,
    &mut state,
  );
}

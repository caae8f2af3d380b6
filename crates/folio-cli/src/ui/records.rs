//! Record list and detail panes.

use folio_admin::Phase;
use folio_core::icon::Icon;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use serde_json::Value;

use crate::app::{App, Focus, Mode};

// ─── List ─────────────────────────────────────────────────────────────────────

pub fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let collection = app.collection();
  let view = app.admin.view(collection);
  let rows = app.rows();
  let total = view.rows().len();

  let title = if app.filter.is_empty() {
    format!(" {} ({total}) ", collection.label())
  } else {
    format!(" {} ({}/{total}) ", collection.label(), rows.len())
  };
  let border = if app.focus == Focus::Records {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  let placeholder = match view.phase() {
    Phase::Unloaded | Phase::Loading => Some("Loading…".to_string()),
    Phase::Error => {
      let message = view.failure().map(|e| e.message.as_str()).unwrap_or_default();
      Some(format!("Could not load: {message}\n\nPress r to retry."))
    }
    _ if rows.is_empty() && app.filter.is_empty() => Some("Nothing here yet. Press a to add.".into()),
    _ => None,
  };
  if let Some(text) = placeholder {
    f.render_widget(
      Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false }),
      inner,
    );
    return;
  }

  let filtering = matches!(app.mode, Mode::Filter);
  if (filtering || !app.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
    inner.height -= 1;
    let text = if filtering {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Yellow)), filter_area);
  }

  let items: Vec<ListItem> = rows
    .iter()
    .map(|row| {
      let mut style = Style::default();
      if !row.active {
        style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
      }
      let mut spans = vec![
        Span::styled(format!("{:>3} ", row.display_order), Style::default().fg(Color::DarkGray)),
        Span::styled(row.label.clone(), style),
      ];
      if row.pending {
        spans.push(Span::styled(" *", Style::default().fg(Color::Cyan)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!rows.is_empty()).then_some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

// ─── Detail ───────────────────────────────────────────────────────────────────

pub fn draw_detail(f: &mut Frame, area: Rect, app: &App) {
  let collection = app.collection();
  let view = app.admin.view(collection);
  let row = app.cursor_row();

  let title = row.as_ref().map(|r| r.label.as_str()).unwrap_or("Detail");
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(json) = row.and_then(|r| view.record_json(&r.id)) else {
    let hint = if collection.is_singleton() {
      "Not set yet. Press e to fill it in."
    } else {
      "Select a record."
    };
    f.render_widget(Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)), inner);
    return;
  };

  let lines: Vec<Line> = match &json {
    Value::Object(map) => map.iter().flat_map(|(k, v)| field_lines(k, v)).collect(),
    other => vec![Line::from(other.to_string())],
  };
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn field_lines<'a>(key: &'a str, value: &'a Value) -> Vec<Line<'a>> {
  let label = Span::styled(
    format!("{key:<20}"),
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
  );
  match value {
    Value::Array(items) => {
      let mut lines = vec![Line::from(vec![label])];
      lines.extend(items.iter().map(|item| Line::from(format!("  • {}", plain(item)))));
      lines
    }
    Value::String(name) if key == "icon" => {
      let icon = Icon::resolve(name);
      vec![Line::from(vec![label, Span::raw(format!("{} {name}", icon.glyph()))])]
    }
    Value::Null => {
      vec![Line::from(vec![label, Span::styled("—", Style::default().fg(Color::DarkGray))])]
    }
    other => vec![Line::from(vec![label, Span::raw(plain(other))])],
  }
}

fn plain(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

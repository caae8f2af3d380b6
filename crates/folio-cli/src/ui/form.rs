//! Form editor pane, drawn in place of the detail pane while editing.

use folio_admin::{FieldValue, Target};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::editor::{EditLine, Editor};

pub fn draw(f: &mut Frame, area: Rect, editor: &Editor) {
  let form = editor.form();
  let verb = match form.target() {
    Target::New => "New",
    Target::Existing(_) | Target::Singleton => "Edit",
  };
  let block = Block::default()
    .title(format!(" {verb} {} ", form.collection().label()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let cursor = editor.cursor();
  let lines: Vec<Line> = editor
    .lines()
    .into_iter()
    .enumerate()
    .filter_map(|(i, line)| {
      let selected = i == cursor;
      let marker = if selected { "▸ " } else { "  " };
      let text = match line {
        EditLine::Field(index) => {
          let field = form.fields().get(index)?;
          let value = match &field.value {
            FieldValue::Text(s) | FieldValue::Integer(s) => s.clone(),
            FieldValue::Optional(s) if s.is_empty() => "(none)".into(),
            FieldValue::Optional(s) => s.clone(),
            FieldValue::Flag(b) => (if *b { "[x]" } else { "[ ]" }).to_string(),
            FieldValue::Slots(slots) => format!("{} item(s)", slots.len()),
          };
          Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<20}", field.name), Style::default().fg(Color::Cyan)),
            Span::raw(value),
          ])
        }
        EditLine::Slot { field, slot } => {
          let FieldValue::Slots(slots) = &form.fields().get(field)?.value else {
            return None;
          };
          Line::from(vec![
            Span::raw(marker),
            Span::styled(
              format!("{:>20}", format!("{}.", slot + 1)),
              Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!(" {}", slots.get(slot).unwrap_or_default())),
          ])
        }
      };
      Some(if selected {
        text.style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
      } else {
        text
      })
    })
    .collect();

  let scroll = cursor.saturating_sub(inner.height.saturating_sub(1) as usize) as u16;
  f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

//! Cursor-driven editing of a [`Form`].
//!
//! Every scalar field is one line. A list field is a header line followed by
//! one line per slot.

use folio_admin::{FieldValue, Form};
use folio_core::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditLine {
  Field(usize),
  Slot { field: usize, slot: usize },
}

#[derive(Debug, Clone)]
pub struct Editor {
  form:   Form,
  cursor: usize,
}

impl Editor {
  pub fn new(form: Form) -> Self { Self { form, cursor: 0 } }

  pub fn form(&self) -> &Form { &self.form }

  pub fn cursor(&self) -> usize { self.cursor }

  pub fn lines(&self) -> Vec<EditLine> {
    let mut lines = Vec::new();
    for (i, field) in self.form.fields().iter().enumerate() {
      lines.push(EditLine::Field(i));
      if let FieldValue::Slots(slots) = &field.value {
        lines.extend((0..slots.len()).map(|slot| EditLine::Slot { field: i, slot }));
      }
    }
    lines
  }

  pub fn current(&self) -> Option<EditLine> { self.lines().get(self.cursor).copied() }

  pub fn up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  pub fn down(&mut self) {
    if self.cursor + 1 < self.lines().len() {
      self.cursor += 1;
    }
  }

  /// Type a character at the cursor. Space toggles a flag.
  pub fn insert_char(&mut self, c: char) -> Result<(), ValidationError> {
    self.edit_text(|s| s.push(c), |b| {
      if c == ' ' {
        *b = !*b;
      }
    })
  }

  pub fn backspace(&mut self) -> Result<(), ValidationError> {
    self.edit_text(
      |s| {
        s.pop();
      },
      |_| {},
    )
  }

  /// Append a blank slot to the list under the cursor and move onto it.
  pub fn add_slot(&mut self) {
    let field = match self.current() {
      Some(EditLine::Field(i)) | Some(EditLine::Slot { field: i, .. }) => i,
      None => return,
    };
    let Some(FieldValue::Slots(slots)) = self.form.field_at_mut(field).map(|f| &mut f.value) else {
      return;
    };
    let slot = slots.push_blank();
    let target = EditLine::Slot { field, slot };
    if let Some(pos) = self.lines().iter().position(|l| *l == target) {
      self.cursor = pos;
    }
  }

  /// Remove the slot under the cursor. Later slots move up.
  pub fn remove_slot(&mut self) -> Result<(), ValidationError> {
    match self.current() {
      Some(line) => self.remove_slot_at(line),
      None => Ok(()),
    }
  }

  fn remove_slot_at(&mut self, line: EditLine) -> Result<(), ValidationError> {
    let EditLine::Slot { field, slot } = line else {
      return Ok(());
    };
    if let Some(FieldValue::Slots(slots)) = self.form.field_at_mut(field).map(|f| &mut f.value) {
      slots.remove(slot)?;
    }
    let last = self.lines().len().saturating_sub(1);
    self.cursor = self.cursor.min(last);
    Ok(())
  }

  fn edit_text(
    &mut self,
    text: impl FnOnce(&mut String),
    flag: impl FnOnce(&mut bool),
  ) -> Result<(), ValidationError> {
    match self.current() {
      Some(line) => self.edit_text_at(line, text, flag),
      None => Ok(()),
    }
  }

  fn edit_text_at(
    &mut self,
    line: EditLine,
    text: impl FnOnce(&mut String),
    flag: impl FnOnce(&mut bool),
  ) -> Result<(), ValidationError> {
    match line {
      EditLine::Field(i) => {
        let Some(field) = self.form.field_at_mut(i) else { return Ok(()) };
        match &mut field.value {
          FieldValue::Text(s) | FieldValue::Optional(s) | FieldValue::Integer(s) => text(s),
          FieldValue::Flag(b) => flag(b),
          FieldValue::Slots(_) => {}
        }
        Ok(())
      }
      EditLine::Slot { field, slot } => {
        let Some(FieldValue::Slots(slots)) = self.form.field_at_mut(field).map(|f| &mut f.value)
        else {
          return Ok(());
        };
        let mut value = slots.get(slot).unwrap_or_default().to_owned();
        text(&mut value);
        slots.set(slot, value)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use folio_core::{Collection, content::Project};

  use super::*;

  fn type_str(editor: &mut Editor, s: &str) {
    for c in s.chars() {
      editor.insert_char(c).unwrap();
    }
  }

  fn project_editor() -> Editor { Editor::new(Form::blank(Collection::Projects)) }

  #[test]
  fn typing_fills_the_field_under_the_cursor() {
    let mut editor = project_editor();
    type_str(&mut editor, "Xy");
    editor.backspace().unwrap();
    editor.down();
    type_str(&mut editor, "d");

    assert_eq!(editor.form().field("name"), Some(&FieldValue::Text("X".into())));
    assert_eq!(editor.form().field("description"), Some(&FieldValue::Text("d".into())));
  }

  #[test]
  fn slots_get_their_own_lines() {
    let mut editor = project_editor();
    let header = editor
      .lines()
      .iter()
      .position(|l| *l == EditLine::Field(4))
      .unwrap();
    for _ in 0..header {
      editor.down();
    }

    editor.add_slot();
    type_str(&mut editor, "Go");
    editor.add_slot();
    type_str(&mut editor, "Rust");
    assert_eq!(editor.current(), Some(EditLine::Slot { field: 4, slot: 1 }));

    editor.up();
    editor.remove_slot().unwrap();
    let Some(FieldValue::Slots(slots)) = editor.form().field("technologies") else {
      panic!("technologies is a list");
    };
    assert_eq!(slots.compact(), vec!["Rust"]);
  }

  #[test]
  fn space_toggles_flags() {
    let mut editor = project_editor();
    let flag = editor
      .lines()
      .iter()
      .position(|l| *l == EditLine::Field(8))
      .unwrap();
    for _ in 0..flag {
      editor.down();
    }
    editor.insert_char(' ').unwrap();
    assert_eq!(editor.form().field("is_active"), Some(&FieldValue::Flag(false)));
  }

  #[test]
  fn edited_form_builds_a_payload() {
    let mut editor = project_editor();
    type_str(&mut editor, "X");
    editor.down();
    type_str(&mut editor, "d");
    editor.down();
    type_str(&mut editor, "https://github.com/x/x");

    let project: Project = editor.form().build().unwrap();
    assert_eq!(project.name, "X");
    assert!(project.is_active);
  }

  #[test]
  fn missing_slot_is_reported_not_ignored() {
    let mut editor = project_editor();
    let stale = EditLine::Slot { field: 4, slot: 3 };

    let err = editor.remove_slot_at(stale).unwrap_err();
    assert_eq!(err.field, "technologies[3]");
    let err = editor.edit_text_at(stale, |s| s.push('x'), |_| {}).unwrap_err();
    assert_eq!(err.field, "technologies[3]");
  }
}

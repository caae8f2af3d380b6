//! Editing buffer for ordered multi-value string fields (technologies,
//! achievements, highlights).
//!
//! Slots are edited independently and stay contiguous after removal. Blank
//! slots survive editing and are dropped only by [`SlotList::compact`].

use crate::error::{Problem, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotList {
  field: String,
  slots: Vec<String>,
}

impl SlotList {
  pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
    Self { field: field.into(), slots: values }
  }

  pub fn field(&self) -> &str { &self.field }

  pub fn len(&self) -> usize { self.slots.len() }

  pub fn is_empty(&self) -> bool { self.slots.is_empty() }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.slots.get(index).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.slots.iter().map(String::as_str)
  }

  /// Append an empty slot and return its index.
  pub fn push_blank(&mut self) -> usize {
    self.slots.push(String::new());
    self.slots.len() - 1
  }

  /// Replace the content of the slot at `index`.
  pub fn set(
    &mut self,
    index: usize,
    value: impl Into<String>,
  ) -> Result<(), ValidationError> {
    let len = self.slots.len();
    let slot = self
      .slots
      .get_mut(index)
      .ok_or_else(|| no_such_slot(&self.field, index, len))?;
    *slot = value.into();
    Ok(())
  }

  /// Remove the slot at `index`; later slots shift down by one.
  pub fn remove(&mut self, index: usize) -> Result<String, ValidationError> {
    if index >= self.slots.len() {
      return Err(no_such_slot(&self.field, index, self.slots.len()));
    }
    Ok(self.slots.remove(index))
  }

  /// The submission payload: trimmed values in order, blank slots dropped.
  pub fn compact(&self) -> Vec<String> {
    self
      .slots
      .iter()
      .map(|s| s.trim())
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect()
  }
}

fn no_such_slot(field: &str, index: usize, len: usize) -> ValidationError {
  ValidationError::new(
    format!("{field}[{index}]"),
    Problem::Malformed(format!("no such slot (have {len})")),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn techs(values: &[&str]) -> SlotList {
    SlotList::new("technologies", values.iter().map(|s| s.to_string()).collect())
  }

  #[test]
  fn edit_then_remove_earlier_slot_shifts_value_down() {
    let mut slots = techs(&["Python", "Docker", "SQL"]);
    slots.set(2, "Rust").unwrap();
    slots.remove(0).unwrap();

    assert_eq!(slots.get(1), Some("Rust"));
    assert_eq!(slots.compact(), vec!["Docker", "Rust"]);
  }

  #[test]
  fn blank_slots_survive_editing_but_not_compaction() {
    let mut slots = techs(&["Go"]);
    let blank = slots.push_blank();
    slots.push_blank();
    slots.set(blank, "   ").unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots.compact(), vec!["Go"]);
  }

  #[test]
  fn out_of_range_edits_are_rejected() {
    let mut slots = techs(&["Go"]);
    assert!(slots.set(3, "x").is_err());
    assert!(slots.remove(1).is_err());
    assert_eq!(slots.compact(), vec!["Go"]);
  }
}

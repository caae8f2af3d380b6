//! Application state machine and key dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_admin::{AdminController, Form, Notice, RowView};
use folio_core::{Collection, RecordId};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use strum::IntoEnumIterator;

use crate::{backend::Backend, editor::Editor};

// ─── Focus & mode ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  /// The collection sidebar.
  Collections,
  /// The record list of the selected collection.
  Records,
}

#[derive(Debug, Clone)]
pub enum Mode {
  Browse,
  /// Typing a fuzzy filter for the record list.
  Filter,
  Edit(Editor),
  ConfirmDelete { id: RecordId, label: String },
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  pub admin:       AdminController<Backend>,
  /// Where the data lives, for the header.
  pub source:      String,
  pub offline:     bool,
  pub focus:       Focus,
  pub mode:        Mode,
  pub collections: Vec<Collection>,
  pub selected:    usize,
  pub filter:      String,
  pub list_cursor: usize,
  /// Latest notice, shown in the status bar until the next one.
  pub status:      Option<Notice>,
}

impl App {
  pub fn new(backend: Backend) -> Self {
    let source = backend.describe();
    let offline = backend.is_offline();
    Self {
      admin: AdminController::new(Arc::new(backend)),
      source,
      offline,
      focus: Focus::Collections,
      mode: Mode::Browse,
      collections: Collection::iter().collect(),
      selected: 0,
      filter: String::new(),
      list_cursor: 0,
      status: None,
    }
  }

  pub fn collection(&self) -> Collection {
    self.collections.get(self.selected).copied().unwrap_or(Collection::Profile)
  }

  /// Apply whatever store results have arrived and pick up their notices.
  pub fn tick(&mut self) {
    if self.admin.try_settle() > 0 {
      self.pull_notices();
      let len = self.rows().len();
      self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }
  }

  pub fn pull_notices(&mut self) {
    if let Some(last) = self.admin.take_notices().pop() {
      self.status = Some(last);
    }
  }

  // ── Filtered rows ─────────────────────────────────────────────────────────

  /// Rows of the selected collection matching the filter.
  pub fn rows(&self) -> Vec<RowView> {
    let rows = self.admin.view(self.collection()).rows();
    if self.filter.is_empty() {
      return rows;
    }
    let matcher = SkimMatcherV2::default();
    rows
      .into_iter()
      .filter(|r| matcher.fuzzy_match(&r.label, &self.filter).is_some())
      .collect()
  }

  pub fn cursor_row(&self) -> Option<RowView> { self.rows().into_iter().nth(self.list_cursor) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      Mode::Browse => return self.handle_browse_key(key),
      Mode::Filter => self.handle_filter_key(key),
      Mode::Edit(_) => self.handle_edit_key(key),
      Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
    }
    true
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Browse;
        self.filter.clear();
      }
      KeyCode::Enter => self.mode = Mode::Browse,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => {}
    }
    self.list_cursor = 0;
  }

  fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Esc => self.status = None,

      KeyCode::Tab | KeyCode::BackTab => {
        self.focus = match self.focus {
          Focus::Collections => Focus::Records,
          Focus::Records => Focus::Collections,
        };
      }
      KeyCode::Right | KeyCode::Char('l') => self.focus = Focus::Records,
      KeyCode::Left => self.focus = Focus::Collections,

      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),

      KeyCode::Char('/') => {
        self.mode = Mode::Filter;
        self.filter.clear();
        self.list_cursor = 0;
      }

      KeyCode::Char('a') => self.open_add(),
      KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
      KeyCode::Char('d') => self.ask_delete(),
      KeyCode::Char('h') => self.toggle_hidden(),
      KeyCode::Char('r') => {
        let collection = self.collection();
        match self.admin.retry(collection) {
          Ok(()) => self.status = Some(Notice::info(format!("Reloading {}", collection.label()))),
          Err(e) => self.status = Some(Notice::error(e.to_string())),
        }
      }

      _ => {}
    }
    true
  }

  fn move_cursor(&mut self, delta: isize) {
    match self.focus {
      Focus::Collections => {
        let next = self.selected.saturating_add_signed(delta);
        if next < self.collections.len() {
          self.selected = next;
          self.list_cursor = 0;
          self.filter.clear();
        }
      }
      Focus::Records => {
        let next = self.list_cursor.saturating_add_signed(delta);
        if next < self.rows().len() {
          self.list_cursor = next;
        }
      }
    }
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  fn open_add(&mut self) {
    let collection = self.collection();
    if collection.is_singleton() {
      return self.open_edit();
    }
    self.mode = Mode::Edit(Editor::new(Form::blank(collection)));
  }

  fn open_edit(&mut self) {
    let collection = self.collection();
    let id = self.cursor_row().map(|r| r.id);
    match self.admin.edit_form(collection, id.as_ref()) {
      Some(form) => self.mode = Mode::Edit(Editor::new(form)),
      None if collection.is_singleton() => {}
      None => self.status = Some(Notice::info("Select a record to edit")),
    }
  }

  fn ask_delete(&mut self) {
    if self.collection().is_singleton() {
      self.status = Some(Notice::info("Singleton sections cannot be deleted"));
      return;
    }
    if let Some(row) = self.cursor_row() {
      self.mode = Mode::ConfirmDelete { id: row.id, label: row.label };
    }
  }

  fn toggle_hidden(&mut self) {
    let collection = self.collection();
    let Some(row) = self.cursor_row() else { return };
    if let Err(e) = self.admin.toggle_active(collection, row.id) {
      self.status = Some(Notice::error(e.to_string()));
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    let Mode::ConfirmDelete { id, .. } = std::mem::replace(&mut self.mode, Mode::Browse) else {
      return;
    };
    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
      if let Err(e) = self.admin.delete_in(self.collection(), id) {
        self.status = Some(Notice::error(e.to_string()));
      }
    }
  }

  fn handle_edit_key(&mut self, key: KeyEvent) {
    let Mode::Edit(editor) = &mut self.mode else { return };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
      KeyCode::Esc => self.mode = Mode::Browse,
      KeyCode::Char('s') if ctrl => match self.admin.submit(editor.form()) {
        Ok(()) => {
          self.status = Some(Notice::info("Saving…"));
          self.mode = Mode::Browse;
        }
        Err(e) => self.status = Some(Notice::error(e.to_string())),
      },
      KeyCode::Char('n') if ctrl => editor.add_slot(),
      KeyCode::Up | KeyCode::BackTab => editor.up(),
      KeyCode::Down | KeyCode::Tab | KeyCode::Enter => editor.down(),
      code => {
        let edited = match code {
          KeyCode::Char('x') if ctrl => editor.remove_slot(),
          KeyCode::Backspace => editor.backspace(),
          KeyCode::Char(c) if !ctrl => editor.insert_char(c),
          _ => Ok(()),
        };
        if let Err(e) = edited {
          self.status = Some(Notice::error(format!("Could not edit: {e}")));
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use folio_admin::{NoticeLevel, Phase};
  use folio_core::{content::Project, store::ContentStore};
  use folio_store_local::LocalStore;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn ctrl(c: char) -> KeyEvent { KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL) }

  fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
      assert!(app.handle_key(key(KeyCode::Char(c))));
    }
  }

  async fn loaded_app(dir: &std::path::Path) -> App {
    let mut app = App::new(Backend::Local(LocalStore::open(dir).await.unwrap()));
    app.admin.activate();
    app.admin.settle_all().await;
    app.pull_notices();
    app
  }

  fn select(app: &mut App, collection: Collection) {
    app.selected = app.collections.iter().position(|c| *c == collection).unwrap();
    app.focus = Focus::Records;
  }

  async fn seed(dir: &std::path::Path, name: &str) {
    let store = LocalStore::open(dir).await.unwrap();
    store
      .insert(Project {
        name: name.into(),
        description: "d".into(),
        github_url: "https://github.com/x/x".into(),
        ..Project::default()
      })
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn adding_a_project_through_the_form() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::Projects);

    app.handle_key(key(KeyCode::Char('a')));
    assert!(matches!(app.mode, Mode::Edit(_)));
    type_str(&mut app, "X");
    app.handle_key(key(KeyCode::Down));
    type_str(&mut app, "d");
    app.handle_key(key(KeyCode::Down));
    type_str(&mut app, "https://github.com/x/x");
    app.handle_key(ctrl('s'));
    assert!(matches!(app.mode, Mode::Browse));

    app.admin.settle_all().await;
    app.pull_notices();
    assert_eq!(app.status.as_ref().unwrap().level, NoticeLevel::Success);
    let rows = app.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "X");
  }

  #[tokio::test]
  async fn invalid_form_stays_open_with_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::Projects);

    app.handle_key(key(KeyCode::Char('a')));
    app.handle_key(ctrl('s'));

    assert!(matches!(app.mode, Mode::Edit(_)));
    assert_eq!(app.status.as_ref().unwrap().level, NoticeLevel::Error);
    assert_eq!(app.admin.in_flight(), 0);
  }

  #[tokio::test]
  async fn delete_asks_for_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path(), "X").await;
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::Projects);

    app.handle_key(key(KeyCode::Char('d')));
    assert!(matches!(app.mode, Mode::ConfirmDelete { .. }));
    app.handle_key(key(KeyCode::Char('n')));
    assert_eq!(app.admin.in_flight(), 0);

    app.handle_key(key(KeyCode::Char('d')));
    app.handle_key(key(KeyCode::Char('y')));
    app.admin.settle_all().await;
    assert!(app.rows().is_empty());
  }

  #[tokio::test]
  async fn hide_toggles_the_active_flag() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path(), "X").await;
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::Projects);

    app.handle_key(key(KeyCode::Char('h')));
    assert_eq!(app.admin.phase(Collection::Projects), Phase::Mutating);
    app.admin.settle_all().await;
    assert!(!app.rows()[0].active);
  }

  #[tokio::test]
  async fn filter_narrows_the_list() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path(), "folio").await;
    seed(dir.path(), "kiln").await;
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::Projects);

    app.handle_key(key(KeyCode::Char('/')));
    type_str(&mut app, "kln");
    app.handle_key(key(KeyCode::Enter));

    let rows = app.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "kiln");
  }

  #[tokio::test]
  async fn singleton_add_opens_the_section_form() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::About);

    app.handle_key(key(KeyCode::Char('a')));
    let Mode::Edit(editor) = &app.mode else { panic!("expected the editor") };
    assert_eq!(editor.form().collection(), Collection::About);

    app.handle_key(key(KeyCode::Esc));
    app.handle_key(key(KeyCode::Char('d')));
    assert!(matches!(app.mode, Mode::Browse));
  }

  #[tokio::test]
  async fn q_quits_from_browse_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(dir.path()).await;
    select(&mut app, Collection::Projects);

    app.handle_key(key(KeyCode::Char('a')));
    assert!(app.handle_key(key(KeyCode::Char('q'))));
    app.handle_key(key(KeyCode::Esc));
    assert!(!app.handle_key(key(KeyCode::Char('q'))));
  }
}

//! The admin sync controller.
//!
//! Store calls run as independent tokio tasks. Each task sends back a closure
//! that applies its result to the [`Mirrors`]; closures are run only from
//! [`AdminController::settle`] / [`AdminController::try_settle`], so the
//! mirrors are mutated from one place. Every task is tagged with the session
//! it was started in; results from an older session are dropped.

use std::{
  collections::{HashMap, VecDeque},
  future::Future,
  sync::Arc,
};

use folio_core::{
  Classify, Collection, FailureKind, Listed, RecordId,
  content::{
    About, Education, Experience, Profile, Project, Skill, SocialLink, SoftSkill,
    TechFocus,
  },
  store::ContentStore,
};
use strum::IntoEnumIterator;
use tokio::{
  sync::mpsc::{self, error::TryRecvError},
  task::{self, JoinError, JoinSet},
};

use crate::{
  Notice, SubmitError,
  form::{Form, Target},
  mirror::{Failure, MirrorView, Phase},
  mirrors::{Mirrored, MirroredSingleton, Mirrors},
};

type Apply = Box<dyn FnOnce(&mut Mirrors) -> Option<Notice> + Send>;

struct Settled {
  session: u64,
  apply:   Apply,
}

enum Wake {
  Settled(Option<Settled>),
  Joined(Result<(task::Id, ()), JoinError>),
}

/// Evaluate `$list` with `$E` bound to the entity type of a list collection,
/// or `$single` with `$T` bound to the entity type of a singleton.
macro_rules! dispatch {
  ($collection:expr, list $E:ident => $list:expr, singleton $T:ident => $single:expr $(,)?) => {
    match $collection {
      Collection::Profile => {
        #[allow(dead_code)]
        type $T = Profile;
        $single
      }
      Collection::About => {
        #[allow(dead_code)]
        type $T = About;
        $single
      }
      Collection::SocialLinks => {
        #[allow(dead_code)]
        type $E = SocialLink;
        $list
      }
      Collection::Skills => {
        #[allow(dead_code)]
        type $E = Skill;
        $list
      }
      Collection::SoftSkills => {
        #[allow(dead_code)]
        type $E = SoftSkill;
        $list
      }
      Collection::TechFocus => {
        #[allow(dead_code)]
        type $E = TechFocus;
        $list
      }
      Collection::Projects => {
        #[allow(dead_code)]
        type $E = Project;
        $list
      }
      Collection::Experiences => {
        #[allow(dead_code)]
        type $E = Experience;
        $list
      }
      Collection::Education => {
        #[allow(dead_code)]
        type $E = Education;
        $list
      }
    }
  };
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct AdminController<S> {
  store:     Arc<S>,
  mirrors:   Mirrors,
  active:    bool,
  session:   u64,
  tasks:     JoinSet<()>,
  tx:        mpsc::UnboundedSender<Settled>,
  rx:        mpsc::UnboundedReceiver<Settled>,
  /// Fallback result of each live task, applied if it panics.
  spawned:   HashMap<task::Id, Settled>,
  in_flight: usize,
  notices:   VecDeque<Notice>,
}

impl<S> AdminController<S>
where
  S: ContentStore + 'static,
{
  pub fn new(store: Arc<S>) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      store,
      mirrors: Mirrors::default(),
      active: false,
      session: 0,
      tasks: JoinSet::new(),
      tx,
      rx,
      spawned: HashMap::new(),
      in_flight: 0,
      notices: VecDeque::new(),
    }
  }

  // ── Inspection ────────────────────────────────────────────────────────────

  pub fn mirrors(&self) -> &Mirrors { &self.mirrors }

  pub fn view(&self, collection: Collection) -> &dyn MirrorView {
    self.mirrors.view(collection)
  }

  pub fn phase(&self, collection: Collection) -> Phase { self.view(collection).phase() }

  pub fn is_active(&self) -> bool { self.active }

  /// Every collection has either loaded or failed.
  pub fn is_ready(&self) -> bool {
    self.active && Collection::iter().all(|c| self.phase(c).is_settled())
  }

  /// Store calls started in this session whose results have not been applied.
  pub fn in_flight(&self) -> usize { self.in_flight }

  pub fn notices(&self) -> impl Iterator<Item = &Notice> { self.notices.iter() }

  pub fn take_notices(&mut self) -> Vec<Notice> { self.notices.drain(..).collect() }

  // ── Session lifecycle ─────────────────────────────────────────────────────

  /// Start loading every collection, one task each.
  pub fn activate(&mut self) {
    if self.active {
      return;
    }
    self.active = true;
    tracing::info!(session = self.session, "activating admin panel");
    for collection in Collection::iter() {
      self.load(collection);
    }
  }

  /// Abort outstanding work and forget all mirrored state. Results of the
  /// aborted session that were already queued are discarded on arrival.
  pub fn deactivate(&mut self) {
    self.tasks.abort_all();
    self.spawned.clear();
    self.session += 1;
    self.in_flight = 0;
    self.active = false;
    self.mirrors = Mirrors::default();
    tracing::info!(session = self.session, "deactivated admin panel");
  }

  /// Reload one collection. Refused while it is loading or has writes in
  /// flight.
  pub fn retry(&mut self, collection: Collection) -> Result<(), SubmitError> {
    match self.phase(collection) {
      Phase::Loading | Phase::Unloaded => Err(SubmitError::NotReady(collection)),
      Phase::Mutating => Err(SubmitError::Pending(collection)),
      Phase::Loaded | Phase::Error => {
        self.load(collection);
        Ok(())
      }
    }
  }

  fn load(&mut self, collection: Collection) {
    dispatch!(collection,
      list E => self.load_list::<E>(),
      singleton T => self.load_singleton::<T>(),
    )
  }

  fn load_list<E: Mirrored>(&mut self) {
    E::mirror_mut(&mut self.mirrors).begin_load();
    let store = self.store.clone();
    let on_panic: Apply =
      Box::new(|m: &mut Mirrors| E::mirror_mut(m).finish_load(Err(crashed())));
    self.spawn(on_panic, async move {
      let result = store
        .list::<E>(true)
        .await
        .map_err(|e| Failure::from_error(&e));
      Box::new(move |m: &mut Mirrors| E::mirror_mut(m).finish_load(result)) as Apply
    });
  }

  fn load_singleton<E: MirroredSingleton>(&mut self) {
    E::mirror_mut(&mut self.mirrors).begin_load();
    let store = self.store.clone();
    let on_panic: Apply =
      Box::new(|m: &mut Mirrors| E::mirror_mut(m).finish_load(Err(crashed())));
    self.spawn(on_panic, async move {
      let result = store
        .get_singleton::<E>()
        .await
        .map_err(|e| Failure::from_error(&e));
      Box::new(move |m: &mut Mirrors| E::mirror_mut(m).finish_load(result)) as Apply
    });
  }

  // ── Settling ──────────────────────────────────────────────────────────────

  /// Spawn a store call. `on_panic` stands in for the result if the call
  /// panics and never sends one.
  fn spawn<F>(&mut self, on_panic: Apply, task: F)
  where
    F: Future<Output = Apply> + Send + 'static,
  {
    let tx = self.tx.clone();
    let session = self.session;
    self.in_flight += 1;
    let handle = self.tasks.spawn(async move {
      let apply = task.await;
      // The receiver lives as long as the controller.
      let _ = tx.send(Settled { session, apply });
    });
    self.spawned.insert(handle.id(), Settled { session, apply: on_panic });
  }

  /// Apply one result if it belongs to the current session.
  fn apply(&mut self, settled: Settled) -> bool {
    if settled.session != self.session {
      tracing::debug!(
        stale = settled.session,
        current = self.session,
        "discarding result from a previous session"
      );
      return false;
    }
    self.in_flight = self.in_flight.saturating_sub(1);
    if let Some(notice) = (settled.apply)(&mut self.mirrors) {
      self.notices.push_back(notice);
    }
    true
  }

  /// Collect finished tasks without waiting. Returns how many crashed
  /// tasks were accounted for.
  fn reap(&mut self) -> usize {
    let mut crashed = 0;
    while let Some(joined) = self.tasks.try_join_next_with_id() {
      crashed += usize::from(self.absorb(joined));
    }
    crashed
  }

  /// Forget a finished task. One that panicked never sent its result, so its
  /// fallback is applied in its place.
  fn absorb(&mut self, joined: Result<(task::Id, ()), JoinError>) -> bool {
    let (id, panicked) = match joined {
      Ok((id, ())) => (id, false),
      Err(e) => (e.id(), e.is_panic()),
    };
    match self.spawned.remove(&id) {
      Some(fallback) if panicked => {
        tracing::error!(session = fallback.session, "store task panicked");
        self.apply(fallback)
      }
      _ => false,
    }
  }

  /// Wait for the next current-session result and apply it. Returns `false`
  /// at once when nothing is in flight.
  pub async fn settle(&mut self) -> bool {
    while self.in_flight > 0 {
      // A task sends its result before it finishes, so the channel is
      // drained before a finished task is taken for a crashed one.
      match self.rx.try_recv() {
        Ok(settled) => {
          if self.apply(settled) {
            self.reap();
            return true;
          }
          continue;
        }
        Err(TryRecvError::Disconnected) => return false,
        Err(TryRecvError::Empty) => {}
      }
      if self.reap() > 0 {
        return true;
      }
      let woke = tokio::select! {
        settled = self.rx.recv() => Wake::Settled(settled),
        Some(joined) = self.tasks.join_next_with_id() => Wake::Joined(joined),
      };
      match woke {
        Wake::Settled(None) => return false,
        Wake::Settled(Some(settled)) => {
          if self.apply(settled) {
            self.reap();
            return true;
          }
        }
        Wake::Joined(joined) => {
          if self.absorb(joined) {
            return true;
          }
        }
      }
    }
    false
  }

  /// Apply every result that has already arrived, without waiting.
  pub fn try_settle(&mut self) -> usize {
    let mut applied = 0;
    while let Ok(settled) = self.rx.try_recv() {
      if self.apply(settled) {
        applied += 1;
      }
    }
    applied + self.reap()
  }

  /// Wait until nothing is in flight.
  pub async fn settle_all(&mut self) { while self.settle().await {} }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Insert a new record. On acknowledgement it is sorted into the mirror.
  pub fn add<E: Mirrored>(&mut self, draft: E) -> Result<(), SubmitError> {
    draft.validate()?;
    E::mirror_mut(&mut self.mirrors).begin_add()?;

    let on_panic: Apply = Box::new(|m: &mut Mirrors| {
      E::mirror_mut(m).abandon_add();
      Some(write_crashed("add to", E::COLLECTION))
    });
    let store = self.store.clone();
    self.spawn(on_panic, async move {
      let result = store.insert(draft).await;
      Box::new(move |m: &mut Mirrors| {
        let mirror = E::mirror_mut(m);
        match result {
          Ok(record) => {
            tracing::info!(collection = %E::COLLECTION, id = %record.id, "added record");
            let notice = Notice::success(format!("Added {}", record.data.label()));
            mirror.finish_add(record);
            Some(notice)
          }
          Err(e) => {
            mirror.abandon_add();
            Some(write_failed("add to", E::COLLECTION, &e))
          }
        }
      }) as Apply
    });
    Ok(())
  }

  /// Replace the payload of an existing record.
  pub fn save<E: Mirrored>(&mut self, id: RecordId, draft: E) -> Result<(), SubmitError> {
    draft.validate()?;
    let mirror = E::mirror_mut(&mut self.mirrors);
    mirror.begin_write(&id)?;
    let moves = mirror
      .get(&id)
      .is_some_and(|r| r.data.display_order() != draft.display_order());

    let pending = id.clone();
    let on_panic: Apply = Box::new(move |m: &mut Mirrors| {
      E::mirror_mut(m).finish_write(&pending);
      Some(write_crashed("save to", E::COLLECTION))
    });
    let store = self.store.clone();
    self.spawn(on_panic, async move {
      let result = store.update(id.clone(), draft).await;
      // Ties are broken by insertion order, which only the store knows.
      let listed = match &result {
        Ok(_) if moves => match store.list::<E>(true).await {
          Ok(records) => Some(records.into_iter().map(|r| r.id).collect::<Vec<_>>()),
          Err(e) => {
            tracing::warn!(collection = %E::COLLECTION, error = %e, "could not re-read order");
            None
          }
        },
        _ => None,
      };
      Box::new(move |m: &mut Mirrors| {
        let mirror = E::mirror_mut(m);
        mirror.finish_write(&id);
        match result {
          Ok(record) => {
            tracing::info!(collection = %E::COLLECTION, %id, "saved record");
            let notice = Notice::success(format!("Saved {}", record.data.label()));
            mirror.replace(record);
            if let Some(listed) = listed {
              mirror.adopt_order(&listed);
            }
            Some(notice)
          }
          Err(e) => Some(write_failed("save to", E::COLLECTION, &e)),
        }
      }) as Apply
    });
    Ok(())
  }

  /// Insert or update the singleton.
  pub fn save_singleton<E: MirroredSingleton>(&mut self, draft: E) -> Result<(), SubmitError> {
    draft.validate()?;
    E::mirror_mut(&mut self.mirrors).begin_write()?;

    let on_panic: Apply = Box::new(|m: &mut Mirrors| {
      E::mirror_mut(m).finish_write(None);
      Some(write_crashed("save", E::COLLECTION))
    });
    let store = self.store.clone();
    self.spawn(on_panic, async move {
      let result = store.upsert(draft).await;
      Box::new(move |m: &mut Mirrors| {
        let mirror = E::mirror_mut(m);
        match result {
          Ok(record) => {
            tracing::info!(collection = %E::COLLECTION, id = %record.id, "saved singleton");
            mirror.finish_write(Some(record));
            Some(Notice::success(format!("Saved {}", E::COLLECTION.label())))
          }
          Err(e) => {
            mirror.finish_write(None);
            Some(write_failed("save", E::COLLECTION, &e))
          }
        }
      }) as Apply
    });
    Ok(())
  }

  /// Hard-delete a record. A not-found answer means it is already gone, so
  /// it is dropped from the mirror with an informational notice.
  pub fn delete<E: Mirrored>(&mut self, id: RecordId) -> Result<(), SubmitError> {
    E::mirror_mut(&mut self.mirrors).begin_write(&id)?;

    let pending = id.clone();
    let on_panic: Apply = Box::new(move |m: &mut Mirrors| {
      E::mirror_mut(m).finish_write(&pending);
      Some(write_crashed("delete from", E::COLLECTION))
    });
    let store = self.store.clone();
    self.spawn(on_panic, async move {
      let result = store.delete::<E>(id.clone()).await;
      Box::new(move |m: &mut Mirrors| {
        let mirror = E::mirror_mut(m);
        mirror.finish_write(&id);
        match result {
          Ok(()) => {
            tracing::info!(collection = %E::COLLECTION, %id, "deleted record");
            mirror.remove(&id);
            Some(Notice::success(format!("Deleted from {}", E::COLLECTION.label())))
          }
          Err(e) if e.kind() == FailureKind::NotFound => {
            tracing::info!(collection = %E::COLLECTION, %id, "record was already gone");
            mirror.remove(&id);
            Some(Notice::info(format!(
              "That {} record was already removed",
              E::COLLECTION.label()
            )))
          }
          Err(e) => Some(write_failed("delete from", E::COLLECTION, &e)),
        }
      }) as Apply
    });
    Ok(())
  }

  /// Soft-delete or restore a record by flipping `is_active`.
  pub fn set_active<E: Mirrored>(&mut self, id: RecordId, active: bool) -> Result<(), SubmitError> {
    let mirror = E::mirror(&self.mirrors);
    let Some(record) = mirror.get(&id) else {
      return Err(SubmitError::UnknownRecord { collection: E::COLLECTION, id });
    };
    let mut draft = record.data.clone();
    draft.set_active(active);
    self.save(id, draft)
  }

  // ── Runtime-typed entry points ────────────────────────────────────────────

  /// Build and submit a form to whatever its target is.
  pub fn submit(&mut self, form: &Form) -> Result<(), SubmitError> {
    let collection = form.collection();
    dispatch!(collection,
      list E => {
        let draft = form.build::<E>()?;
        match form.target() {
          Target::New => self.add(draft),
          Target::Existing(id) => self.save(id.clone(), draft),
          Target::Singleton => Err(SubmitError::WrongTarget(collection)),
        }
      },
      singleton T => match form.target() {
        Target::Singleton => self.save_singleton(form.build::<T>()?),
        _ => Err(SubmitError::WrongTarget(collection)),
      },
    )
  }

  /// A form for editing `id`, or the singleton (blank if never saved).
  pub fn edit_form(&self, collection: Collection, id: Option<&RecordId>) -> Option<Form> {
    if collection.is_singleton() {
      let row = self.view(collection).rows().into_iter().next();
      return Some(match row {
        Some(row) => {
          let json = self.view(collection).record_json(&row.id)?;
          Form::for_record(collection, row.id, &json)
        }
        None => Form::blank(collection),
      });
    }
    let id = id?;
    let json = self.view(collection).record_json(id)?;
    Some(Form::for_record(collection, id.clone(), &json))
  }

  pub fn delete_in(&mut self, collection: Collection, id: RecordId) -> Result<(), SubmitError> {
    dispatch!(collection,
      list E => self.delete::<E>(id),
      singleton T => Err(SubmitError::WrongTarget(collection)),
    )
  }

  /// Flip the active flag of `id`.
  pub fn toggle_active(&mut self, collection: Collection, id: RecordId) -> Result<(), SubmitError> {
    dispatch!(collection,
      list E => {
        let active = E::mirror(&self.mirrors).get(&id).map(|r| r.data.is_active());
        match active {
          Some(active) => self.set_active::<E>(id, !active),
          None => Err(SubmitError::UnknownRecord { collection, id }),
        }
      },
      singleton T => Err(SubmitError::WrongTarget(collection)),
    )
  }
}

fn write_failed<E: Classify + std::fmt::Display>(
  action: &str,
  collection: Collection,
  e: &E,
) -> Notice {
  tracing::warn!(%collection, error = %e, "could not {action}");
  let hint = match e.kind() {
    FailureKind::Validation => "the store rejected the data",
    FailureKind::NotFound => "the record no longer exists",
    FailureKind::Unavailable => "the store is unreachable",
  };
  Notice::error(format!("Could not {action} {}: {hint} ({e})", collection.label()))
}

/// Stands in for the result of a store call that panicked.
fn crashed() -> Failure {
  Failure { kind: FailureKind::Unavailable, message: "the store call crashed".into() }
}

fn write_crashed(action: &str, collection: Collection) -> Notice {
  Notice::error(format!("Could not {action} {}: the store call crashed", collection.label()))
}

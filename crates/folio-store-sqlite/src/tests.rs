//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use folio_core::{
  Classify, FailureKind, Listed, RecordId,
  content::{About, Profile, Project, Skill, SocialLink},
  store::ContentStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn project(name: &str, order: u32) -> Project {
  Project {
    name: name.into(),
    description: "d".into(),
    github_url: "https://github.com/someone/repo".into(),
    display_order: order,
    ..Project::default()
  }
}

fn skill(name: &str, order: u32) -> Skill {
  Skill {
    name: name.into(),
    proficiency_level: 80,
    display_order: order,
    ..Skill::default()
  }
}

// ─── Lists ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_sorted_by_display_order_ties_by_insertion() {
  let s = store().await;
  s.insert(skill("c", 2)).await.unwrap();
  s.insert(skill("a", 1)).await.unwrap();
  s.insert(skill("b", 1)).await.unwrap();
  s.insert(skill("z", 0)).await.unwrap();

  let names: Vec<_> = s
    .list_all::<Skill>()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.data.name)
    .collect();
  assert_eq!(names, vec!["z", "a", "b", "c"]);
}

#[tokio::test]
async fn inserted_ids_are_distinct_and_retrievable() {
  let s = store().await;
  let mut ids = HashSet::new();
  for i in 0..5 {
    let created = s.insert(project(&format!("p{i}"), i)).await.unwrap();
    assert!(ids.insert(created.id.clone()));

    let listed = s.list_all::<Project>().await.unwrap();
    assert!(listed.iter().any(|r| r.id == created.id));
  }
}

#[tokio::test]
async fn collections_do_not_leak_into_each_other() {
  let s = store().await;
  s.insert(project("p", 0)).await.unwrap();
  assert!(s.list_all::<Skill>().await.unwrap().is_empty());
  assert!(s.list_all::<SocialLink>().await.unwrap().is_empty());
}

#[tokio::test]
async fn hidden_records_are_only_listed_on_request() {
  let s = store().await;
  s.insert(project("shown", 0)).await.unwrap();
  let mut hidden = project("hidden", 1);
  hidden.set_active(false);
  s.insert(hidden).await.unwrap();

  let active = s.list_all::<Project>().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].data.name, "shown");

  let all = s.list::<Project>(true).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn project_scenario_insert_then_delete() {
  let s = store().await;
  let created = s
    .insert(Project {
      name: "X".into(),
      description: "d".into(),
      github_url: "https://github.com/x/x".into(),
      technologies: vec!["Go".into()],
      stars: 0,
      forks: 0,
      ..Project::default()
    })
    .await
    .unwrap();

  let listed = s.list_all::<Project>().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].data.name, "X");
  assert_eq!(listed[0].data.technologies, vec!["Go"]);

  s.delete::<Project>(created.id.clone()).await.unwrap();
  let listed = s.list_all::<Project>().await.unwrap();
  assert!(listed.iter().all(|r| r.id != created.id));
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_rejects_missing_required_field() {
  let s = store().await;
  let err = s.insert(project("", 0)).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::Validation);
  assert!(s.list::<Project>(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_keeps_created_at_and_refreshes_payload() {
  let s = store().await;
  let created = s.insert(project("before", 3)).await.unwrap();

  let updated = s
    .update(created.id.clone(), project("after", 0))
    .await
    .unwrap();
  assert_eq!(updated.id, created.id);
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);

  let listed = s.list_all::<Project>().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].data.name, "after");
  assert_eq!(listed[0].data.display_order, 0);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
  let s = store().await;
  let err = s
    .update(RecordId::from("nope"), project("x", 0))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn update_is_scoped_to_the_entity_collection() {
  let s = store().await;
  let created = s.insert(project("p", 0)).await.unwrap();
  let err = s.update(created.id, skill("s", 0)).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
  let s = store().await;
  let created = s.insert(project("p", 0)).await.unwrap();
  s.delete::<Project>(created.id.clone()).await.unwrap();

  let err = s.delete::<Project>(created.id).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);
}

// ─── Singletons ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn singleton_absent_is_none() {
  let s = store().await;
  assert!(s.get_singleton::<Profile>().await.unwrap().is_none());
}

#[tokio::test]
async fn two_upserts_leave_one_row_with_second_payload() {
  let s = store().await;
  let first = s
    .upsert(Profile { name: "Ana".into(), role: "Dev".into(), ..Profile::default() })
    .await
    .unwrap();
  let second = s
    .upsert(Profile { name: "Ana B".into(), role: "Lead".into(), ..Profile::default() })
    .await
    .unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(first.created_at, second.created_at);

  let stored = s.get_singleton::<Profile>().await.unwrap().unwrap();
  assert_eq!(stored.id, first.id);
  assert_eq!(stored.data.name, "Ana B");
  assert_eq!(stored.data.role, "Lead");
}

#[tokio::test]
async fn singletons_are_independent() {
  let s = store().await;
  s.upsert(Profile { name: "Ana".into(), role: "Dev".into(), ..Profile::default() })
    .await
    .unwrap();
  assert!(s.get_singleton::<About>().await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_validates_ranges() {
  let s = store().await;
  let about = About {
    personal_story: "story".into(),
    support_experience: "support".into(),
    professional_goal: "goal".into(),
    satisfaction_rate: 101,
    ..About::default()
  };
  let err = s.upsert(about).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::Validation);
  assert!(s.get_singleton::<About>().await.unwrap().is_none());
}

#[tokio::test]
async fn singleton_update_by_id() {
  let s = store().await;
  let created = s
    .upsert(Profile { name: "Ana".into(), role: "Dev".into(), ..Profile::default() })
    .await
    .unwrap();
  let updated = s
    .update(
      created.id.clone(),
      Profile { name: "Ana".into(), role: "CTO".into(), ..Profile::default() },
    )
    .await
    .unwrap();
  assert_eq!(updated.id, created.id);
  let stored = s.get_singleton::<Profile>().await.unwrap().unwrap();
  assert_eq!(stored.data.role, "CTO");
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("folio.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(project("kept", 0)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let listed = s.list_all::<Project>().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].data.name, "kept");
}

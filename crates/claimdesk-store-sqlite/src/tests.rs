//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use claimdesk_core::{
  claim::{ClaimQuery, ClaimStatus, ClaimUpdate, NewClaim},
  report::{NewRtiRequest, NewValidationReport},
  store::ClaimStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> i64 {
  s.create_user(name.into(), "$argon2id$fake".into())
    .await
    .unwrap()
    .expect("fresh username")
    .id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn new_claim(title: &str, category: &str, published: NaiveDate) -> NewClaim {
  NewClaim {
    claim_title:    title.into(),
    description:    format!("{title} description"),
    published_url:  "http://x".into(),
    category:       category.into(),
    status:         ClaimStatus::Opened,
    date_published: published,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;
  let created = s
    .create_user("alice".into(), "hash".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(created.username, "alice");

  let found = s.find_user("alice".into()).await.unwrap().unwrap();
  assert_eq!(found.id, created.id);
  assert_eq!(found.password_hash, "hash");
}

#[tokio::test]
async fn duplicate_username_returns_none() {
  let s = store().await;
  user(&s, "alice").await;
  let again = s.create_user("alice".into(), "other".into()).await.unwrap();
  assert!(again.is_none());
}

#[tokio::test]
async fn find_missing_user_returns_none() {
  let s = store().await;
  assert!(s.find_user("nobody".into()).await.unwrap().is_none());
}

// ─── Claim numbers ───────────────────────────────────────────────────────────

#[tokio::test]
async fn claim_numbers_are_sequential_per_prefix() {
  let s = store().await;
  let uid = user(&s, "alice").await;

  let a = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let b = s.create_claim(new_claim("B", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let c = s.create_claim(new_claim("C", "political", date(2024, 1, 1)), uid).await.unwrap();

  assert_eq!(a.claim_nb_tx.to_string(), "RES-00001");
  assert_eq!(b.claim_nb_tx.to_string(), "RES-00002");
  assert_eq!(c.claim_nb_tx.to_string(), "POL-00001");
}

#[tokio::test]
async fn next_number_is_a_pure_read() {
  let s = store().await;
  let uid = user(&s, "alice").await;

  let first = s.next_claim_number("Research".into()).await.unwrap();
  let again = s.next_claim_number("Research".into()).await.unwrap();
  assert_eq!(first, again);
  assert_eq!(first.to_string(), "RES-00001");

  let created = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();
  assert_eq!(created.claim_nb_tx, first);

  let next = s.next_claim_number("research".into()).await.unwrap();
  assert_eq!(next.sequence(), first.sequence() + 1);
}

#[tokio::test]
async fn deleted_numbers_are_not_reused() {
  let s = store().await;
  let uid = user(&s, "alice").await;

  s.create_claim(new_claim("A", "Health", date(2024, 1, 1)), uid).await.unwrap();
  let b = s.create_claim(new_claim("B", "Health", date(2024, 1, 1)), uid).await.unwrap();
  assert!(s.delete_claim(b.id).await.unwrap());

  let c = s.create_claim(new_claim("C", "Health", date(2024, 1, 1)), uid).await.unwrap();
  assert_eq!(c.claim_nb_tx.to_string(), "HEA-00003");
}

#[tokio::test]
async fn exhausted_prefix_is_an_error() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO claim_sequences (prefix, last_value) VALUES ('RES', 99999)",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let result = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await;
  assert!(matches!(
    result,
    Err(Error::Core(claimdesk_core::Error::SequenceExhausted(p))) if p == "RES"
  ));
  let listed = s.list_claims(&ClaimQuery::default()).await.unwrap();
  assert!(listed.is_empty());
}

#[tokio::test]
async fn concurrent_creates_never_collide() {
  let s = store().await;
  let uid = user(&s, "alice").await;

  let mut handles = Vec::new();
  for i in 0..16 {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      s.create_claim(new_claim(&format!("T{i}"), "Technology", date(2024, 1, 1)), uid)
        .await
        .unwrap()
        .claim_nb_tx
        .sequence()
    }));
  }

  let mut seqs = Vec::new();
  for h in handles {
    seqs.push(h.await.unwrap());
  }
  seqs.sort_unstable();
  assert_eq!(seqs, (1..=16).collect::<Vec<u32>>());
}

// ─── Claim CRUD ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_claim_round_trips() {
  let s = store().await;
  let uid = user(&s, "alice").await;

  let created = s
    .create_claim(new_claim("Test", "Research", date(2024, 1, 1)), uid)
    .await
    .unwrap();
  let fetched = s.get_claim(created.id).await.unwrap().unwrap();

  assert_eq!(fetched, created);
  assert_eq!(fetched.claim_title, "Test");
  assert_eq!(fetched.description, "Test description");
  assert_eq!(fetched.published_url, "http://x");
  assert_eq!(fetched.category, "Research");
  assert_eq!(fetched.status, ClaimStatus::Opened);
  assert_eq!(fetched.date_published, date(2024, 1, 1));
  assert_eq!(fetched.created_by_username, "alice");
  assert!(fetched.updated_at.is_none());
}

#[tokio::test]
async fn get_missing_claim_returns_none() {
  let s = store().await;
  assert!(s.get_claim(42).await.unwrap().is_none());
}

#[tokio::test]
async fn update_only_status_keeps_other_fields() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let claim = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();

  s.update_claim(claim.id, ClaimUpdate {
    comments: Some("first look".into()),
    ..Default::default()
  })
  .await
  .unwrap()
  .unwrap();

  let updated = s
    .update_claim(claim.id, ClaimUpdate {
      status: Some(ClaimStatus::Closed),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.status, ClaimStatus::Closed);
  assert_eq!(updated.description, claim.description);
  assert_eq!(updated.comments.as_deref(), Some("first look"));
  assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn update_missing_claim_returns_none() {
  let s = store().await;
  let result = s
    .update_claim(99, ClaimUpdate {
      status: Some(ClaimStatus::Closed),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_cascades_reports_and_requests() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let claim = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();

  s.record_validation(NewValidationReport {
    claim_id:     claim.id,
    validator_id: uid,
    full_report:  "report".into(),
    conclusion:   "conclusion".into(),
  })
  .await
  .unwrap();
  s.record_rti_request(NewRtiRequest {
    claim_id:     claim.id,
    validator_id: uid,
    request_text: "dear officer".into(),
  })
  .await
  .unwrap();

  assert!(s.delete_claim(claim.id).await.unwrap());
  assert!(s.get_claim(claim.id).await.unwrap().is_none());
  assert!(s.list_validations(claim.id).await.unwrap().is_empty());
  assert!(s.list_rti_requests(claim.id).await.unwrap().is_empty());
  assert!(!s.delete_claim(claim.id).await.unwrap());
}

// ─── Listing & stats ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  for title in ["first", "second", "third"] {
    s.create_claim(new_claim(title, "Research", date(2024, 1, 1)), uid).await.unwrap();
  }

  let all = s.list_claims(&ClaimQuery::default()).await.unwrap();
  let titles: Vec<&str> = all.iter().map(|c| c.claim_title.as_str()).collect();
  assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn list_filters_combine() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let bridge = s
    .create_claim(new_claim("Bridge repaired", "Infrastructure", date(2024, 3, 10)), uid)
    .await
    .unwrap();
  s.create_claim(new_claim("Clinic opened", "Health", date(2024, 5, 1)), uid).await.unwrap();
  let budget = s
    .create_claim(new_claim("Budget doubled", "Health", date(2023, 12, 31)), uid)
    .await
    .unwrap();
  s.update_claim(budget.id, ClaimUpdate {
    status: Some(ClaimStatus::Closed),
    ..Default::default()
  })
  .await
  .unwrap();

  let by_title = s
    .list_claims(&ClaimQuery { search: Some("BRIDGE".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_title.len(), 1);
  assert_eq!(by_title[0].id, bridge.id);

  let by_number = s
    .list_claims(&ClaimQuery { search: Some("hea-0000".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_number.len(), 2);

  let by_category = s
    .list_claims(&ClaimQuery { category: Some("Health".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_category.len(), 2);

  let closed_health = s
    .list_claims(&ClaimQuery {
      category: Some("Health".into()),
      status: Some(ClaimStatus::Closed),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(closed_health.len(), 1);
  assert_eq!(closed_health[0].id, budget.id);

  let in_2024 = s
    .list_claims(&ClaimQuery {
      date_from: Some(date(2024, 1, 1)),
      date_to: Some(date(2024, 3, 10)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(in_2024.len(), 1);
  assert_eq!(in_2024[0].id, bridge.id);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  s.create_claim(new_claim("Prices up 50%", "Economy", date(2024, 1, 1)), uid).await.unwrap();
  s.create_claim(new_claim("Prices up 500", "Economy", date(2024, 1, 1)), uid).await.unwrap();

  let hits = s
    .list_claims(&ClaimQuery { search: Some("50%".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].claim_title, "Prices up 50%");
}

#[tokio::test]
async fn stats_count_closed_as_completed() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let a = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();
  s.create_claim(new_claim("B", "Research", date(2024, 1, 1)), uid).await.unwrap();
  s.create_claim(new_claim("C", "Research", date(2024, 1, 1)), uid).await.unwrap();
  s.update_claim(a.id, ClaimUpdate {
    status: Some(ClaimStatus::Closed),
    ..Default::default()
  })
  .await
  .unwrap();

  let stats = s.claim_stats().await.unwrap();
  assert_eq!(stats.total, 3);
  assert_eq!(stats.active, 2);
  assert_eq!(stats.completed, 1);
}

#[tokio::test]
async fn stats_on_empty_store_are_zero() {
  let s = store().await;
  let stats = s.claim_stats().await.unwrap();
  assert_eq!((stats.total, stats.active, stats.completed), (0, 0, 0));
}

// ─── Validation reports ──────────────────────────────────────────────────────

#[tokio::test]
async fn record_validation_sets_claim_status() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let claim = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), alice).await.unwrap();

  let report = s
    .record_validation(NewValidationReport {
      claim_id:     claim.id,
      validator_id: bob,
      full_report:  "full".into(),
      conclusion:   "short".into(),
    })
    .await
    .unwrap();

  assert_eq!(report.validator_username, "bob");
  assert_eq!(report.status, "REPORT_GENERATED");
  assert_eq!(report.ai_generated_full_report, "full");
  assert_eq!(report.ai_generated_conclusion, "short");

  let claim = s.get_claim(claim.id).await.unwrap().unwrap();
  assert_eq!(claim.status, ClaimStatus::ValidationReportCreated);
}

#[tokio::test]
async fn validations_list_newest_first_and_scope_to_claim() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let a = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let b = s.create_claim(new_claim("B", "Research", date(2024, 1, 1)), uid).await.unwrap();

  for text in ["one", "two"] {
    s.record_validation(NewValidationReport {
      claim_id:     a.id,
      validator_id: uid,
      full_report:  text.into(),
      conclusion:   text.into(),
    })
    .await
    .unwrap();
  }

  let listed = s.list_validations(a.id).await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].ai_generated_full_report, "two");

  let report_id = listed[0].id;
  assert!(s.get_validation(a.id, report_id).await.unwrap().is_some());
  assert!(s.get_validation(b.id, report_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_validation_only_matches_its_claim() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let a = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let b = s.create_claim(new_claim("B", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let report = s
    .record_validation(NewValidationReport {
      claim_id:     a.id,
      validator_id: uid,
      full_report:  "r".into(),
      conclusion:   "c".into(),
    })
    .await
    .unwrap();

  assert!(!s.delete_validation(b.id, report.id).await.unwrap());
  assert!(s.delete_validation(a.id, report.id).await.unwrap());
  assert!(s.list_validations(a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn validation_for_missing_claim_is_rejected() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let result = s
    .record_validation(NewValidationReport {
      claim_id:     404,
      validator_id: uid,
      full_report:  "r".into(),
      conclusion:   "c".into(),
    })
    .await;
  assert!(matches!(result, Err(Error::Database(_))));
}

// ─── RTI requests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_rti_request_sets_claim_status() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let claim = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();

  let request = s
    .record_rti_request(NewRtiRequest {
      claim_id:     claim.id,
      validator_id: uid,
      request_text: "Subject: request".into(),
    })
    .await
    .unwrap();
  assert_eq!(request.status, "GENERATED");
  assert_eq!(request.validator_username, "alice");

  let claim = s.get_claim(claim.id).await.unwrap().unwrap();
  assert_eq!(claim.status, ClaimStatus::RtiRequestCreated);

  let listed = s.list_rti_requests(claim.id).await.unwrap();
  assert_eq!(listed, vec![request.clone()]);
  assert_eq!(s.get_rti_request(claim.id, request.id).await.unwrap(), Some(request));
}

#[tokio::test]
async fn rti_request_lookup_requires_matching_claim() {
  let s = store().await;
  let uid = user(&s, "alice").await;
  let a = s.create_claim(new_claim("A", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let b = s.create_claim(new_claim("B", "Research", date(2024, 1, 1)), uid).await.unwrap();
  let request = s
    .record_rti_request(NewRtiRequest {
      claim_id:     a.id,
      validator_id: uid,
      request_text: "text".into(),
    })
    .await
    .unwrap();

  assert!(s.get_rti_request(b.id, request.id).await.unwrap().is_none());
}

#[tokio::test]
async fn open_creates_parent_directory() {
  let dir = std::env::temp_dir().join(format!("claimdesk-store-{}", std::process::id()));
  let path = dir.join("nested").join("claims.sqlite");
  let s = SqliteStore::open(&path).await.unwrap();
  user(&s, "alice").await;
  s.close().await.unwrap();
  assert!(path.exists());
  let _ = std::fs::remove_dir_all(&dir);
}

//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Setup test database:
//!   docker-compose -f docker-compose.test.yml up -d test-db
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `canvass_test`)
//!   `TEST_DB_PASSWORD` (default: `canvass_test`)
//!   `TEST_DB_NAME` (default: `canvass_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use canvass_db::entities::{form, section, section::SectionKind, stat, user};
use canvass_db::repositories::{
    FormRepository, SectionRepository, StatRepository, UserRepository,
};
use canvass_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{DatabaseConnection, Set};
use serde_json::json;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique().await.expect("create failed");
    db.migrate().await.expect("migrations failed");
    db.drop_database().await.expect("drop failed");
}

/// Seed an owner, a form, and one radio section; returns their ids.
async fn seed_form(db: &Arc<DatabaseConnection>, suffix: &str) -> (String, String, String) {
    let user_repo = UserRepository::new(Arc::clone(db));
    let form_repo = FormRepository::new(Arc::clone(db));

    let user_id = format!("user_{suffix}");
    let form_id = format!("form_{suffix}");
    let section_id = format!("section_{suffix}");

    user_repo
        .create(user::ActiveModel {
            id: Set(user_id.clone()),
            email: Set(format!("owner_{suffix}@example.com")),
            password_hash: Set("$argon2id$test".to_string()),
            created_at: Set(chrono::Utc::now().into()),
        })
        .await
        .expect("user create failed");

    form_repo
        .create_with_sections(
            form::ActiveModel {
                id: Set(form_id.clone()),
                title: Set("Customer Feedback".to_string()),
                description: Set("We value your feedback".to_string()),
                user_id: Set(user_id.clone()),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            },
            vec![section::ActiveModel {
                id: Set(section_id.clone()),
                form_id: Set(form_id.clone()),
                title: Set("Rate our service".to_string()),
                kind: Set(SectionKind::RadioBox),
                is_required: Set(true),
                options: Set(json!(["Excellent", "Good", "Poor"])),
                position: Set(0),
            }],
        )
        .await
        .expect("form create failed");

    (user_id, form_id, section_id)
}

fn count_for(stats: &[stat::Model], section_id: &str, value: &str) -> i64 {
    stats
        .iter()
        .find(|s| s.section_id == section_id && s.option_value == value)
        .map_or(0, |s| s.count)
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_submission_increments_counters() {
    let test_db = TestDatabase::create_unique().await.expect("create failed");
    test_db.migrate().await.expect("migrations failed");
    let db = test_db.conn.clone();

    let (_, form_id, section_id) = seed_form(&db, "inc").await;
    let stat_repo = StatRepository::new(Arc::clone(&db));

    for _ in 0..3 {
        stat_repo
            .record_selections(&form_id, &[(section_id.clone(), vec!["Good".to_string()])])
            .await
            .expect("record failed");
    }
    stat_repo
        .record_selections(&form_id, &[(section_id.clone(), vec!["Poor".to_string()])])
        .await
        .expect("record failed");

    let stats = stat_repo.find_by_form(&form_id).await.expect("find failed");
    assert_eq!(count_for(&stats, &section_id, "Good"), 3);
    assert_eq!(count_for(&stats, &section_id, "Poor"), 1);
    // "Excellent" was never selected, so no row exists yet.
    assert!(
        stats
            .iter()
            .all(|s| s.option_value != "Excellent"),
        "unselected option must not have a row"
    );

    test_db.drop_database().await.expect("drop failed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_submissions_lose_no_increment() {
    let test_db = TestDatabase::create_unique().await.expect("create failed");
    test_db.migrate().await.expect("migrations failed");
    let db = test_db.conn.clone();

    let (_, form_id, section_id) = seed_form(&db, "conc").await;
    let stat_repo = StatRepository::new(Arc::clone(&db));

    const SUBMISSIONS: usize = 32;
    let mut handles = Vec::with_capacity(SUBMISSIONS);
    for _ in 0..SUBMISSIONS {
        let repo = stat_repo.clone();
        let form_id = form_id.clone();
        let section_id = section_id.clone();
        handles.push(tokio::spawn(async move {
            repo.record_selections(&form_id, &[(section_id, vec!["Good".to_string()])])
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked").expect("record failed");
    }

    let stats = stat_repo.find_by_form(&form_id).await.expect("find failed");
    assert_eq!(
        count_for(&stats, &section_id, "Good"),
        SUBMISSIONS as i64,
        "every concurrent submission must land exactly once"
    );
    // The first-vote race must not have produced duplicate rows.
    let rows = stats
        .iter()
        .filter(|s| s.section_id == section_id && s.option_value == "Good")
        .count();
    assert_eq!(rows, 1);

    test_db.drop_database().await.expect("drop failed");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_section_replacement_keeps_orphans_until_purge() {
    let test_db = TestDatabase::create_unique().await.expect("create failed");
    test_db.migrate().await.expect("migrations failed");
    let db = test_db.conn.clone();

    let (_, form_id, old_section_id) = seed_form(&db, "orph").await;
    let form_repo = FormRepository::new(Arc::clone(&db));
    let stat_repo = StatRepository::new(Arc::clone(&db));

    stat_repo
        .record_selections(
            &form_id,
            &[(old_section_id.clone(), vec!["Good".to_string()])],
        )
        .await
        .expect("record failed");

    // Swap the section set; the old section's counters stay behind.
    let existing = form_repo.get_by_id(&form_id).await.expect("form missing");
    let mut active: form::ActiveModel = existing.into();
    active.updated_at = Set(Some(chrono::Utc::now().into()));

    let new_section_id = "section_orph_v2".to_string();
    form_repo
        .update_with_sections(
            active,
            &form_id,
            vec![section::ActiveModel {
                id: Set(new_section_id.clone()),
                form_id: Set(form_id.clone()),
                title: Set("Would you recommend us?".to_string()),
                kind: Set(SectionKind::RadioBox),
                is_required: Set(true),
                options: Set(json!(["Yes", "No"])),
                position: Set(0),
            }],
        )
        .await
        .expect("replace failed");

    let stats = stat_repo.find_by_form(&form_id).await.expect("find failed");
    assert_eq!(count_for(&stats, &old_section_id, "Good"), 1);

    let purged = stat_repo
        .delete_orphaned(&form_id, std::slice::from_ref(&new_section_id))
        .await
        .expect("purge failed");
    assert_eq!(purged, 1);

    let stats = stat_repo.find_by_form(&form_id).await.expect("find failed");
    assert!(stats.is_empty());

    test_db.drop_database().await.expect("drop failed");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_counters_are_isolated_per_form() {
    let test_db = TestDatabase::create_unique().await.expect("create failed");
    test_db.migrate().await.expect("migrations failed");
    let db = test_db.conn.clone();

    let (_, form_a, section_a) = seed_form(&db, "iso_a").await;
    let (_, form_b, section_b) = seed_form(&db, "iso_b").await;
    let stat_repo = StatRepository::new(Arc::clone(&db));

    stat_repo
        .record_selections(&form_a, &[(section_a.clone(), vec!["Good".to_string()])])
        .await
        .expect("record failed");
    stat_repo
        .record_selections(&form_b, &[(section_b.clone(), vec!["Good".to_string()])])
        .await
        .expect("record failed");
    stat_repo
        .record_selections(&form_b, &[(section_b.clone(), vec!["Good".to_string()])])
        .await
        .expect("record failed");

    let stats_a = stat_repo.find_by_form(&form_a).await.expect("find failed");
    let stats_b = stat_repo.find_by_form(&form_b).await.expect("find failed");
    assert_eq!(count_for(&stats_a, &section_a, "Good"), 1);
    assert_eq!(count_for(&stats_b, &section_b, "Good"), 2);

    test_db.drop_database().await.expect("drop failed");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_deleting_form_cascades_sections_and_stats() {
    let test_db = TestDatabase::create_unique().await.expect("create failed");
    test_db.migrate().await.expect("migrations failed");
    let db = test_db.conn.clone();

    let (user_id, form_id, section_id) = seed_form(&db, "casc").await;
    let user_repo = UserRepository::new(Arc::clone(&db));
    let section_repo = SectionRepository::new(Arc::clone(&db));
    let stat_repo = StatRepository::new(Arc::clone(&db));

    stat_repo
        .record_selections(&form_id, &[(section_id, vec!["Good".to_string()])])
        .await
        .expect("record failed");

    // Deleting the owner cascades through form, sections and stats.
    let deleted = user_repo.delete(&user_id).await.expect("delete failed");
    assert!(deleted);

    let sections = section_repo
        .find_by_form(&form_id)
        .await
        .expect("find failed");
    assert!(sections.is_empty());
    let stats = stat_repo.find_by_form(&form_id).await.expect("find failed");
    assert!(stats.is_empty());

    test_db.drop_database().await.expect("drop failed");
}

//! Runs against a real Postgres when DATABASE_URL is set; each test returns
//! early otherwise. Tests share one table, so every test works on its own
//! national ids and never assumes the table is empty.
mod common;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use student_api::config::{AppConfig, Environment};
use student_api::database::models::StudentPayload;
use student_api::database::DatabaseManager;
use student_api::state::AppState;
use student_api::{PgStudentStore, StudentStore};

async fn pg_store() -> Result<Option<PgStudentStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return Ok(None);
    };

    let mut config = AppConfig::for_environment(Environment::Development);
    config.database.url = Some(url);
    config.database.max_connections = 2;
    config.database.run_migrations = true;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to DATABASE_URL")?;
    Ok(Some(PgStudentStore::new(pool)))
}

/// An 11-digit national id no other test in this run will use.
fn fresh_national_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let n = nanos.wrapping_add(COUNTER.fetch_add(1, Ordering::Relaxed));
    format!("{:011}", n % 100_000_000_000)
}

fn payload(name: &str, national_id: &str) -> StudentPayload {
    StudentPayload::new(name, national_id, "123456789")
}

#[tokio::test]
async fn insert_then_find_by_id_round_trips() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let nid = fresh_national_id();

    let created = store.insert(payload("Pg Student", &nid)).await?;
    assert!(created.id > 0);
    assert!(created.deleted_at.is_none());

    let fetched = store.find_by_id(created.id).await?.context("row missing")?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn soft_delete_hides_row_from_every_read() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let nid = fresh_national_id();
    let created = store.insert(payload("Soon Deleted", &nid)).await?;

    assert!(store.soft_delete(created.id).await?);

    assert!(store.find_by_id(created.id).await?.is_none());
    assert!(store.find_by_national_id(&nid).await?.is_none());
    let listed = store.list().await?;
    assert!(listed.iter().all(|s| s.id != created.id));

    // already deleted rows are not live, so a second delete finds nothing
    assert!(!store.soft_delete(created.id).await?);
    assert!(store.update(created.id, payload("Revived", &nid)).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn national_id_lookup_picks_lowest_live_id() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let nid = fresh_national_id();

    let first = store.insert(payload("First", &nid)).await?;
    let second = store.insert(payload("Second", &nid)).await?;
    assert!(second.id > first.id);

    let found = store.find_by_national_id(&nid).await?.context("no match")?;
    assert_eq!(found.id, first.id);

    store.soft_delete(first.id).await?;
    let found = store.find_by_national_id(&nid).await?.context("no match")?;
    assert_eq!(found.id, second.id);
    Ok(())
}

#[tokio::test]
async fn update_overwrites_every_field() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let created = store.insert(payload("Before", &fresh_national_id())).await?;

    let nid = fresh_national_id();
    let updated = store
        .update(created.id, StudentPayload::new("After", &nid, "987654321"))
        .await?
        .context("live row not updated")?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.national_id, nid);
    assert_eq!(updated.registration_id, "987654321");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = store.find_by_id(created.id).await?.context("row missing")?;
    assert_eq!(fetched, updated);

    assert!(store.update(i64::MAX, payload("Nobody", &nid)).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn http_lifecycle_over_postgres() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let server = common::TestServer::spawn_with(AppState::new(store)).await?;
    let client = reqwest::Client::new();
    let nid = fresh_national_id();

    let body = json!({
        "name": "Http Student",
        "national_id": nid,
        "registration_id": "123456789"
    });
    let res = client.post(server.url("/students")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_i64().context("generated id")?;

    let res = client.get(server.url(&format!("/students/nationalid/{}", nid))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["id"], id);

    let res = client.delete(server.url(&format!("/students/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url(&format!("/students/id/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

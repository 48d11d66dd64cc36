use std::time::Duration;

use authproxy_core::archiver::Archiver;
use authproxy_core::models::Session;
use authproxy_storage::{Store, SESSIONS};
use chrono::{TimeZone, Utc};

async fn store(dir: &std::path::Path, name: &str) -> Store {
    Store::open(dir.join(name), Duration::from_secs(5)).await.expect("open store")
}

fn session(token: &str, valid_to: chrono::DateTime<Utc>) -> Session {
    Session {
        token: token.to_owned(),
        created: Utc::now(),
        valid_to,
        owner_token: None,
        agent: None,
        policies: Some(Vec::new()),
        payload: None,
    }
}

#[tokio::test]
async fn a_sweep_moves_expired_sessions_into_the_archive_and_leaves_live_ones_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let live = store(dir.path(), "live.db").await;
    let archive = store(dir.path(), "archive.db").await;

    let expired = session("expired-token", Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single().expect("valid date"));
    let still_live = session("live-token", Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).single().expect("valid date"));

    let encode = |s: &Session| serde_json::to_string(s).expect("encode");
    live.put(SESSIONS, &expired.token, &encode(&expired)).await.expect("seed expired");
    live.put(SESSIONS, &still_live.token, &encode(&still_live)).await.expect("seed live");

    let archiver = Archiver::new(live.clone(), archive.clone());
    let archived_count = archiver.sweep_once().await.expect("sweep");
    assert_eq!(archived_count, 1);

    assert!(live.get(SESSIONS, "expired-token").await.expect("get").is_none());
    assert!(live.get(SESSIONS, "live-token").await.expect("get").is_some());

    let archived_raw = archive.get(SESSIONS, "expired-token").await.expect("get").expect("archived session present");
    let archived: Session = serde_json::from_str(&archived_raw).expect("decode archived session");
    assert_eq!(archived.token, "expired-token");

    assert!(archive.get(SESSIONS, "live-token").await.expect("get").is_none());
}

#[tokio::test]
async fn a_sweep_with_nothing_expired_archives_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let live = store(dir.path(), "live.db").await;
    let archive = store(dir.path(), "archive.db").await;

    let still_live = session("live-token", Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).single().expect("valid date"));
    live.put(SESSIONS, &still_live.token, &serde_json::to_string(&still_live).expect("encode"))
        .await
        .expect("seed live");

    let archiver = Archiver::new(live.clone(), archive);
    let archived_count = archiver.sweep_once().await.expect("sweep");
    assert_eq!(archived_count, 0);
    assert!(live.get(SESSIONS, "live-token").await.expect("get").is_some());
}

use std::time::Duration;

use authproxy_core::models::{Permission, Policy, Resource, Session};
use authproxy_core::repository::{PoliciesRepository, ResourcesRepository, SessionsRepository};
use authproxy_core::AuthEngine;
use authproxy_storage::Store;
use chrono::{TimeZone, Utc};

struct Harness {
    _dir: tempfile::TempDir,
    resources: ResourcesRepository,
    policies: PoliciesRepository,
    sessions: SessionsRepository,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.db");
    let store = Store::open(path, Duration::from_secs(5)).await.expect("open store");
    Harness {
        _dir: dir,
        resources: ResourcesRepository::new(store.clone()),
        policies: PoliciesRepository::new(store.clone()),
        sessions: SessionsRepository::new(store),
    }
}

fn permission(resource: &str, paths: &[&str], deny: bool) -> Permission {
    Permission {
        resource: resource.to_owned(),
        paths: Some(paths.iter().map(|s| (*s).to_owned()).collect()),
        enabled: None,
        deny: Some(deny),
    }
}

fn live_session(token: &str, policies: &[&str]) -> Session {
    Session {
        token: token.to_owned(),
        created: Utc::now(),
        valid_to: Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).single().expect("valid date"),
        owner_token: None,
        agent: None,
        policies: Some(policies.iter().map(|s| (*s).to_owned()).collect()),
        payload: None,
    }
}

#[tokio::test]
async fn literal_wildcard_walkthrough_through_the_engine() {
    let h = harness().await;

    h.resources
        .create(&Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: None,
        })
        .await
        .expect("create resource");

    // "Bar" is referenced by the session but never created: the engine must
    // treat a dangling policy reference as a silent non-grant, not an error.
    h.policies
        .create(&Policy {
            name: "Foo".to_owned(),
            enabled: None,
            permissions: Some(vec![
                permission("Foobar", &["/foo/*"], true),
                permission("Foobar", &["/foo/bar"], false),
                permission("Foobar", &["/bar"], true),
                permission("Foobar", &[], false),
            ]),
        })
        .await
        .expect("create policy");

    h.sessions.put(&live_session("F00bAr", &["Foo", "Bar"])).await.expect("create session");

    let engine = AuthEngine::new(h.resources.clone(), h.sessions.clone(), h.policies.clone());

    let v = engine.authorize_token("foo.bar.com", "", "F00bAr").await.expect("authorize");
    assert!(v.granted);

    let v = engine.authorize_token("foo.bar.com", "/foo/bar", "F00bAr").await.expect("authorize");
    assert!(v.granted, "non-wildcard match must beat a wildcard deny at equal weight");

    let v = engine.authorize_token("foo.bar.com", "/foo/bar/", "F00bAr").await.expect("authorize");
    assert!(v.granted, "trailing slash must normalize the same as no trailing slash");

    let v = engine.authorize_token("foo.bar.com", "/bar", "F00bAr").await.expect("authorize");
    assert!(!v.granted);

    let v = engine.authorize_token("foo.bar.com", "/foo/foo", "F00bAr").await.expect("authorize");
    assert!(!v.granted, "wildcard deny must win when nothing more specific matches");
}

#[tokio::test]
async fn public_resource_grants_without_inspecting_the_session() {
    let h = harness().await;
    h.resources
        .create(&Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: Some(true),
        })
        .await
        .expect("create resource");

    let engine = AuthEngine::new(h.resources.clone(), h.sessions.clone(), h.policies.clone());
    let v = engine
        .authorize_token("foo.bar.com", "/anything", "whatever-unrecognized-token")
        .await
        .expect("authorize");

    assert!(v.granted);
    assert!(v.session.is_none());
}

#[tokio::test]
async fn missing_token_falls_back_to_the_guest_policy() {
    let h = harness().await;
    h.resources
        .create(&Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: None,
        })
        .await
        .expect("create resource");
    h.policies
        .create(&Policy {
            name: "guest".to_owned(),
            enabled: None,
            permissions: Some(vec![permission("Foobar", &["/*"], false)]),
        })
        .await
        .expect("create guest policy");

    let engine = AuthEngine::new(h.resources.clone(), h.sessions.clone(), h.policies.clone());
    let v = engine.authorize_token("foo.bar.com", "/x", "missing").await.expect("authorize");
    assert!(v.granted);
    assert!(v.session.is_none());
}

#[tokio::test]
async fn disabling_the_guest_policy_flips_the_fallback_to_denied() {
    let h = harness().await;
    h.resources
        .create(&Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: None,
        })
        .await
        .expect("create resource");
    h.policies
        .create(&Policy {
            name: "guest".to_owned(),
            enabled: Some(false),
            permissions: Some(vec![permission("Foobar", &["/*"], false)]),
        })
        .await
        .expect("create guest policy");

    let engine = AuthEngine::new(h.resources.clone(), h.sessions.clone(), h.policies.clone());
    let v = engine.authorize_token("foo.bar.com", "/x", "missing").await.expect("authorize");
    assert!(!v.granted);
}

#[tokio::test]
async fn unknown_host_surfaces_not_found() {
    let h = harness().await;
    let engine = AuthEngine::new(h.resources.clone(), h.sessions.clone(), h.policies.clone());
    let err = engine.authorize_token("nowhere.example.com", "/x", "anything").await.unwrap_err();
    assert!(matches!(err, authproxy_core::error::AuthError::ResourceNotFound { .. }));
}

#[tokio::test]
async fn expired_session_is_treated_like_a_missing_one() {
    let h = harness().await;
    h.resources
        .create(&Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: None,
        })
        .await
        .expect("create resource");
    h.policies
        .create(&Policy {
            name: "guest".to_owned(),
            enabled: None,
            permissions: Some(Vec::new()),
        })
        .await
        .expect("create guest policy");
    h.policies
        .create(&Policy {
            name: "Foo".to_owned(),
            enabled: None,
            permissions: Some(vec![permission("Foobar", &["*"], false)]),
        })
        .await
        .expect("create policy");

    let mut expired = live_session("stale", &["Foo"]);
    expired.valid_to = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single().expect("valid date");
    h.sessions.put(&expired).await.expect("create expired session");

    let engine = AuthEngine::new(h.resources.clone(), h.sessions.clone(), h.policies.clone());
    let v = engine.authorize_token("foo.bar.com", "/x", "stale").await.expect("authorize");
    assert!(!v.granted, "an expired session must fall back to guest, not grant via Foo");
}

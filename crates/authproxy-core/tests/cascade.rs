use std::sync::Arc;
use std::time::Duration;

use authproxy_core::interactors::{PoliciesInteractor, ResourcesInteractor, SessionsInteractor};
use authproxy_core::models::{NewSession, Permission, Policy, Resource};
use authproxy_core::repository::{PoliciesRepository, ResourcesRepository, SessionsRepository};
use authproxy_core::validators::{PoliciesValidator, ResourcesValidator, SessionsValidator};
use authproxy_storage::Store;

struct Harness {
    // Keeps the backing temp directory alive for the harness's lifetime.
    _dir: tempfile::TempDir,
    resources: Arc<ResourcesInteractor>,
    policies: Arc<PoliciesInteractor>,
    sessions: Arc<SessionsInteractor>,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.db");
    let store = Store::open(path, Duration::from_secs(5)).await.expect("open store");

    let resources_repo = ResourcesRepository::new(store.clone());
    let policies_repo = PoliciesRepository::new(store.clone());
    let sessions_repo = SessionsRepository::new(store.clone());

    let sessions = Arc::new(SessionsInteractor::new(
        sessions_repo.clone(),
        SessionsValidator::new(sessions_repo.clone(), policies_repo.clone()),
        chrono::Duration::hours(1),
        16,
    ));

    let policies = Arc::new(PoliciesInteractor::new(
        policies_repo.clone(),
        PoliciesValidator::new(policies_repo.clone(), resources_repo.clone()),
        sessions.clone(),
    ));

    let resources = Arc::new(ResourcesInteractor::new(
        resources_repo.clone(),
        ResourcesValidator::new(resources_repo.clone()),
        policies.clone(),
    ));

    Harness {
        _dir: dir,
        resources,
        policies,
        sessions,
    }
}

#[tokio::test]
async fn deleting_a_resource_strips_permissions_from_policies() {
    let h = harness().await;

    h.resources
        .create(Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: None,
        })
        .await
        .expect("create resource");

    h.policies
        .create(Policy {
            name: "Foo".to_owned(),
            enabled: None,
            permissions: Some(vec![Permission {
                resource: "Foobar".to_owned(),
                paths: Some(vec!["/foo".to_owned()]),
                enabled: None,
                deny: None,
            }]),
        })
        .await
        .expect("create policy");

    h.resources.delete_by_hostname("foo.bar.com").await.expect("delete resource");

    let policy = h.policies.find_by_name("Foo").await.expect("find policy");
    assert!(policy.effective_permissions().is_empty());
}

#[tokio::test]
async fn deleting_a_policy_strips_it_from_sessions() {
    let h = harness().await;

    h.policies
        .create(Policy {
            name: "Foo".to_owned(),
            enabled: None,
            permissions: Some(Vec::new()),
        })
        .await
        .expect("create policy");

    let session = h
        .sessions
        .create(NewSession {
            policies: Some(vec!["Foo".to_owned()]),
            ..Default::default()
        })
        .await
        .expect("create session");

    h.policies.delete_by_name("Foo").await.expect("delete policy");

    let reloaded = h.sessions.find_by_token(&session.token).await.expect("find session");
    assert!(reloaded.policy_names().is_empty());
}

#[tokio::test]
async fn updating_a_resource_without_changing_its_name_is_not_a_collision() {
    let h = harness().await;

    h.resources
        .create(Resource {
            name: "Foobar".to_owned(),
            hostname: "foo.bar.com".to_owned(),
            redirect_url: None,
            public: None,
        })
        .await
        .expect("create resource");

    let updated = h
        .resources
        .update_by_hostname(
            "foo.bar.com",
            Resource {
                name: "Foobar".to_owned(),
                hostname: "ignored-on-update".to_owned(),
                redirect_url: Some("https://example.com".to_owned()),
                public: None,
            },
        )
        .await
        .expect("update resource keeping its own name");

    assert_eq!(updated.hostname, "foo.bar.com", "hostname must stay immutable across update");
    assert_eq!(updated.redirect_url.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn guest_policy_cannot_be_deleted() {
    let h = harness().await;

    h.policies.create(Policy::new_guest()).await.expect("create guest");

    let err = h.policies.delete_by_name("guest").await.unwrap_err();
    assert!(err.to_string().contains("guest"));
}

#[tokio::test]
async fn bulk_owner_invalidation_only_touches_matching_sessions() {
    let h = harness().await;

    h.policies
        .create(Policy {
            name: "Foo".to_owned(),
            enabled: None,
            permissions: Some(Vec::new()),
        })
        .await
        .expect("create policy");

    for owner in ["owner1", "owner1", "owner2"] {
        h.sessions
            .create(NewSession {
                owner_token: Some(owner.to_owned()),
                policies: Some(vec!["Foo".to_owned()]),
                ..Default::default()
            })
            .await
            .expect("create session");
    }

    let deleted = h
        .sessions
        .delete_by_owner_tokens(&["owner1".to_owned(), "owner6".to_owned()])
        .await
        .expect("bulk delete");

    assert_eq!(deleted.len(), 2);

    let live = h.sessions.find().await.expect("list sessions");
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].owner_token.as_deref(), Some("owner2"));
}

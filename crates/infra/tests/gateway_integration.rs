//! Integration tests for the authenticated request gateway
//!
//! Runs the gateway against a wiremock backend and checks the refresh
//! protocol end to end: pass-through, single-flight refresh, FIFO replay,
//! at-most-one retry, terminal logout and notice classification.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chatrizz_common::auth::{
    AttemptedRequest, CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionKey,
};
use chatrizz_common::testing::{wait_for, FlakyCredentialStore};
use chatrizz_core::{Notice, SessionState};
use chatrizz_infra::api::{ApiError, ApiRequest};
use futures::future::join_all;
use support::{Backend, REFRESH_PATH};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

const NO_DELAY: Duration = Duration::ZERO;

async fn mount_protected(backend: &Backend, path_pattern: &str) {
    Mock::given(method("GET"))
        .and(path_regex(path_pattern))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Token expired"})))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(path_pattern))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&backend.server)
        .await;
}

#[tokio::test]
async fn valid_credential_passes_through_without_refresh() {
    let backend = Backend::start(Some("good"), Some("r-1")).await;
    backend.mount_refresh("unused", NO_DELAY, 0).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/team/"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let gateway = backend.gateway();
    let response = gateway.send(ApiRequest::get("admin/team/")).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert!(backend.observer.notices().is_empty());
    assert_eq!(gateway.state().await, SessionState::Authenticated);
}

#[tokio::test]
async fn expired_credential_is_refreshed_and_request_replayed() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    backend.mount_refresh("new", NO_DELAY, 1).await;
    mount_protected(&backend, "^/api/v1/admin/users/$").await;

    let gateway = backend.gateway();
    let response = gateway.send(ApiRequest::get("admin/users/")).await.unwrap();

    assert_eq!(response.json::<serde_json::Value>().unwrap()["ok"], true);
    assert_eq!(backend.store.get(SessionKey::AccessToken).await.unwrap().as_deref(), Some("new"));
    assert_eq!(backend.store.get(SessionKey::RefreshToken).await.unwrap().as_deref(), Some("r-1"));
    assert!(backend.observer.notices().is_empty());
    assert!(!gateway.is_refreshing());
    assert_eq!(gateway.queued_requests(), 0);
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    backend.mount_refresh("new", Duration::from_millis(200), 1).await;
    mount_protected(&backend, "^/api/v1/admin/item/\\d+/$").await;

    let gateway = backend.gateway();
    let calls = (0..5).map(|i| gateway.send(ApiRequest::get(format!("admin/item/{i}/"))));
    let results = join_all(calls).await;

    for result in results {
        assert_eq!(result.unwrap().status.as_u16(), 200);
    }
    assert_eq!(backend.store.get(SessionKey::AccessToken).await.unwrap().as_deref(), Some("new"));
    assert!(!gateway.is_refreshing());
}

#[tokio::test]
async fn failed_refresh_fails_every_waiter_and_ends_session() {
    let backend = Backend::start(Some("old"), Some("revoked")).await;
    backend.mount_refresh_failure(401, Duration::from_millis(100), 1).await;
    mount_protected(&backend, "^/api/v1/admin/item/\\d+/$").await;

    let gateway = backend.gateway();
    let calls = (0..4).map(|i| gateway.send(ApiRequest::get(format!("admin/item/{i}/"))));
    let errors: Vec<ApiError> = join_all(calls).await.into_iter().map(Result::unwrap_err).collect();

    assert!(matches!(errors[0], ApiError::SessionExpired(_)));
    assert!(errors.iter().all(|err| *err == errors[0]), "all waiters see the same error");
    assert!(backend.store.is_empty(), "session cleared");
    assert_eq!(backend.observer.count(Notice::SessionExpired), 1);
    assert_eq!(backend.observer.sessions_ended(), 1);
    assert_eq!(gateway.state().await, SessionState::Unauthenticated);
}

#[tokio::test]
async fn queued_requests_each_replay_once_after_the_refresh() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    backend.mount_refresh("new", Duration::from_millis(300), 1).await;
    mount_protected(&backend, "^/api/v1/admin/(leader|a|b|c)/$").await;

    let gateway = backend.gateway();
    let leader = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.send(ApiRequest::get("admin/leader/")).await })
    };
    wait_for(Duration::from_secs(2), "refresh to start", || gateway.is_refreshing()).await;

    let mut followers = Vec::new();
    for (position, name) in ["a", "b", "c"].into_iter().enumerate() {
        let task_gateway = gateway.clone();
        followers.push(tokio::spawn(async move {
            task_gateway.send(ApiRequest::get(format!("admin/{name}/"))).await
        }));
        wait_for(Duration::from_secs(2), "request to queue", || {
            gateway.queued_requests() == position + 1
        })
        .await;
    }
    assert_eq!(gateway.state().await, SessionState::RefreshPending);

    leader.await.unwrap().unwrap();
    for follower in followers {
        follower.await.unwrap().unwrap();
    }

    let mut replays: Vec<String> = backend
        .resource_calls()
        .await
        .into_iter()
        .filter(|(bearer, _)| bearer.as_deref() == Some("new"))
        .map(|(_, path)| path)
        .collect();
    replays.sort();
    assert_eq!(
        replays,
        vec!["/api/v1/admin/a/", "/api/v1/admin/b/", "/api/v1/admin/c/", "/api/v1/admin/leader/"]
    );
}

#[tokio::test]
async fn aborted_leader_does_not_strand_queued_requests() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access": "new", "refresh": "r-2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&backend.server)
        .await;
    mount_protected(&backend, "^/api/v1/admin/(leader|follower)/$").await;

    let gateway = backend.gateway();
    let leader = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.send(ApiRequest::get("admin/leader/")).await })
    };
    wait_for(Duration::from_secs(2), "refresh to start", || gateway.is_refreshing()).await;
    let follower = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.send(ApiRequest::get("admin/follower/")).await })
    };
    wait_for(Duration::from_secs(2), "follower to queue", || gateway.queued_requests() == 1).await;

    leader.abort();
    assert!(leader.await.unwrap_err().is_cancelled());

    let response = follower.await.unwrap().unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(backend.store.get(SessionKey::AccessToken).await.unwrap().as_deref(), Some("new"));
    assert_eq!(backend.store.get(SessionKey::RefreshToken).await.unwrap().as_deref(), Some("r-2"));
    assert!(!gateway.is_refreshing());
    assert!(backend.observer.notices().is_empty());
}

#[tokio::test]
async fn queued_replay_does_not_wait_for_a_slow_leader_replay() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    backend.mount_refresh("new", Duration::from_millis(200), 1).await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/v1/admin/(slow|fast)/$"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/slow/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/fast/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&backend.server)
        .await;

    let gateway = backend.gateway();
    let leader = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.send(ApiRequest::get("admin/slow/")).await })
    };
    wait_for(Duration::from_secs(2), "refresh to start", || gateway.is_refreshing()).await;
    let follower = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.send(ApiRequest::get("admin/fast/")).await })
    };

    follower.await.unwrap().unwrap();
    assert!(!leader.is_finished(), "leader replay is still in flight");
    leader.await.unwrap().unwrap();
}

#[tokio::test]
async fn refresh_rejected_with_bad_request_ends_session_once() {
    let backend = Backend::start(Some("old"), Some("stale")).await;
    backend.mount_refresh_failure(400, Duration::from_millis(100), 1).await;
    mount_protected(&backend, "^/api/v1/admin/item/\\d+/$").await;

    let gateway = backend.gateway();
    let calls = (0..3).map(|i| gateway.send(ApiRequest::get(format!("admin/item/{i}/"))));
    let errors: Vec<ApiError> = join_all(calls).await.into_iter().map(Result::unwrap_err).collect();

    assert!(errors.iter().all(|err| matches!(err, ApiError::SessionExpired(_))));
    assert!(backend.store.is_empty(), "session cleared");
    assert_eq!(backend.observer.count(Notice::SessionExpired), 1);
    assert_eq!(backend.observer.sessions_ended(), 1);
    assert_eq!(backend.refresh_calls().await, 1);
    assert!(backend.resource_calls().await.iter().all(|(bearer, _)| bearer.as_deref() == Some("old")));
}

#[tokio::test]
async fn replayed_request_is_never_retried_twice() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    backend.mount_refresh("new", NO_DELAY, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/stubborn/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&backend.server)
        .await;

    let gateway = backend.gateway();
    let err = gateway.send(ApiRequest::get("admin/stubborn/")).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert!(!gateway.is_refreshing());
    assert!(backend.observer.notices().is_empty());
}

#[tokio::test]
async fn refreshed_credential_survives_a_new_gateway() {
    let backend = Backend::start(None, None).await;
    backend.mount_refresh("new", NO_DELAY, 1).await;
    mount_protected(&backend, "^/api/v1/admin/users/$").await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let store = FileCredentialStore::new(&file);
    store.set(SessionKey::AccessToken, "old", None).await.unwrap();
    store.set(SessionKey::RefreshToken, "r-1", None).await.unwrap();

    let first = backend.gateway_over(Arc::new(store), Duration::from_secs(5));
    first.send(ApiRequest::get("admin/users/")).await.unwrap();
    drop(first);

    let second = backend.gateway_over(Arc::new(FileCredentialStore::new(&file)), Duration::from_secs(5));
    second.send(ApiRequest::get("admin/users/")).await.unwrap();

    let calls = backend.resource_calls().await;
    assert_eq!(calls.last().unwrap().0.as_deref(), Some("new"));
}

#[tokio::test]
async fn missing_refresh_credential_logs_out_without_network_refresh() {
    let backend = Backend::start(Some("old"), None).await;
    backend.mount_refresh("unused", NO_DELAY, 0).await;
    mount_protected(&backend, "^/api/v1/admin/users/$").await;

    let gateway = backend.gateway();
    let err = gateway.send(ApiRequest::get("admin/users/")).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized("Token expired".into()), "original error surfaces");
    assert!(backend.store.is_empty());
    assert_eq!(backend.observer.count(Notice::SessionExpired), 1);
    assert_eq!(backend.observer.sessions_ended(), 1);
    assert!(!gateway.is_refreshing(), "gate reopens");
}

#[tokio::test]
async fn forbidden_raises_permission_notice_without_refresh() {
    let backend = Backend::start(Some("good"), Some("r-1")).await;
    backend.mount_refresh("unused", NO_DELAY, 0).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({"detail": "nope"})))
        .mount(&backend.server)
        .await;

    let err = backend.gateway().send(ApiRequest::get("admin/team/")).await.unwrap_err();

    assert_eq!(err, ApiError::Forbidden("nope".into()));
    assert_eq!(backend.observer.notices(), vec![Notice::PermissionDenied]);
    assert_eq!(backend.store.get(SessionKey::AccessToken).await.unwrap().as_deref(), Some("good"));
}

#[tokio::test]
async fn server_error_raises_retry_later_notice() {
    let backend = Backend::start(Some("good"), Some("r-1")).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&backend.server)
        .await;

    let err = backend.gateway().send(ApiRequest::get("admin/overview/")).await.unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 502, .. }));
    assert_eq!(backend.observer.notices(), vec![Notice::ServerError]);
}

#[tokio::test]
async fn client_errors_surface_without_notice() {
    let backend = Backend::start(Some("good"), Some("r-1")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"message": "Email taken"})))
        .mount(&backend.server)
        .await;

    let request = ApiRequest::post("admin/team/").with_json(&serde_json::json!({"email": "a@b.co"})).unwrap();
    let err = backend.gateway().send(request).await.unwrap_err();

    assert_eq!(err, ApiError::Client { status: 400, message: "Email taken".into() });
    assert!(backend.observer.notices().is_empty());
}

#[tokio::test]
async fn timeout_is_a_network_failure_not_a_refresh() {
    let backend = Backend::start(Some("good"), Some("r-1")).await;
    backend.mount_refresh("unused", NO_DELAY, 0).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&backend.server)
        .await;

    let gateway = backend.gateway_with_timeout(Duration::from_millis(200));
    let err = gateway.send(ApiRequest::get("admin/users/")).await.unwrap_err();

    assert_eq!(err, ApiError::Timeout(Duration::from_millis(200)));
    assert!(err.should_retry());
    assert!(backend.observer.notices().is_empty());
    assert!(!gateway.is_refreshing());
}

#[tokio::test]
async fn stale_credential_is_replayed_with_the_current_one() {
    let backend = Backend::start(Some("new"), Some("r-1")).await;
    backend.mount_refresh("unused", NO_DELAY, 0).await;
    mount_protected(&backend, "^/api/v1/admin/users/$").await;

    let gateway = backend.gateway();
    let attempt = AttemptedRequest::new(ApiRequest::get("admin/users/")).with_credential(Some("old".into()));
    let response = gateway
        .handle_unauthorized(attempt, ApiError::Unauthorized("Token expired".into()))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(backend.resource_calls().await, vec![(Some("new".into()), "/api/v1/admin/users/".into())]);
}

#[tokio::test]
async fn unwritable_store_fails_the_refresh_cycle() {
    let backend = Backend::start(None, None).await;
    backend.mount_refresh("new", NO_DELAY, 1).await;
    mount_protected(&backend, "^/api/v1/admin/users/$").await;

    let store = FlakyCredentialStore::new(MemoryCredentialStore::with_tokens(Some("old"), Some("r-1")));
    store.fail_writes();
    let gateway = backend.gateway_over(Arc::new(store.clone()), Duration::from_secs(5));

    let err = gateway.send(ApiRequest::get("admin/users/")).await.unwrap_err();

    assert!(matches!(err, ApiError::Store(_)));
    assert!(store.inner().is_empty(), "session cleared after failed persist");
    assert_eq!(backend.observer.count(Notice::SessionExpired), 1);
    assert!(!gateway.is_refreshing());
}

#[tokio::test]
async fn refresh_now_joins_a_running_refresh() {
    let backend = Backend::start(Some("old"), Some("r-1")).await;
    backend.mount_refresh("new", Duration::from_millis(200), 1).await;
    mount_protected(&backend, "^/api/v1/admin/users/$").await;

    let gateway = backend.gateway();
    let request = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.send(ApiRequest::get("admin/users/")).await })
    };
    wait_for(Duration::from_secs(2), "refresh to start", || gateway.is_refreshing()).await;

    assert_eq!(gateway.refresh_now().await.unwrap(), "new");
    request.await.unwrap().unwrap();
}

#[tokio::test]
async fn clear_session_signs_out() {
    let backend = Backend::start(Some("good"), Some("r-1")).await;
    let gateway = backend.gateway();

    gateway.clear_session().await.unwrap();

    assert!(backend.store.is_empty());
    assert_eq!(gateway.state().await, SessionState::Unauthenticated);
}

//! Shared fixtures for the infra integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chatrizz_common::auth::{CredentialStore, MemoryCredentialStore};
use chatrizz_core::{Notice, SessionObserver};
use chatrizz_infra::api::Gateway;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REFRESH_PATH: &str = "/api/v1/auth/token/refresh/";

/// Observer that remembers everything it was told.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    notices: Mutex<Vec<Notice>>,
    ended: AtomicUsize,
}

impl RecordingObserver {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count(&self, notice: Notice) -> usize {
        self.notices().into_iter().filter(|n| *n == notice).count()
    }

    pub fn sessions_ended(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }
}

impl SessionObserver for RecordingObserver {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn session_ended(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock backend plus the session state a gateway would run against.
pub struct Backend {
    pub server: MockServer,
    pub store: MemoryCredentialStore,
    pub observer: Arc<RecordingObserver>,
}

impl Backend {
    pub async fn start(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            server: MockServer::start().await,
            store: MemoryCredentialStore::with_tokens(access, refresh),
            observer: Arc::new(RecordingObserver::default()),
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}/api/v1/", self.server.uri())
    }

    pub fn gateway(&self) -> Arc<Gateway> {
        self.gateway_over(Arc::new(self.store.clone()), Duration::from_secs(5))
    }

    pub fn gateway_with_timeout(&self, timeout: Duration) -> Arc<Gateway> {
        self.gateway_over(Arc::new(self.store.clone()), timeout)
    }

    pub fn gateway_over(&self, store: Arc<dyn CredentialStore>, timeout: Duration) -> Arc<Gateway> {
        let gateway = Gateway::builder()
            .base_url(self.base_url())
            .timeout(timeout)
            .store(store)
            .observer(self.observer.clone())
            .build()
            .unwrap();
        Arc::new(gateway)
    }

    /// Refresh endpoint answering `access`, expected exactly `times` times.
    pub async fn mount_refresh(&self, access: &str, delay: Duration, times: u64) {
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access": access }))
                    .set_delay(delay),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Refresh endpoint answering `status`, expected exactly `times` times.
    pub async fn mount_refresh_failure(&self, status: u16, delay: Duration, times: u64) {
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(ResponseTemplate::new(status).set_delay(delay))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// How many times the refresh endpoint was hit.
    pub async fn refresh_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == REFRESH_PATH)
            .count()
    }

    /// Bearer credential and path of every non-refresh request, in arrival order.
    pub async fn resource_calls(&self) -> Vec<(Option<String>, String)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() != REFRESH_PATH)
            .map(|request| {
                let bearer = request
                    .headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
                    .map(str::to_owned);
                (bearer, request.url.path().to_string())
            })
            .collect()
    }
}

/// Unsigned JWT whose `exp` is `offset` from now.
pub fn jwt_expiring_in(offset: chrono::Duration) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = (chrono::Utc::now() + offset).timestamp();
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"user_id":"u-1"}}"#));
    format!("{header}.{payload}.signature")
}

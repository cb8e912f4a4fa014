//! Authenticated request gateway
//!
//! Every admin API call goes through [`Gateway::send`]. The gateway attaches
//! the stored access credential, bounds each call by the configured timeout
//! and recovers from an expired credential with exactly one refresh exchange,
//! however many requests hit the 401 at the same time:
//!
//! ```text
//!   send ──► 2xx ─────────────────────────────────────────► Ok
//!     │
//!     ├──► 401 (first attempt) ──► RefreshGate
//!     │        ├─ leader:  spawn renewal task ─► wait ─┐
//!     │        └─ queued:  wait ──────────────────────┤
//!     │                                                ▼
//!     │        renewal: refresh ─► store ─► drain ─► resolve waiters (FIFO)
//!     │                                                ▼
//!     │        each caller replays once with the new credential
//!     │
//!     └──► 403 / 5xx ──► notice ──► Err (unchanged)
//! ```
//!
//! The renewal runs on its own task, so a caller that stops waiting cannot
//! strand the queue or lose a rotated refresh credential. A failed refresh,
//! or a missing refresh credential, ends the session: the store is cleared,
//! the observer hears `SessionExpired` and `session_ended`, and every waiting
//! caller receives the same error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatrizz_common::auth::{
    Admission, AttemptedRequest, CredentialStore, RefreshGate, RefreshLease, SessionKey,
};
use chatrizz_core::{NoopSessionObserver, Notice, SessionObserver, SessionState};
use chatrizz_domain::constants::{DEFAULT_ACCESS_TTL_HOURS, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use chatrizz_domain::{Config, RefreshResponse};
use chrono::Utc;
use reqwest::header::ACCEPT;
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};

use super::auth::HttpTokenRefresher;
use super::errors::ApiError;
use super::request::{join_url, ApiRequest, ApiResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Exchanges a refresh credential for a new access credential.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// # Errors
    /// Any error; the gateway treats every failure as the end of the session
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError>;
}

/// Gateway settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL every request path is joined onto
    pub base_url: String,
    /// Upper bound for one call, including reading the body
    pub timeout: Duration,
    /// Lifetime given to each newly stored access credential
    pub access_ttl: chrono::Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            access_ttl: chrono::Duration::hours(DEFAULT_ACCESS_TTL_HOURS),
        }
    }
}

impl GatewayConfig {
    /// Gateway settings taken from the loaded application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout: Duration::from_secs(config.api.timeout_secs),
            access_ttl: chrono::Duration::hours(config.session.access_ttl_hours),
        }
    }
}

/// A caller suspended behind the running refresh, waiting for the new
/// access credential.
type Waiter = oneshot::Sender<Result<String, ApiError>>;

/// Session state shared with the detached renewal task.
struct Renewal {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    observer: Arc<dyn SessionObserver>,
    gate: RefreshGate<Waiter>,
    timeout: Duration,
    access_ttl: chrono::Duration,
}

/// Authenticated request gateway. Share it behind an `Arc`.
pub struct Gateway {
    http: HttpClient,
    config: GatewayConfig,
    renewal: Arc<Renewal>,
}

impl Gateway {
    /// Start configuring a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Send `request` with the current access credential.
    ///
    /// # Errors
    /// Returns the classified failure. A 401 is only surfaced after the
    /// refresh-and-replay cycle has run (or could not run).
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let credential = self.renewal.store.get(SessionKey::AccessToken).await?;
        let attempt = AttemptedRequest::new(request).with_credential(credential);

        match self.execute(&attempt).await {
            Err(err @ ApiError::Unauthorized(_)) => self.handle_unauthorized(attempt, err).await,
            other => self.classify_other_errors(other),
        }
    }

    /// Recover from a 401 observed for `attempt`.
    ///
    /// An attempt that was already replayed gets `error` back unchanged. An
    /// attempt sent with a credential that has since been replaced is replayed
    /// once with the current one. Otherwise the caller joins the refresh gate,
    /// starting the renewal task if none is running, and replays once with
    /// the credential it yields.
    ///
    /// # Errors
    /// The replay's failure, the refresh failure, or `error` itself when no
    /// refresh credential is stored
    pub async fn handle_unauthorized(
        &self,
        attempt: AttemptedRequest<ApiRequest>,
        error: ApiError,
    ) -> Result<ApiResponse, ApiError> {
        let Some(attempt) = attempt.into_retry() else {
            debug!("replayed request rejected again; not refreshing");
            return Err(error);
        };

        let current = self.renewal.store.get(SessionKey::AccessToken).await?;
        let access = if current.is_some() && current.as_deref() != attempt.credential() {
            debug!("credential replaced since dispatch; replaying with current credential");
            current
        } else {
            Some(self.await_renewal(error).await?)
        };

        let replay = attempt.with_credential(access);
        let result = self.execute(&replay).await;
        self.classify_other_errors(result)
    }

    /// Surface notices for failures that are not part of the refresh cycle.
    ///
    /// 403 raises `PermissionDenied`, 5xx raises `ServerError`. The result is
    /// returned unchanged either way.
    pub fn classify_other_errors(
        &self,
        result: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        match &result {
            Err(ApiError::Forbidden(_)) => self.renewal.observer.notify(Notice::PermissionDenied),
            Err(ApiError::Server { status, .. }) => {
                warn!(status, "server error");
                self.renewal.observer.notify(Notice::ServerError);
            }
            _ => {}
        }
        result
    }

    /// Run a refresh now, or wait for the one already running, and return the
    /// new access credential.
    ///
    /// # Errors
    /// `SessionExpired` when the refresh fails or no refresh credential is
    /// stored; the session has been ended in both cases
    pub async fn refresh_now(&self) -> Result<String, ApiError> {
        self.await_renewal(ApiError::SessionExpired("No refresh token available".into())).await
    }

    /// Join the running renewal, or spawn one, and wait for its outcome.
    ///
    /// `missing` is the failure reported when no refresh credential is stored.
    async fn await_renewal(&self, missing: ApiError) -> Result<String, ApiError> {
        let (reply, outcome) = oneshot::channel();
        match self.renewal.gate.begin_refresh(reply) {
            Admission::Queued => debug!("refresh already running; waiting for it"),
            Admission::Leader(lease, first) => {
                tokio::spawn(Arc::clone(&self.renewal).run(lease, first, missing));
            }
        }

        // Only a runtime shutdown drops the renewal before it resolves us.
        outcome.await.unwrap_or(Err(ApiError::Cancelled))
    }

    /// Remove every stored session entry.
    ///
    /// # Errors
    /// Returns `Store` if the credential store cannot be cleared
    pub async fn clear_session(&self) -> Result<(), ApiError> {
        self.renewal.store.clear().await?;
        debug!("session cleared");
        Ok(())
    }

    /// Current position in the session lifecycle.
    pub async fn state(&self) -> SessionState {
        if self.is_refreshing() {
            return SessionState::RefreshPending;
        }
        match self.renewal.store.get(SessionKey::AccessToken).await {
            Ok(Some(_)) => SessionState::Authenticated,
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "credential store unreadable; treating session as signed out");
                SessionState::Unauthenticated
            }
        }
    }

    /// Whether a credential refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.renewal.gate.is_refreshing()
    }

    /// Number of callers waiting on the running refresh.
    pub fn queued_requests(&self) -> usize {
        self.renewal.gate.queued()
    }

    /// Settings the gateway was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Underlying transport, shared with the login and refresh exchanges.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Session credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.renewal.store
    }

    /// Receiver of session notices.
    pub fn observer(&self) -> &Arc<dyn SessionObserver> {
        &self.renewal.observer
    }

    async fn execute(&self, attempt: &AttemptedRequest<ApiRequest>) -> Result<ApiResponse, ApiError> {
        let request = attempt.request();
        let url = join_url(&self.config.base_url, &request.path);

        let mut builder =
            self.http.request(request.method.clone(), &url).header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = attempt.credential() {
            builder = builder.bearer_auth(token);
        }

        let timeout = self.config.timeout;
        let exchange = async {
            let response = self
                .http
                .send(builder)
                .await
                .map_err(|err| ApiError::from_transport(err, timeout))?;
            let status = response.status();
            let body = response.bytes().await.map_err(|err| {
                let infra: InfraError = err.into();
                ApiError::from_transport(infra.into(), timeout)
            })?;
            Ok::<_, ApiError>((status, body.to_vec()))
        };

        let (status, body) = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| ApiError::Timeout(timeout))??;

        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            debug!(%status, retried = attempt.is_retried(), "request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }
}

impl Renewal {
    /// Run one refresh cycle to completion and resolve every waiter in
    /// arrival order, the leader first.
    async fn run(self: Arc<Self>, lease: RefreshLease<Waiter>, first: Waiter, missing: ApiError) {
        let outcome = self.renew_credentials(missing).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "credential refresh failed; ending session");
            self.end_session().await;
        }

        let queued = lease.drain();
        match &outcome {
            Ok(_) => info!(waiters = queued.len() + 1, "credential refreshed; resuming callers"),
            Err(_) => debug!(waiters = queued.len() + 1, "failing queued callers"),
        }
        for waiter in std::iter::once(first).chain(queued) {
            // A closed receiver means the caller stopped waiting.
            let _ = waiter.send(outcome.clone());
        }
    }

    /// Exchange the stored refresh credential and persist the result.
    async fn renew_credentials(&self, missing: ApiError) -> Result<String, ApiError> {
        let Some(refresh) = self.store.get(SessionKey::RefreshToken).await? else {
            warn!("no refresh credential stored");
            return Err(missing);
        };

        let timeout = self.timeout;
        let issued = tokio::time::timeout(timeout, self.refresher.refresh(&refresh))
            .await
            .map_err(|_| ApiError::SessionExpired(format!("refresh timed out after {timeout:?}")))?
            .map_err(ApiError::into_session_expired)?;

        let expires_at = Utc::now() + self.access_ttl;
        self.store.set(SessionKey::AccessToken, &issued.access, Some(expires_at)).await?;
        if let Some(rotated) = issued.refresh.as_deref() {
            self.store.set(SessionKey::RefreshToken, rotated, None).await?;
        }

        Ok(issued.access)
    }

    async fn end_session(&self) {
        if let Err(err) = self.store.clear().await {
            error!(error = %err, "failed to clear session credentials");
        }
        self.observer.notify(Notice::SessionExpired);
        self.observer.session_ended();
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("gate", &self.renewal.gate)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Gateway`].
#[derive(Default)]
pub struct GatewayBuilder {
    config: GatewayConfig,
    http: Option<HttpClient>,
    user_agent: Option<String>,
    store: Option<Arc<dyn CredentialStore>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl GatewayBuilder {
    /// Replace every setting at once.
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Base URL request paths are joined onto.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Per-call timeout, also applied to the refresh exchange.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// User agent for the transport built by [`build`](Self::build).
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use a prebuilt transport instead of one derived from the config.
    pub fn http(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Where session credentials live. Required.
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the refresh exchange (defaults to [`HttpTokenRefresher`]).
    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Receiver of session notices (defaults to a no-op).
    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// # Errors
    /// Returns `Config` if the base URL is invalid, no store was set, or the
    /// HTTP client cannot be built
    pub fn build(self) -> Result<Gateway, ApiError> {
        url::Url::parse(&self.config.base_url).map_err(|e| {
            ApiError::Config(format!("invalid base URL '{}': {e}", self.config.base_url))
        })?;
        let store =
            self.store.ok_or_else(|| ApiError::Config("credential store not set".to_string()))?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = HttpClient::builder().timeout(self.config.timeout);
                if let Some(agent) = self.user_agent {
                    builder = builder.user_agent(agent);
                }
                builder
                    .build()
                    .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?
            }
        };

        let refresher = self.refresher.unwrap_or_else(|| {
            Arc::new(HttpTokenRefresher::new(http.clone(), &self.config.base_url, self.config.timeout))
        });
        let observer = self.observer.unwrap_or_else(|| Arc::new(NoopSessionObserver));

        let renewal = Arc::new(Renewal {
            store,
            refresher,
            observer,
            gate: RefreshGate::new(),
            timeout: self.config.timeout,
            access_ttl: self.config.access_ttl,
        });

        Ok(Gateway { http, config: self.config, renewal })
    }
}

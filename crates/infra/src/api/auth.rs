//! Session lifecycle: login, credential refresh, logout and restore
//!
//! Login and the refresh exchange talk to the backend directly through the
//! plain [`HttpClient`]; neither carries a bearer credential and neither may
//! trigger the gateway's refresh cycle. Everything after login goes through
//! the [`Gateway`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatrizz_common::auth::{is_token_expired, SessionKey};
use chatrizz_core::{Notice, SessionState};
use chatrizz_domain::constants::{LOGIN_PATH, REFRESH_PATH};
use chatrizz_domain::{
    LoginCredentials, LoginResponse, RefreshRequest, RefreshResponse, SessionProfile,
};
use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use super::gateway::{Gateway, TokenRefresher};
use super::request::join_url;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// POST `body` as JSON without credentials and read the whole response.
async fn post_anonymous<B: Serialize + ?Sized>(
    http: &HttpClient,
    url: &str,
    body: &B,
    timeout: Duration,
) -> Result<(StatusCode, Vec<u8>), ApiError> {
    let builder = http.request(Method::POST, url).json(body);

    let exchange = async {
        let response =
            http.send(builder).await.map_err(|err| ApiError::from_transport(err, timeout))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            let infra: InfraError = err.into();
            ApiError::from_transport(infra.into(), timeout)
        })?;
        Ok::<_, ApiError>((status, bytes.to_vec()))
    };

    tokio::time::timeout(timeout, exchange).await.map_err(|_| ApiError::Timeout(timeout))?
}

/// Refresh exchange against `auth/token/refresh/`.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http: HttpClient,
    url: String,
    timeout: Duration,
}

impl HttpTokenRefresher {
    pub fn new(http: HttpClient, base_url: &str, timeout: Duration) -> Self {
        Self { http, url: join_url(base_url, REFRESH_PATH), timeout }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let request = RefreshRequest { refresh: refresh_token };
        let (status, body) = post_anonymous(&self.http, &self.url, &request, self.timeout).await?;

        if !status.is_success() {
            return Err(ApiError::SessionExpired(format!("refresh rejected with status {status}")));
        }

        serde_json::from_slice(&body)
            .map_err(|e| ApiError::SessionExpired(format!("malformed refresh response: {e}")))
    }
}

/// Login, logout and startup session checks for the admin client.
#[derive(Debug, Clone)]
pub struct AuthService {
    gateway: Arc<Gateway>,
}

impl AuthService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Sign in with email and password.
    ///
    /// On success the access credential (with its lifetime), the refresh
    /// credential and the profile are stored and `LoginSucceeded` is raised.
    ///
    /// # Errors
    /// - `InvalidInput` if the credentials fail the form rules (nothing is sent)
    /// - the status error with the backend's `message`, or "Login failed"
    /// - `Decode` if the success body is not a login response
    /// - `Store` if the session cannot be persisted
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionProfile, ApiError> {
        credentials.validate().map_err(ApiError::rejected_input)?;

        let config = self.gateway.config();
        let url = join_url(&config.base_url, LOGIN_PATH);
        let (status, body) =
            post_anonymous(self.gateway.http(), &url, credentials, config.timeout).await?;

        if !status.is_success() {
            warn!(%status, "login rejected");
            return Err(ApiError::with_status_message(status, login_failure_message(&body)));
        }

        let response: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| ApiError::Decode(format!("Failed to parse login response: {e}")))?;
        let (tokens, profile) = response.into_parts();
        let user_data = serde_json::to_string(&profile)
            .map_err(|e| ApiError::Decode(format!("Failed to encode profile: {e}")))?;

        let store = self.gateway.store();
        let expires_at = Utc::now() + config.access_ttl;
        store.set(SessionKey::AccessToken, &tokens.access, Some(expires_at)).await?;
        store.set(SessionKey::RefreshToken, &tokens.refresh, None).await?;
        store.set(SessionKey::UserData, &user_data, None).await?;

        info!(user_id = %profile.id, "login successful");
        self.gateway.observer().notify(Notice::LoginSucceeded);
        Ok(profile)
    }

    /// Forget the session locally. No network call is made.
    ///
    /// # Errors
    /// Returns `Store` if the credential store cannot be cleared
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.gateway.clear_session().await?;

        info!("logged out");
        let observer = self.gateway.observer();
        observer.notify(Notice::LoggedOut);
        observer.session_ended();
        Ok(())
    }

    /// Decide at startup whether the stored session is still usable.
    ///
    /// An unexpired access credential is accepted as is. An expired or
    /// unreadable one is renewed through the gateway's refresh gate when a
    /// refresh credential exists; otherwise the leftovers are cleared.
    ///
    /// # Errors
    /// Returns `Store` if the credential store cannot be read or cleared
    #[instrument(skip_all)]
    pub async fn restore_session(&self) -> Result<SessionState, ApiError> {
        let store = self.gateway.store();
        let access = store.get(SessionKey::AccessToken).await?;
        let refresh = store.get(SessionKey::RefreshToken).await?;

        if access.is_none() && refresh.is_none() {
            debug!("no stored session");
            return Ok(SessionState::Unauthenticated);
        }

        if let Some(token) = access.as_deref() {
            if !is_token_expired(token) {
                debug!("stored access credential still valid");
                return Ok(SessionState::Authenticated);
            }
            debug!("stored access credential expired");
        }

        if refresh.is_none() {
            self.gateway.clear_session().await?;
            return Ok(SessionState::Unauthenticated);
        }

        match self.gateway.refresh_now().await {
            Ok(_) => {
                info!("session restored");
                Ok(SessionState::Authenticated)
            }
            Err(err) => {
                info!(error = %err, "stored session could not be restored");
                Ok(SessionState::Unauthenticated)
            }
        }
    }

    /// Profile saved at login, if signed in.
    ///
    /// # Errors
    /// `Store` if the store is unreadable, `Decode` if the saved profile is corrupt
    pub async fn current_user(&self) -> Result<Option<SessionProfile>, ApiError> {
        let Some(raw) = self.gateway.store().get(SessionKey::UserData).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ApiError::Decode(format!("stored profile is unreadable: {e}")))
    }
}

fn login_failure_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(serde_json::Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| "Login failed".to_string())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn refresher(server: &MockServer) -> HttpTokenRefresher {
        HttpTokenRefresher::new(
            HttpClient::new().unwrap(),
            &format!("{}/api/v1/", server.uri()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn refresh_posts_refresh_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/token/refresh/"))
            .and(body_json(serde_json::json!({"refresh": "r-1"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access": "a-2", "refresh": "r-2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let issued = refresher(&server).refresh("r-1").await.unwrap();
        assert_eq!(issued.access, "a-2");
        assert_eq!(issued.refresh.as_deref(), Some("r-2"));
    }

    #[tokio::test]
    async fn rejected_refresh_is_session_expired() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = refresher(&server).refresh("stale").await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired(_)));
    }

    #[tokio::test]
    async fn refresh_without_access_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "x"})))
            .mount(&server)
            .await;

        let err = refresher(&server).refresh("r-1").await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired(m) if m.contains("malformed")));
    }

    #[test]
    fn login_failure_message_falls_back() {
        assert_eq!(login_failure_message(br#"{"message":"Invalid credentials"}"#), "Invalid credentials");
        assert_eq!(login_failure_message(br#"{"detail":"nope"}"#), "Login failed");
        assert_eq!(login_failure_message(b"<html>"), "Login failed");
    }
}

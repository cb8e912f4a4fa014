//! Typed JSON calls over the gateway
//!
//! [`ApiClient`] turns paths and serde types into [`ApiRequest`]s and decodes
//! the buffered responses. Authentication, refresh and notices are handled
//! by the [`Gateway`] underneath.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::errors::ApiError;
use super::gateway::Gateway;
use super::request::ApiRequest;

/// Cheap-to-clone handle for typed API calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    gateway: Arc<Gateway>,
}

impl ApiClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Execute a GET request
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode as `T`
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(ApiRequest::get(path)).await
    }

    /// Execute a GET request with query pairs
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode as `T`
    #[instrument(skip(self, query), fields(path = %path, params = query.len()))]
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.call(ApiRequest::get(path).with_query(query)).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    /// Returns error if the body cannot be serialized, the request fails, or
    /// the response does not decode as `R`
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(ApiRequest::post(path).with_json(body)?).await
    }

    /// Execute a POST request without a body
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode as `R`
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(ApiRequest::post(path)).await
    }

    /// Execute a PATCH request with a JSON body
    ///
    /// # Errors
    /// Returns error if the body cannot be serialized, the request fails, or
    /// the response does not decode as `R`
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(ApiRequest::patch(path).with_json(body)?).await
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.gateway.send(request).await?;
        debug!(status = %response.status, bytes = response.body.len(), "response received");
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use chatrizz_common::auth::MemoryCredentialStore;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Echo {
        message: String,
    }

    async fn client(server: &MockServer) -> ApiClient {
        let gateway = Gateway::builder()
            .base_url(server.uri())
            .store(Arc::new(MemoryCredentialStore::with_tokens(Some("tok"), None)))
            .build()
            .unwrap();
        ApiClient::new(Arc::new(gateway))
    }

    #[tokio::test]
    async fn get_query_sends_pairs_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/users/"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Echo { message: "ok".into() }))
            .expect(1)
            .mount(&server)
            .await;

        let echo: Echo = client(&server)
            .await
            .get_query("admin/users/", vec![("page".into(), "2".into())])
            .await
            .unwrap();
        assert_eq!(echo.message, "ok");
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create"))
            .and(body_json(serde_json::json!({"message": "hi"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(Echo { message: "created".into() }))
            .mount(&server)
            .await;

        let echo: Echo =
            client(&server).await.post("create", &Echo { message: "hi".into() }).await.unwrap();
        assert_eq!(echo.message, "created");
    }

    #[tokio::test]
    async fn no_content_decodes_to_unit() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result: Result<(), ApiError> =
            client(&server).await.patch("x/1/", &serde_json::json!({})).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn client_errors_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Not found."})))
            .mount(&server)
            .await;

        let err = client(&server).await.get::<Echo>("missing/").await.unwrap_err();
        assert_eq!(err, ApiError::Client { status: 404, message: "Not found.".into() });
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).await.get::<Echo>("x/").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}

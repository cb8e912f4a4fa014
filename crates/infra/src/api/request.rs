//! Buffered request and response descriptors.
//!
//! Requests are plain data so they can be queued behind a credential refresh
//! and replayed without rebuilding them from their call site.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::ApiError;

/// Method, path relative to the base URL, query pairs and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `body` cannot be serialized
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidInput(format!("Failed to serialize body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Successful response with its body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Deserialize the body.
    ///
    /// 204/205 responses have no body by definition and decode as JSON
    /// `null`, so `()` and `Option<_>` targets succeed.
    ///
    /// # Errors
    /// Returns `Decode` if the body does not match `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::RESET_CONTENT
            || self.body.is_empty()
        {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    self.status.as_u16()
                ))
            });
        }

        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {e}")))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Join `path` onto `base` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("https://x.co/api/v1/", "/admin/team/"), "https://x.co/api/v1/admin/team/");
        assert_eq!(join_url("https://x.co/api/v1", "admin/users/"), "https://x.co/api/v1/admin/users/");
    }

    #[test]
    fn no_content_decodes_to_unit_and_option() {
        let response = ApiResponse { status: StatusCode::NO_CONTENT, body: Vec::new() };
        response.json::<()>().unwrap();
        assert_eq!(response.json::<Option<u32>>().unwrap(), None);
    }

    #[test]
    fn no_content_rejects_structs() {
        #[derive(Debug, Deserialize)]
        struct Needed {
            #[allow(dead_code)]
            id: String,
        }

        let response = ApiResponse { status: StatusCode::RESET_CONTENT, body: Vec::new() };
        assert!(matches!(response.json::<Needed>(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn with_json_captures_body() {
        let request = ApiRequest::post("admin/team/").with_json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(request.body, Some(serde_json::json!({"a": 1})));
        assert_eq!(request.method, Method::POST);
    }
}

//! Authenticated REST client shared by every data accessor.
//!
//! Each request carries `Authorization: Bearer <token>` when the session has
//! one. A 401 from any endpoint logs the session out, whoever made the call.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::shared::api_utils::join_url;
use crate::system::auth::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,

    #[error("Server error ({status})")]
    Server { status: u16 },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound,
            400..=499 => ApiError::Validation(message.unwrap_or_else(|| format!("HTTP {}", status))),
            500..=599 => ApiError::Server { status },
            _ => ApiError::Unexpected(message.unwrap_or_else(|| format!("HTTP {}", status))),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Pull a human readable message out of an error body.
///
/// Understands `{"message": "..."}` and `{"message": ["...", "..."]}`.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            base_url: base_url.into(),
            session,
        }
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self
            .builder(Verb::Get, path)
            .build()
            .map_err(|e| ApiError::Unexpected(format!("Failed to build request: {}", e)))?;
        let response = self.send(request).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.send_json(Verb::Post, path, body).await?;
        decode(response).await
    }

    /// POST whose response body is irrelevant
    pub async fn post_ignore<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize,
    {
        self.send_json(Verb::Post, path, body).await.map(|_| ())
    }

    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize,
    {
        self.send_json(Verb::Patch, path, body).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self
            .builder(Verb::Delete, path)
            .build()
            .map_err(|e| ApiError::Unexpected(format!("Failed to build request: {}", e)))?;
        self.send(request).await.map(|_| ())
    }

    fn builder(&self, verb: Verb, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{} {}", verb.as_str(), url);
        let builder = match verb {
            Verb::Get => Request::get(&url),
            Verb::Post => Request::post(&url),
            Verb::Patch => Request::patch(&url),
            Verb::Delete => Request::delete(&url),
        };
        match self.session.get_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send_json<B>(&self, verb: Verb, path: &str, body: &B) -> Result<Response, ApiError>
    where
        B: Serialize,
    {
        let request = self
            .builder(verb, path)
            .json(body)
            .map_err(|e| ApiError::Unexpected(format!("Failed to serialize request: {}", e)))?;
        self.send(request).await
    }

    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(self.reject(status, &body))
    }

    /// Classify a failed response; a 401 ends the session
    pub(crate) fn reject(&self, status: u16, body: &str) -> ApiError {
        let error = ApiError::from_status(status, extract_message(body));
        if error.is_unauthorized() {
            log::warn!("Request rejected with 401, ending session");
            self.session.logout();
        }
        error
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Unexpected(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::session::tests::logged_in_store;
    use crate::system::auth::session::TOKEN_KEY;
    use crate::shared::storage::KeyValueStore;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(404, Some("gone".into())), ApiError::NotFound);
        assert_eq!(
            ApiError::from_status(400, Some("price must be positive".into())),
            ApiError::Validation("price must be positive".into())
        );
        assert_eq!(
            ApiError::from_status(422, None),
            ApiError::Validation("HTTP 422".into())
        );
        assert_eq!(ApiError::from_status(503, None), ApiError::Server { status: 503 });
        assert!(matches!(ApiError::from_status(302, None), ApiError::Unexpected(_)));
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message":"Email already used"}"#).as_deref(),
            Some("Email already used")
        );
        assert_eq!(
            extract_message(r#"{"message":["name is empty","price is negative"]}"#).as_deref(),
            Some("name is empty; price is negative")
        );
        assert_eq!(extract_message("<html>"), None);
        assert_eq!(extract_message(r#"{"error":"x"}"#), None);
    }

    #[test]
    fn test_unauthorized_ends_session() {
        let (session, storage) = logged_in_store();
        let client = ApiClient::new("http://api", session.clone());

        let error = client.reject(401, "");
        assert!(error.is_unauthorized());
        assert_eq!(session.get_token(), None);
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_other_errors_keep_session() {
        let (session, _storage) = logged_in_store();
        let client = ApiClient::new("http://api", session.clone());

        assert_eq!(client.reject(500, ""), ApiError::Server { status: 500 });
        assert_eq!(client.reject(404, ""), ApiError::NotFound);
        assert!(session.get_token().is_some());
    }

    #[test]
    fn test_url() {
        let (session, _storage) = logged_in_store();
        let client = ApiClient::new("http://api/", session);
        assert_eq!(client.url("/products/1"), "http://api/products/1");
    }
}

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::api::error::ApiError;
use crate::candidates::{Candidate, CandidateInput};
use crate::config;
use crate::session::AdminUser;

/// HTTP client for the PEMIRA backend REST API.
///
/// All calls exchange JSON. Every endpoint except `admin_login` requires a
/// bearer token; attach one with [`ApiClient::with_token`] after login.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Body of a successful `POST /auth/admin-login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminUser,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        // Validate early so a bad URL fails here rather than on first request.
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("invalid backend URL '{}': {}", base_url, e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Build a client from the global [`config`] singleton.
    pub fn from_config() -> Result<Self, ApiError> {
        let backend = &config::config().backend;
        Self::new(&backend.base_url, Duration::from_secs(backend.request_timeout_secs))
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Turn a non-2xx response into an [`ApiError::Backend`], pulling the
    /// human-readable message out of the error body when the backend sent one.
    async fn error_from(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .or_else(|| body.get("error"))
                    .and_then(Value::as_str)
                    .map(String::from)
            });
        ApiError::Backend { status, message }
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    /// `POST /auth/admin-login` — exchange credentials for a session token.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .request(Method::POST, "/auth/admin-login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /candidates?includeDeleted={bool}` — active-only by default.
    pub async fn list_candidates(&self, include_deleted: bool) -> Result<Vec<Candidate>, ApiError> {
        let response = self
            .request(Method::GET, "/candidates")
            .query(&[("includeDeleted", include_deleted)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /candidates` — create; the id is server-assigned.
    pub async fn create_candidate(&self, input: &CandidateInput) -> Result<(), ApiError> {
        let response = self.request(Method::POST, "/candidates").json(input).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `PUT /candidates/{id}` — full-record update.
    pub async fn update_candidate(&self, id: &str, input: &CandidateInput) -> Result<(), ApiError> {
        let response = self
            .request(Method::PUT, &format!("/candidates/{}", id))
            .json(input)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `DELETE /candidates/{id}` — soft-delete (sets `deletedAt`, reversible).
    pub async fn soft_delete_candidate(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/candidates/{}", id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /candidates/{id}/restore` — clear `deletedAt`.
    pub async fn restore_candidate(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, &format!("/candidates/{}/restore", id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `DELETE /candidates/{id}/permanent` — irreversible removal.
    pub async fn permanent_delete_candidate(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/candidates/{}/permanent", id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

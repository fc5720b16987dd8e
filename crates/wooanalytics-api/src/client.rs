//! reqwest implementation of [`JobService`].

use crate::detail::ErrorDetail;
use crate::error::{ApiError, Result};
use crate::service::JobService;
use crate::types::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SyncState,
    SyncStatusResponse, TaskState, TaskStatusResponse,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use wooanalytics_core::{ApiConfig, TaskId};
use zeroize::Zeroizing;

/// HTTP client for the analytics backend.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct HttpJobService {
    client: Client,
    base_url: Url,
    bearer: Option<Zeroizing<String>>,
}

impl HttpJobService {
    /// Create a client from the `[api]` configuration section.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidUrl` if `base_url` cannot carry path segments.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: cannot be used as a base URL"
            )));
        }

        Ok(Self {
            client,
            base_url,
            bearer: None,
        })
    }

    /// Attach a bearer token to every subsequent request.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(Zeroizing::new(token.into()));
        self
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL of an endpoint, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token.or(self.bearer.as_deref().map(String::as_str)) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET an endpoint with the configured bearer token and decode its JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let request = self.authorize(self.client.get(url), None);
        Self::send_json(request, &segments.join("/")).await
    }

    /// Send a request and decode a successful JSON body.
    async fn send_json<T: DeserializeOwned>(request: RequestBuilder, endpoint: &str) -> Result<T> {
        let response = Self::send(request).await?;
        response.json::<T>().await.map_err(|e| ApiError::Parse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Send a request, turning non-success statuses into `ApiError::Status`.
    async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: ErrorDetail::from_text(&body),
        })
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        tracing::info!("Registering account {}", request.email);
        let url = self.endpoint(&["register"])?;
        Self::send_json(self.client.post(url).json(request), "register").await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        tracing::info!("Logging in {}", request.email);
        let url = self.endpoint(&["login"])?;
        Self::send_json(self.client.post(url).json(request), "login").await
    }

    async fn logout(&self, token: Option<&str>) -> Result<()> {
        let url = self.endpoint(&["logout"])?;
        Self::send(self.authorize(self.client.post(url), token)).await?;
        Ok(())
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskState> {
        let url = self.endpoint(&["task-status", task_id.as_str()])?;
        let response: TaskStatusResponse =
            Self::send_json(self.client.get(url), "task-status").await?;
        tracing::debug!("Task {} status: {}", task_id, response.status);
        Ok(response.status)
    }

    async fn sync_status(&self, email: &str) -> Result<SyncState> {
        let url = self.endpoint(&["sync-status", email])?;
        match Self::send_json::<SyncStatusResponse>(self.client.get(url), "sync-status").await {
            Ok(response) => {
                tracing::debug!("Sync status for {}: {}", email, response.state());
                Ok(response.state())
            }
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                tracing::debug!("No sync record for {}", email);
                Ok(SyncState::Unknown)
            }
            Err(e) => Err(e),
        }
    }
}

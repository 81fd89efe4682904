//! REST client for the CRM backend.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::model::{
    CustomerDetail, CustomerPage, DeclineSummary, ErrorBody, LoginRequest, LoginResponse,
    Segment, WeeklySummary,
};

/// Operations the dashboard needs from the backend.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, request: &LoginRequest) -> Result<String>;

    /// Sales and visitor figures for the current week.
    async fn weekly_summary(&self) -> Result<WeeklySummary>;

    /// Declining loyal customers summary.
    async fn decline_summary(&self) -> Result<DeclineSummary>;

    /// One page of customers in `segment`.
    async fn customers(&self, segment: Segment, size: u32, page: u32) -> Result<CustomerPage>;

    /// Full record of one customer.
    async fn customer_detail(&self, customer_id: u64) -> Result<CustomerDetail>;

    /// Replace the bearer token used for authenticated calls.
    fn set_token(&self, token: Option<String>);
}

/// `CrmApi` over HTTP.
pub struct HttpClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpClient {
    /// Build a client from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn token(&self) -> Result<String> {
        self.token
            .read()
            .ok()
            .and_then(|t| t.clone())
            .ok_or(Error::MissingToken)
    }

    /// GET `path` with the bearer token.
    fn authorized_get(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.token()?;
        Ok(self.http.get(self.url(path)).bearer_auth(token))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, fallback: &str) -> Result<T> {
        let response = request.send().await?;
        decode_response(response, true, fallback).await
    }
}

#[async_trait]
impl CrmApi for HttpClient {
    async fn login(&self, request: &LoginRequest) -> Result<String> {
        tracing::info!(business_number = %request.business_number, "Logging in");

        let response = self
            .http
            .post(self.url("auth/login"))
            .json(request)
            .send()
            .await?;

        let body: LoginResponse = decode_response(response, false, "Login failed").await?;
        body.token
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingTokenInResponse)
    }

    async fn weekly_summary(&self) -> Result<WeeklySummary> {
        let request = self.authorized_get("stores/main/weekly")?;
        self.fetch(request, "Failed to load weekly summary").await
    }

    async fn decline_summary(&self) -> Result<DeclineSummary> {
        let request = self.authorized_get("stores/customers/decline")?;
        self.fetch(request, "Failed to load declining loyal customers")
            .await
    }

    async fn customers(&self, segment: Segment, size: u32, page: u32) -> Result<CustomerPage> {
        tracing::debug!(%segment, size, page, "Fetching customers");
        let request = self.authorized_get("stores/customers")?.query(&[
            ("segment", segment.as_str().to_string()),
            ("size", size.to_string()),
            ("page", page.to_string()),
        ]);
        self.fetch(request, "Failed to load customers").await
    }

    async fn customer_detail(&self, customer_id: u64) -> Result<CustomerDetail> {
        let request = self.authorized_get(&format!("stores/customers/{}", customer_id))?;
        self.fetch(request, "Failed to load customer details").await
    }

    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

/// Decode a successful body or map the failure to an [`Error`].
///
/// With `authenticated`, a 401 means the token is no longer valid; otherwise
/// (login) the server message is surfaced.
async fn decode_response<T: DeserializeOwned>(
    response: Response,
    authenticated: bool,
    fallback: &str,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_status(status, &body, authenticated, fallback))
}

/// Build an error from a failed response's status and body.
pub fn error_from_status(
    status: StatusCode,
    body: &str,
    authenticated: bool,
    fallback: &str,
) -> Error {
    if authenticated && status == StatusCode::UNAUTHORIZED {
        return Error::Unauthorized;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    tracing::warn!(status = status.as_u16(), %message, "Backend request failed");

    Error::Api {
        status: status.as_u16(),
        message,
    }
}

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::api::types::*;

/// HTTP client for the check-in API.
#[derive(Clone)]
pub struct CheckInClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CheckInClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Client configured from the page: runtime base URL and the stored token.
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        Self::new(crate::config::api_base_url(), crate::utils::storage::auth_token())
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/check-in{}", self.base_url, path)
    }

    pub fn history_url(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
        let params: Vec<String> = [("start_date", start), ("end_date", end)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|date| format!("{key}={}", date.format("%Y-%m-%d"))))
            .collect();
        if params.is_empty() {
            self.endpoint("")
        } else {
            format!("{}?{}", self.endpoint(""), params.join("&"))
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ApiError::new(CODE_UNAUTHORIZED, "Authentication required"))?;
        Ok(builder.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self
            .authorized(builder)?
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::network(format!("Failed to parse response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_body(status.as_u16(), &body);
            log::warn!("check-in API error {}: {}", status.as_u16(), error.code);
            Err(error)
        }
    }

    pub async fn submit(&self, request: &CheckInRequest) -> Result<CheckInRecord, ApiError> {
        let envelope: CheckInEnvelope = self
            .send(self.client.post(self.endpoint("")).json(request))
            .await?;
        Ok(envelope.check_in)
    }

    pub async fn today(&self) -> Result<TodayStatus, ApiError> {
        self.send(self.client.get(self.endpoint("/today"))).await
    }

    pub async fn history(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<CheckInList, ApiError> {
        self.send(self.client.get(self.history_url(start, end))).await
    }

    pub async fn get(&self, id: &str) -> Result<CheckInRecord, ApiError> {
        let envelope: CheckInEnvelope = self
            .send(self.client.get(self.endpoint(&format!("/{}", id.trim()))))
            .await?;
        Ok(envelope.check_in)
    }
}

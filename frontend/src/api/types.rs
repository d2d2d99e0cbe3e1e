use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub id: String,
    pub user_id: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub check_in_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInEnvelope {
    pub check_in: CheckInRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInListItem {
    pub id: String,
    pub label: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInList {
    pub check_ins: Vec<CheckInListItem>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayStatus {
    pub has_checked_in: bool,
    #[serde(default)]
    pub check_in: Option<CheckInRecord>,
}

pub const CODE_DUPLICATE_CHECK_IN: &str = "DUPLICATE_CHECK_IN";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const CODE_INTERNAL: &str = "INTERNAL_SERVER_ERROR";
pub const CODE_NETWORK: &str = "NETWORK_ERROR";

/// Error body returned by the check-in API, or a client-side stand-in for one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(CODE_NETWORK, message)
    }

    /// Fallback when a failure response carries no parsable error body.
    pub fn from_status(status: u16) -> Self {
        let code = match status {
            401 => CODE_UNAUTHORIZED,
            404 => CODE_NOT_FOUND,
            409 => CODE_DUPLICATE_CHECK_IN,
            500..=599 => CODE_INTERNAL,
            _ => "HTTP_ERROR",
        };
        Self::new(code, format!("Request failed with status {status}"))
    }

    /// Parses a failure body, falling back to [`ApiError::from_status`].
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(mut parsed) => {
                if parsed.code.is_empty() {
                    parsed.code = Self::from_status(status).code;
                }
                parsed
            }
            Err(_) => Self::from_status(status),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.code == CODE_DUPLICATE_CHECK_IN
    }

    pub fn is_not_found(&self) -> bool {
        self.code == CODE_NOT_FOUND
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == CODE_UNAUTHORIZED
    }

    /// Server or transport failures; the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        self.code == CODE_INTERNAL || self.code == CODE_NETWORK
    }

    /// Field messages from a validation failure, if any.
    pub fn validation_messages(&self) -> Vec<String> {
        self.details
            .as_ref()
            .and_then(|details| details.get("errors"))
            .and_then(|errors| errors.as_array())
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }
}

use chrono::{DateTime, Utc};
use crate::geocode::GeocodeError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_ACCURACY_THRESHOLD_METERS: f64 = 50.0;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_ATTEMPT_DELAY: Duration = Duration::from_secs(1);

/// One reading from the positioning capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in meters, when the device reports one.
    pub accuracy_meters: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl PositionFix {
    /// Accuracy usable for comparison; non-finite values count as missing.
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy_meters.filter(|value| value.is_finite())
    }

    /// A reading with a numeric accuracy beats one without; otherwise smaller wins.
    pub fn is_more_accurate_than(&self, other: &PositionFix) -> bool {
        match (self.accuracy(), other.accuracy()) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn meets_threshold(&self, threshold_meters: f64) -> bool {
        self.accuracy()
            .is_some_and(|accuracy| accuracy <= threshold_meters)
    }
}

/// Options for a single one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionSettings {
    pub max_attempts: u32,
    pub accuracy_threshold_meters: f64,
    pub per_attempt_timeout: Duration,
    pub inter_attempt_delay: Duration,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            accuracy_threshold_meters: DEFAULT_ACCURACY_THRESHOLD_METERS,
            per_attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            inter_attempt_delay: DEFAULT_ATTEMPT_DELAY,
        }
    }
}

impl AcquisitionSettings {
    /// Every attempt asks for a fresh, high-accuracy reading.
    pub fn position_request(&self) -> PositionRequest {
        PositionRequest {
            high_accuracy: true,
            timeout: self.per_attempt_timeout,
            maximum_age: Duration::ZERO,
        }
    }
}

/// The chosen fix together with its reverse-geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub fix: PositionFix,
    pub address: String,
}

impl LocationSample {
    /// True when the fix is known to be worse than `threshold_meters`.
    ///
    /// A fix without an accuracy value is not flagged.
    pub fn is_low_accuracy(&self, threshold_meters: f64) -> bool {
        self.fix
            .accuracy()
            .is_some_and(|accuracy| accuracy > threshold_meters)
    }

    pub fn rounded_accuracy(&self) -> Option<i64> {
        self.fix.accuracy().map(|accuracy| accuracy.round() as i64)
    }
}

/// Failure reported by a position source for a single request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionFailure {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Geolocation is not supported by your browser")]
    CapabilityUnavailable,
    #[error("Failed to get location: {0}")]
    PermissionDenied(String),
    #[error("Failed to get location: {0}")]
    Timeout(String),
    #[error("Failed to get location: {0}")]
    PositionUnavailable(String),
    #[error("Could not obtain location")]
    NoFixObtained,
    #[error("Failed to get address from coordinates: {reason}")]
    AddressResolutionFailed { fix: PositionFix, reason: String },
}

impl From<PositionFailure> for AcquisitionError {
    fn from(failure: PositionFailure) -> Self {
        match failure {
            PositionFailure::PermissionDenied(message) => Self::PermissionDenied(message),
            PositionFailure::Timeout(message) => Self::Timeout(message),
            PositionFailure::PositionUnavailable(message) => Self::PositionUnavailable(message),
        }
    }
}

impl AcquisitionError {
    /// Coordinates still known despite the failure.
    pub fn fix(&self) -> Option<&PositionFix> {
        match self {
            Self::AddressResolutionFailed { fix, .. } => Some(fix),
            _ => None,
        }
    }
}

/// One-shot positioning capability.
#[allow(async_fn_in_trait)]
pub trait PositionSource {
    fn is_available(&self) -> bool;

    async fn request_position(
        &self,
        request: &PositionRequest,
    ) -> Result<PositionFix, PositionFailure>;
}

/// Reverse geocoder: coordinates to a display address.
#[allow(async_fn_in_trait)]
pub trait AddressResolver {
    async fn resolve(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError>;
}

#[allow(async_fn_in_trait)]
pub trait Delay {
    async fn wait(&self, duration: Duration);
}

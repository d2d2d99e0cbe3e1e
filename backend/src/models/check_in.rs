use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{ValidationError, ValidationErrors};

use crate::{
    types::{CheckInId, UserId},
    validation::rules,
};

pub const MAX_LABEL_LENGTH: usize = 200;
pub const MAX_ADDRESS_LENGTH: usize = 1000;

/// A persisted attendance event. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CheckIn {
    pub id: CheckInId,
    pub user_id: UserId,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    /// Local calendar day of `created_at` in the configured zone.
    pub check_in_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn new(
        user_id: UserId,
        input: ValidCheckIn,
        check_in_day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CheckInId::new(),
            user_id,
            label: input.label,
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address,
            check_in_day,
            created_at: now,
        }
    }
}

/// Raw check-in submission. Every field is optional here so that missing values
/// surface as validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewCheckIn {
    #[serde(default, alias = "checkInLocation")]
    pub label: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, alias = "currentAddress")]
    pub address: Option<String>,
}

/// A submission that passed [`NewCheckIn::validate_input`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCheckIn {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl NewCheckIn {
    pub fn validate_input(&self) -> Result<ValidCheckIn, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let label = required_text(&mut errors, "label", self.label.as_deref(), MAX_LABEL_LENGTH);
        let address = required_text(
            &mut errors,
            "address",
            self.address.as_deref(),
            MAX_ADDRESS_LENGTH,
        );
        let latitude = required_coordinate(&mut errors, "latitude", self.latitude);
        let longitude = required_coordinate(&mut errors, "longitude", self.longitude);

        match (label, latitude, longitude, address) {
            (Some(label), Some(latitude), Some(longitude), Some(address)) => {
                Ok(ValidCheckIn {
                    label,
                    latitude,
                    longitude,
                    address,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, ValidationError::new("required"));
        return None;
    };
    if let Err(err) = rules::validate_not_blank(value) {
        errors.add(field, err);
        return None;
    }
    let trimmed = value.trim();
    if trimmed.chars().count() > max_len {
        errors.add(field, ValidationError::new("too_long"));
        return None;
    }
    Some(trimmed.to_string())
}

fn required_coordinate(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<f64>,
) -> Option<f64> {
    let Some(value) = value else {
        errors.add(field, ValidationError::new("required"));
        return None;
    };
    if let Err(err) = rules::validate_finite(value) {
        errors.add(field, err);
        return None;
    }
    Some(value)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub id: CheckInId,
    pub user_id: UserId,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub check_in_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<CheckIn> for CheckInResponse {
    fn from(check_in: CheckIn) -> Self {
        Self {
            id: check_in.id,
            user_id: check_in.user_id,
            label: check_in.label,
            latitude: check_in.latitude,
            longitude: check_in.longitude,
            address: check_in.address,
            check_in_day: check_in.check_in_day,
            created_at: check_in.created_at,
        }
    }
}

/// Envelope for single-record responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInEnvelope {
    pub check_in: CheckInResponse,
}

/// History row with display date/time rendered in the configured zone.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInListItem {
    pub id: CheckInId,
    pub label: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

impl CheckInListItem {
    pub fn from_record(check_in: CheckIn, tz: &Tz) -> Self {
        let local = check_in.created_at.with_timezone(tz);
        Self {
            id: check_in.id,
            label: check_in.label,
            address: check_in.address,
            date: local.format("%Y-%m-%d").to_string(),
            time: local.format("%H:%M:%S").to_string(),
            created_at: check_in.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInListResponse {
    pub check_ins: Vec<CheckInListItem>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodayStatusResponse {
    pub has_checked_in: bool,
    pub check_in: Option<CheckInResponse>,
}

/// Query string of the list endpoint. Bounds accept RFC 3339 timestamps or
/// `YYYY-MM-DD` dates.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckInListQuery {
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::flatten_errors;
    use chrono::TimeZone;

    fn complete() -> NewCheckIn {
        NewCheckIn {
            label: Some("  Office ".into()),
            latitude: Some(35.6812),
            longitude: Some(139.7671),
            address: Some("1 Chome Marunouchi, Tokyo".into()),
        }
    }

    #[test]
    fn validate_input_trims_text_fields() {
        let valid = complete().validate_input().expect("valid");
        assert_eq!(valid.label, "Office");
        assert_eq!(valid.latitude, 35.6812);
    }

    #[test]
    fn validate_input_reports_every_missing_field() {
        let errors = NewCheckIn::default().validate_input().unwrap_err();
        assert_eq!(
            flatten_errors(&errors),
            vec![
                "address: required",
                "label: required",
                "latitude: required",
                "longitude: required",
            ]
        );
    }

    #[test]
    fn validate_input_rejects_blank_and_oversized_text() {
        let mut input = complete();
        input.label = Some("   ".into());
        input.address = Some("a".repeat(MAX_ADDRESS_LENGTH + 1));
        let errors = input.validate_input().unwrap_err();
        assert_eq!(
            flatten_errors(&errors),
            vec!["address: too_long", "label: blank"]
        );
    }

    #[test]
    fn validate_input_accepts_out_of_range_coordinates() {
        let mut input = complete();
        input.latitude = Some(123.0);
        input.longitude = Some(-500.0);
        assert!(input.validate_input().is_ok());
    }

    #[test]
    fn new_check_in_accepts_legacy_field_names() {
        let input: NewCheckIn = serde_json::from_str(
            r#"{"checkInLocation":"Home","latitude":1.5,"longitude":2.5,"currentAddress":"Somewhere"}"#,
        )
        .unwrap();
        assert_eq!(input.label.as_deref(), Some("Home"));
        assert_eq!(input.address.as_deref(), Some("Somewhere"));
    }

    #[test]
    fn list_item_formats_in_configured_zone() {
        let record = CheckIn {
            id: CheckInId::new(),
            user_id: UserId::parse("u1").unwrap(),
            label: "Office".into(),
            latitude: 0.0,
            longitude: 0.0,
            address: "Somewhere".into(),
            check_in_day: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 23, 30, 0).unwrap(),
        };
        let item = CheckInListItem::from_record(record, &chrono_tz::Asia::Tokyo);
        assert_eq!(item.date, "2024-03-06");
        assert_eq!(item.time, "08:30:00");
    }
}

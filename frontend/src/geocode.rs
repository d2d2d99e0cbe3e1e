//! Reverse geocoding against OpenStreetMap Nominatim.

use reqwest::Client;
use serde::Deserialize;

use crate::geolocation::AddressResolver;

pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("geocoder responded with status {0}")]
    Status(u16),
    #[error("geocoder returned no address")]
    MissingAddress,
    #[error("invalid geocoder response: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct NominatimResolver {
    client: Client,
    base_url: String,
}

impl Default for NominatimResolver {
    fn default() -> Self {
        Self::new(NOMINATIM_BASE_URL)
    }
}

impl NominatimResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, latitude, longitude
        )
    }
}

/// Extracts `display_name` from a Nominatim reverse response body.
pub fn parse_reverse_response(body: &str) -> Result<String, GeocodeError> {
    let parsed: ReverseResponse =
        serde_json::from_str(body).map_err(|err| GeocodeError::InvalidBody(err.to_string()))?;
    if let Some(message) = parsed.error {
        log::debug!("nominatim error: {message}");
        return Err(GeocodeError::MissingAddress);
    }
    parsed
        .display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(GeocodeError::MissingAddress)
}

impl AddressResolver for NominatimResolver {
    async fn resolve(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        let response = self
            .client
            .get(self.reverse_url(latitude, longitude))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;
        parse_reverse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_url_uses_json_format_and_coordinates() {
        let resolver = NominatimResolver::new("https://geo.example.test/");
        assert_eq!(
            resolver.reverse_url(35.6812, 139.7671),
            "https://geo.example.test/reverse?format=json&lat=35.6812&lon=139.7671"
        );
        assert_eq!(
            NominatimResolver::default().reverse_url(-33.5, 151.25),
            "https://nominatim.openstreetmap.org/reverse?format=json&lat=-33.5&lon=151.25"
        );
    }

    #[test]
    fn parse_reverse_response_reads_display_name() {
        let body = r#"{"place_id":1,"display_name":" Tokyo Station, Marunouchi, Tokyo ","lat":"35.68"}"#;
        assert_eq!(
            parse_reverse_response(body).unwrap(),
            "Tokyo Station, Marunouchi, Tokyo"
        );
    }

    #[test]
    fn parse_reverse_response_rejects_missing_or_error_bodies() {
        assert_eq!(
            parse_reverse_response(r#"{"error":"Unable to geocode"}"#),
            Err(GeocodeError::MissingAddress)
        );
        assert_eq!(
            parse_reverse_response(r#"{"display_name":""}"#),
            Err(GeocodeError::MissingAddress)
        );
        assert!(matches!(
            parse_reverse_response("<html>"),
            Err(GeocodeError::InvalidBody(_))
        ));
    }
}

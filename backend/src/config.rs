use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{env, net::IpAddr};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Reference zone for the calendar-day boundary of the one-check-in-per-day rule.
    pub time_zone: Tz,
    pub bind_address: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone = parse_time_zone(&time_zone_name)?;

        let bind_address_raw = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
        let bind_address: IpAddr = bind_address_raw
            .parse()
            .map_err(|_| anyhow!("Invalid BIND_ADDRESS value: {}", bind_address_raw))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Ok(Config {
            database_url,
            jwt_secret,
            time_zone,
            bind_address,
            port,
        })
    }
}

pub fn parse_time_zone(name: &str) -> anyhow::Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_zone_accepts_iana_names() {
        assert_eq!(parse_time_zone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert_eq!(parse_time_zone(" UTC ").unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn parse_time_zone_rejects_unknown_names() {
        let err = parse_time_zone("Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("APP_TIMEZONE"));
    }
}

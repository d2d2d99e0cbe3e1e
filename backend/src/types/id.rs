//! Typed ID wrappers for compile-time type safety.
//!
//! Check-in ids are server-generated UUIDs. User ids come from the external
//! identity provider and are kept opaque.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a check-in record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(transparent)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct CheckInId(Uuid);

impl CheckInId {
    /// Creates a new random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CheckInId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CheckInId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CheckInId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl From<Uuid> for CheckInId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("user id must not be empty")]
pub struct EmptyUserId;

/// Opaque identity of the user owning a check-in.
///
/// Always non-empty; construct with [`UserId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type, ToSchema)]
#[sqlx(transparent)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct UserId(String);

impl UserId {
    pub fn parse(value: impl AsRef<str>) -> Result<Self, EmptyUserId> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = EmptyUserId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_blank_values() {
        assert_eq!(UserId::parse(""), Err(EmptyUserId));
        assert_eq!(UserId::parse("   "), Err(EmptyUserId));
        assert_eq!(UserId::parse(" 64f0c2 ").unwrap().as_str(), "64f0c2");
    }

    #[test]
    fn user_id_deserialize_rejects_empty_string() {
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
        let id: UserId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn check_in_id_round_trips_through_display() {
        let id = CheckInId::new();
        let parsed: CheckInId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(CheckInId::from(*id.as_uuid()), id);
        assert!("not-a-uuid".parse::<CheckInId>().is_err());
    }
}

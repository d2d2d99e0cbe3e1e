use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    models::check_in::{CheckIn, NewCheckIn},
    repositories::check_in::{CheckInRepositoryTrait, StoreError},
    types::{CheckInId, UserId},
    utils::time::{self, Clock, DayWindow},
    validation::flatten_errors,
};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Unauthorized. Missing or invalid token")]
    Unauthorized,
    #[error("Invalid check-in data: {}", .0.join(", "))]
    InvalidInput(Vec<String>),
    #[error("You have already checked in today")]
    DuplicateCheckIn,
    #[error("Check-in not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(anyhow::Error),
}

impl LedgerError {
    /// Whether a client may reasonably retry the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateDay => LedgerError::DuplicateCheckIn,
            StoreError::Database(inner) => LedgerError::Storage(inner.into()),
        }
    }
}

/// Inclusive `created_at` bounds for history queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Builds a range from raw query values; see [`time::parse_range_bound`].
    pub fn parse(start: Option<&str>, end: Option<&str>, tz: &Tz) -> Result<Self, LedgerError> {
        let start = parse_bound("start_date", start, tz, false)?;
        let end = parse_bound("end_date", end, tz, true)?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(LedgerError::InvalidInput(vec![
                    "start_date: after_end_date".to_string(),
                ]));
            }
        }
        Ok(Self { start, end })
    }
}

fn parse_bound(
    field: &str,
    raw: Option<&str>,
    tz: &Tz,
    end_of_day: bool,
) -> Result<Option<DateTime<Utc>>, LedgerError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => time::parse_range_bound(value, tz, end_of_day)
            .map(Some)
            .ok_or_else(|| LedgerError::InvalidInput(vec![format!("{}: invalid_date", field)])),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodayStatus {
    pub window: DayWindow,
    pub check_in: Option<CheckIn>,
}

impl TodayStatus {
    pub fn has_checked_in(&self) -> bool {
        self.check_in.is_some()
    }
}

/// Daily attendance ledger: at most one check-in per identity per local day.
#[derive(Clone)]
pub struct CheckInLedger {
    repo: Arc<dyn CheckInRepositoryTrait>,
    clock: Arc<dyn Clock>,
    time_zone: Tz,
}

impl CheckInLedger {
    pub fn new(repo: Arc<dyn CheckInRepositoryTrait>, clock: Arc<dyn Clock>, time_zone: Tz) -> Self {
        Self {
            repo,
            clock,
            time_zone,
        }
    }

    pub fn time_zone(&self) -> &Tz {
        &self.time_zone
    }

    /// Window of the local day containing the clock's current instant.
    pub fn current_window(&self) -> DayWindow {
        time::day_window(self.clock.now(), &self.time_zone)
    }

    pub async fn submit_check_in(
        &self,
        identity: &UserId,
        input: NewCheckIn,
    ) -> Result<CheckIn, LedgerError> {
        let valid = input
            .validate_input()
            .map_err(|errors| LedgerError::InvalidInput(flatten_errors(&errors)))?;

        let now = self.clock.now();
        let window = time::day_window(now, &self.time_zone);

        // Fast path only; the store's (user, day) constraint is the real guard.
        if self
            .repo
            .find_for_user_in_window(identity, window.start, window.end)
            .await?
            .is_some()
        {
            tracing::debug!(user_id = %identity, day = %window.day, "duplicate check-in rejected");
            return Err(LedgerError::DuplicateCheckIn);
        }

        let record = CheckIn::new(identity.clone(), valid, window.day, now);
        let saved = self.repo.insert(&record).await.map_err(|err| {
            if matches!(err, StoreError::DuplicateDay) {
                tracing::debug!(user_id = %identity, day = %window.day, "concurrent duplicate check-in rejected");
            }
            LedgerError::from(err)
        })?;

        tracing::info!(
            user_id = %identity,
            check_in_id = %saved.id,
            day = %saved.check_in_day,
            "check-in recorded"
        );
        Ok(saved)
    }

    /// Returns the record only when it belongs to `identity`. Unknown ids, ids owned
    /// by someone else and unparsable ids all yield the same `NotFound`.
    pub async fn get_by_id(&self, identity: &UserId, raw_id: &str) -> Result<CheckIn, LedgerError> {
        let id: CheckInId = raw_id.parse().map_err(|_| LedgerError::NotFound)?;
        self.repo
            .find_for_user(identity, id)
            .await?
            .ok_or(LedgerError::NotFound)
    }

    pub async fn list_by_range(
        &self,
        identity: &UserId,
        range: DateRange,
    ) -> Result<Vec<CheckIn>, LedgerError> {
        let rows = self
            .repo
            .list_for_user(identity, range.start, range.end)
            .await?;
        Ok(rows)
    }

    pub async fn get_today_status(&self, identity: &UserId) -> Result<TodayStatus, LedgerError> {
        let window = self.current_window();
        let check_in = self
            .repo
            .find_for_user_in_window(identity, window.start, window.end)
            .await?;
        Ok(TodayStatus { window, check_in })
    }
}

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::{Arc, Mutex};

/// Source of the current instant, injectable so day-boundary logic can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.lock() {
            *guard = instant;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.instant.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Half-open `[start, end)` interval covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// First instant of `date` in `tz`.
///
/// Midnight can be skipped by a DST jump in some zones; the first existing
/// local time after it is used instead.
pub fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let mut local = date.and_time(NaiveTime::MIN);
    for _ in 0..48 {
        if let Some(instant) = tz.from_local_datetime(&local).earliest() {
            return instant.with_timezone(&Utc);
        }
        local += Duration::minutes(30);
    }
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// The local calendar day containing `instant`, as a UTC window ending at the next
/// local midnight (23 or 25 hours long across DST transitions).
pub fn day_window(instant: DateTime<Utc>, tz: &Tz) -> DayWindow {
    let day = instant.with_timezone(tz).date_naive();
    let next_day = day.succ_opt().unwrap_or(day);
    DayWindow {
        day,
        start: local_midnight(day, tz),
        end: local_midnight(next_day, tz),
    }
}

/// Parses a range bound given either as an RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date. Plain dates resolve to the start of that local day, or to
/// the last instant of it when `end_of_day` is set.
pub fn parse_range_bound(raw: &str, tz: &Tz, end_of_day: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    if end_of_day {
        let next_day = date.succ_opt()?;
        Some(local_midnight(next_day, tz) - Duration::nanoseconds(1))
    } else {
        Some(local_midnight(date, tz))
    }
}

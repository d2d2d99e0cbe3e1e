//! In-process check-in store.
//!
//! Used when no `DATABASE_URL` is configured and by the API tests. The
//! `(user_id, check_in_day)` uniqueness check and the insert happen under one
//! lock, mirroring the unique index of the Postgres schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tokio::sync::Mutex;

use crate::models::check_in::CheckIn;
use crate::repositories::check_in::{CheckInRepositoryTrait, StoreError};
use crate::types::{CheckInId, UserId};

#[derive(Debug, Default)]
pub struct InMemoryCheckInRepository {
    records: Mutex<Vec<CheckIn>>,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl CheckInRepositoryTrait for InMemoryCheckInRepository {
    async fn insert(&self, item: &CheckIn) -> Result<CheckIn, StoreError> {
        let mut records = self.records.lock().await;
        let taken = records
            .iter()
            .any(|r| r.user_id == item.user_id && r.check_in_day == item.check_in_day);
        if taken {
            return Err(StoreError::DuplicateDay);
        }
        records.push(item.clone());
        Ok(item.clone())
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: CheckInId,
    ) -> Result<Option<CheckIn>, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .find(|r| r.id == id && &r.user_id == user_id)
            .cloned())
    }

    async fn find_for_user_in_window(
        &self,
        user_id: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| &r.user_id == user_id && r.created_at >= start && r.created_at < end)
            .min_by_key(|r| r.created_at)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CheckIn>, StoreError> {
        let records = self.records.lock().await;
        let mut rows: Vec<CheckIn> = records
            .iter()
            .filter(|r| &r.user_id == user_id)
            .filter(|r| from.map_or(true, |f| r.created_at >= f))
            .filter(|r| to.map_or(true, |t| r.created_at <= t))
            .cloned()
            .collect();
        rows.sort_by_key(|r| Reverse((r.created_at, *r.id.as_uuid())));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::check_in::ValidCheckIn;
    use chrono::{NaiveDate, TimeZone};

    fn record(user: &str, day: u32, hour: u32) -> CheckIn {
        let input = ValidCheckIn {
            label: "Office".into(),
            latitude: 1.0,
            longitude: 2.0,
            address: "Main St".into(),
        };
        CheckIn::new(
            UserId::parse(user).unwrap(),
            input,
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn insert_rejects_second_record_for_same_day() {
        let repo = InMemoryCheckInRepository::new();
        assert!(repo.is_empty().await);
        repo.insert(&record("u1", 1, 8)).await.unwrap();
        let err = repo.insert(&record("u1", 1, 17)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateDay));
        repo.insert(&record("u2", 1, 9)).await.unwrap();
        repo.insert(&record("u1", 2, 8)).await.unwrap();
        assert_eq!(repo.len().await, 3);
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let repo = InMemoryCheckInRepository::new();
        for day in [3, 1, 2] {
            repo.insert(&record("u1", day, 8)).await.unwrap();
        }
        repo.insert(&record("u2", 4, 8)).await.unwrap();

        let user = UserId::parse("u1").unwrap();
        let rows = repo.list_for_user(&user, None, None).await.unwrap();
        let days: Vec<u32> = rows
            .iter()
            .map(|r| chrono::Datelike::day(&r.check_in_day))
            .collect();
        assert_eq!(days, vec![3, 2, 1]);
    }
}

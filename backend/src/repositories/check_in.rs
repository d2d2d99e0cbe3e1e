//! Check-in repository trait for dependency injection and testing.
//!
//! This module defines the CheckInRepositoryTrait which can be mocked
//! using mockall for testing purposes, and its Postgres implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::check_in::CheckIn;
use crate::types::{CheckInId, UserId};

/// Name of the unique index over `(user_id, check_in_day)`.
pub const USER_DAY_CONSTRAINT: &str = "check_ins_user_day_key";

const SELECT_COLUMNS: &str =
    "id, user_id, label, latitude, longitude, address, check_in_day, created_at";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a check-in already exists for this user and day")]
    DuplicateDay,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository trait for CheckIn operations.
///
/// This trait is designed to be mocked using mockall for testing.
/// Use `MockCheckInRepositoryTrait` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInRepositoryTrait: Send + Sync {
    /// Insert a new record. Fails with [`StoreError::DuplicateDay`] when the
    /// user already has a record for `item.check_in_day`.
    async fn insert(&self, item: &CheckIn) -> Result<CheckIn, StoreError>;

    /// Find a record by id, scoped to its owner
    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: CheckInId,
    ) -> Result<Option<CheckIn>, StoreError>;

    /// Find the earliest record created in `[start, end)`
    async fn find_for_user_in_window(
        &self,
        user_id: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError>;

    /// List records newest-first, optionally bounded by inclusive `created_at` limits
    async fn list_for_user(
        &self,
        user_id: &UserId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CheckIn>, StoreError>;
}

/// Postgres implementation of CheckInRepositoryTrait
#[derive(Debug, Clone)]
pub struct PgCheckInRepository {
    pool: PgPool,
}

impl PgCheckInRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckInRepositoryTrait for PgCheckInRepository {
    async fn insert(&self, item: &CheckIn) -> Result<CheckIn, StoreError> {
        let query = format!(
            "INSERT INTO check_ins (id, user_id, label, latitude, longitude, address, check_in_day, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, CheckIn>(&query)
            .bind(item.id)
            .bind(&item.user_id)
            .bind(&item.label)
            .bind(item.latitude)
            .bind(item.longitude)
            .bind(&item.address)
            .bind(item.check_in_day)
            .bind(item.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;
        Ok(row)
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: CheckInId,
    ) -> Result<Option<CheckIn>, StoreError> {
        let query = format!(
            "SELECT {} FROM check_ins WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, CheckIn>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_for_user_in_window(
        &self,
        user_id: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError> {
        let query = format!(
            "SELECT {} FROM check_ins \
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3 \
             ORDER BY created_at ASC LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CheckIn>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM check_ins WHERE user_id = ",
            SELECT_COLUMNS
        ));
        builder.push_bind(user_id.clone());

        if let Some(f) = from {
            builder.push(" AND created_at >= ").push_bind(f);
        }
        if let Some(t) = to {
            builder.push(" AND created_at <= ").push_bind(t);
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder
            .build_query_as::<CheckIn>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(USER_DAY_CONSTRAINT) {
            return StoreError::DuplicateDay;
        }
    }
    StoreError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_check_in_repository_trait_bounds() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockCheckInRepositoryTrait>();
    }

    #[derive(Debug, thiserror::Error)]
    #[error("duplicate key value violates unique constraint")]
    struct ConstraintViolation(Option<&'static str>);

    impl sqlx::error::DatabaseError for ConstraintViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.0
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn user_day_constraint_violation_maps_to_duplicate_day() {
        let err = map_unique_violation(sqlx::Error::Database(Box::new(ConstraintViolation(
            Some(USER_DAY_CONSTRAINT),
        ))));
        assert!(matches!(err, StoreError::DuplicateDay));
    }

    #[test]
    fn other_constraint_violations_stay_database_errors() {
        let err = map_unique_violation(sqlx::Error::Database(Box::new(ConstraintViolation(
            Some("check_ins_pkey"),
        ))));
        assert!(matches!(err, StoreError::Database(sqlx::Error::Database(_))));

        let err = map_unique_violation(sqlx::Error::Database(Box::new(ConstraintViolation(None))));
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn non_database_errors_are_not_duplicates() {
        let err = map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use checkin_backend::{
    models::check_in::{CheckIn, ValidCheckIn},
    repositories::{CheckInRepositoryTrait, PgCheckInRepository, StoreError},
    types::UserId,
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[path = "support/mod.rs"]
mod support;

async fn integration_guard() -> tokio::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(())).lock().await
}

fn unique_user() -> UserId {
    UserId::parse(format!("user-{}", Uuid::new_v4())).expect("user id")
}

fn record(user: &UserId, day: NaiveDate, at: DateTime<Utc>, label: &str) -> CheckIn {
    CheckIn::new(
        user.clone(),
        ValidCheckIn {
            label: label.to_string(),
            latitude: 35.6812,
            longitude: 139.7671,
            address: "Marunouchi, Tokyo".to_string(),
        },
        day,
        at,
    )
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
#[ignore = "requires Postgres: set TEST_DATABASE_URL or run Docker, then pass --ignored"]
async fn insert_enforces_one_record_per_user_and_day() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;
    let repo = PgCheckInRepository::new(pool);
    let user = unique_user();
    let at = Utc.with_ymd_and_hms(2024, 6, 3, 0, 30, 0).unwrap();

    let saved = repo
        .insert(&record(&user, day(2024, 6, 3), at, "first"))
        .await
        .expect("insert first");
    assert_eq!(saved.label, "first");

    let err = repo
        .insert(&record(&user, day(2024, 6, 3), at + Duration::hours(3), "second"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateDay));

    repo.insert(&record(&user, day(2024, 6, 4), at + Duration::days(1), "next"))
        .await
        .expect("insert next day");
    repo.insert(&record(&unique_user(), day(2024, 6, 3), at, "other user"))
        .await
        .expect("insert other user");
}

#[tokio::test]
#[ignore = "requires Postgres: set TEST_DATABASE_URL or run Docker, then pass --ignored"]
async fn concurrent_inserts_for_same_day_keep_one() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;
    let repo = Arc::new(PgCheckInRepository::new(pool));
    let user = unique_user();
    let at = Utc.with_ymd_and_hms(2024, 6, 3, 0, 30, 0).unwrap();

    let handles: Vec<_> = (0..6)
        .map(|n| {
            let repo = repo.clone();
            let item = record(&user, day(2024, 6, 3), at, &format!("tab {n}"));
            tokio::spawn(async move { repo.insert(&item).await })
        })
        .collect();

    let mut ok = 0;
    for handle in handles {
        match handle.await.expect("join") {
            Ok(_) => ok += 1,
            Err(StoreError::DuplicateDay) => {}
            Err(other) => panic!("unexpected store error: {other}"),
        }
    }
    assert_eq!(ok, 1);

    let rows = repo.list_for_user(&user, None, None).await.expect("list");
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
#[ignore = "requires Postgres: set TEST_DATABASE_URL or run Docker, then pass --ignored"]
async fn lookups_are_scoped_to_owner_and_ordered() {
    let _guard = integration_guard().await;
    let pool = support::test_pool().await;
    let repo = PgCheckInRepository::new(pool);
    let owner = unique_user();
    let stranger = unique_user();
    let base = Utc.with_ymd_and_hms(2024, 6, 3, 0, 30, 0).unwrap();

    let mut saved = Vec::new();
    for offset in 0..3 {
        let at = base + Duration::days(offset);
        let item = record(&owner, at.date_naive(), at, &format!("day {offset}"));
        saved.push(repo.insert(&item).await.expect("insert"));
    }

    let found = repo
        .find_for_user(&owner, saved[0].id)
        .await
        .expect("find own");
    assert_eq!(found.map(|r| r.id), Some(saved[0].id));
    assert!(repo
        .find_for_user(&stranger, saved[0].id)
        .await
        .expect("find foreign")
        .is_none());

    let all = repo.list_for_user(&owner, None, None).await.expect("list");
    let labels: Vec<&str> = all.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["day 2", "day 1", "day 0"]);

    // Inclusive bounds on both ends.
    let bounded = repo
        .list_for_user(
            &owner,
            Some(base + Duration::days(1)),
            Some(base + Duration::days(2)),
        )
        .await
        .expect("bounded list");
    assert_eq!(bounded.len(), 2);

    let window_hit = repo
        .find_for_user_in_window(&owner, base, base + Duration::hours(1))
        .await
        .expect("window");
    assert_eq!(window_hit.map(|r| r.id), Some(saved[0].id));

    // End of the window is exclusive.
    let window_miss = repo
        .find_for_user_in_window(&owner, base - Duration::hours(1), base)
        .await
        .expect("window");
    assert!(window_miss.is_none());
}

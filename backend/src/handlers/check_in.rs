use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        check_in::{
            CheckInEnvelope, CheckInListItem, CheckInListQuery, CheckInListResponse,
            CheckInResponse, NewCheckIn, TodayStatusResponse,
        },
        identity::{AuthProbeResponse, AuthenticatedUser},
    },
    services::ledger::DateRange,
    state::AppState,
};

pub async fn create_check_in(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<NewCheckIn>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckInEnvelope>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::Validation(vec![format!("body: {}", rejection.body_text())])
    })?;

    let check_in = state.ledger.submit_check_in(&user.user_id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckInEnvelope {
            check_in: CheckInResponse::from(check_in),
        }),
    ))
}

pub async fn list_check_ins(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<CheckInListQuery>, QueryRejection>,
) -> Result<Json<CheckInListResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::Validation(vec![format!("query: {}", rejection.body_text())])
    })?;
    let tz = *state.ledger.time_zone();
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref(), &tz)?;

    let check_ins: Vec<CheckInListItem> = state
        .ledger
        .list_by_range(&user.user_id, range)
        .await?
        .into_iter()
        .map(|record| CheckInListItem::from_record(record, &tz))
        .collect();

    Ok(Json(CheckInListResponse {
        count: check_ins.len(),
        check_ins,
    }))
}

pub async fn get_check_in(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<CheckInEnvelope>, AppError> {
    let check_in = state.ledger.get_by_id(&user.user_id, &id).await?;
    Ok(Json(CheckInEnvelope {
        check_in: CheckInResponse::from(check_in),
    }))
}

pub async fn get_today_check_in(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TodayStatusResponse>, AppError> {
    let status = state.ledger.get_today_status(&user.user_id).await?;
    Ok(Json(TodayStatusResponse {
        has_checked_in: status.has_checked_in(),
        check_in: status.check_in.map(CheckInResponse::from),
    }))
}

/// Echoes the caller's identity; used by clients to probe their token.
pub async fn auth_probe(user: AuthenticatedUser) -> Json<AuthProbeResponse> {
    Json(AuthProbeResponse {
        message: "Authentication working".to_string(),
        user,
    })
}

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    config::Config,
    error::AppError,
    models::identity::AuthenticatedUser,
    state::AppState,
    types::UserId,
    utils::jwt::verify_access_token,
};

const MISSING_TOKEN: &str = "Unauthorized. Please add valid token";
const INVALID_PAYLOAD: &str = "Unauthorized. Invalid token payload";

/// Verifies the bearer token and attaches an [`AuthenticatedUser`] to the request.
/// Every failure is a 401; nothing reaches the handlers unauthenticated.
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let user = authenticate_request(auth_header, &state.config)?;
    tracing::debug!(user_id = %user.user_id, "request authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

pub fn authenticate_request(
    auth_header: Option<&str>,
    config: &Config,
) -> Result<AuthenticatedUser, AppError> {
    let token = auth_header
        .and_then(parse_bearer_token)
        .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))?;

    let claims = verify_access_token(token, &config.jwt_secret).map_err(|err| {
        tracing::debug!(error = %err, "token verification failed");
        AppError::Unauthorized(MISSING_TOKEN.to_string())
    })?;

    let user_id = claims
        .subject()
        .and_then(|subject| UserId::parse(subject).ok())
        .ok_or_else(|| AppError::Unauthorized(INVALID_PAYLOAD.to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        name: claims.display_name().map(str::to_owned),
    })
}

/// Handlers take the identity as an extractor; a route mounted without the
/// auth layer answers 401 instead of running with no owner.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))
    }
}

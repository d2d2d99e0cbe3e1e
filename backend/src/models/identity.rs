use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::UserId;

/// Verified caller identity, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthProbeResponse {
    pub message: String,
    pub user: AuthenticatedUser,
}

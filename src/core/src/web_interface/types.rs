use chrono::{DateTime, Utc};
use serde::Serialize;
use warp::http::StatusCode;

use crate::error_handling::types::DataError;
use crate::models::{Role, SourceType, User};

/// API error payload
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// HTTP status for each class of [`DataError`].
pub fn status_for(err: &DataError) -> StatusCode {
    match err {
        DataError::NotFound { .. } => StatusCode::NOT_FOUND,
        DataError::Malformed(_) => StatusCode::BAD_REQUEST,
        DataError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A user as exposed over HTTP: everything but the credential material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub profile_image_ref: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            role: user.role,
            profile_image_ref: user.profile_image_ref,
            joined_at: user.joined_at,
            last_active_at: user.last_active_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub source_type: SourceType,
    pub id: String,
}

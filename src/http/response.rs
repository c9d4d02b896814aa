//! Response shaping for the JSON endpoints.
//!
//! # Responsibilities
//! - Login/logout result bodies (`success`, machine-readable `reason`)
//! - Map authentication and database errors to status codes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;
use crate::session::AuthError;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// Body of `POST /login` and `POST /logout` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            reason: None,
            message: None,
        }
    }

    pub fn failure(err: &AuthError) -> Self {
        Self {
            success: false,
            reason: Some(err.reason().to_string()),
            message: Some(err.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::AlreadyLoggedIn => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::NotLoggedIn => StatusCode::UNAUTHORIZED,
        };
        (status, Json(AuthResponse::failure(&self))).into_response()
    }
}

impl IntoResponse for DatabaseError {
    fn into_response(self) -> Response {
        let status = match self {
            DatabaseError::UnknownTable(_) => StatusCode::NOT_FOUND,
            DatabaseError::Sqlite(_) | DatabaseError::Task(_) => {
                tracing::error!(error = %self, "Database request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn redirect_to_login() -> Response {
    Redirect::to(LOGIN_PATH).into_response()
}

pub fn redirect_to_root() -> Response {
    Redirect::to(ROOT_PATH).into_response()
}

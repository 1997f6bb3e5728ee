use crate::config::model::UserToken;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

/// 认证用户信息
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub user_token: UserToken,
}

impl AuthenticatedUser {
    pub fn new(user_token: UserToken) -> Self {
        Self {
            user_id: user_token.id,
            user_token,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_token.is_admin
    }

    pub fn get_name(&self) -> &str {
        &self.user_token.name
    }

    pub fn get_email(&self) -> &str {
        &self.user_token.email
    }
}

/// 认证错误类型
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl AuthError {
    pub fn missing_token() -> Self {
        Self {
            error: "missing_authorization".to_string(),
            message: "Authorization header is missing or invalid".to_string(),
            status: 401,
        }
    }

    pub fn invalid_token() -> Self {
        Self {
            error: "invalid_token".to_string(),
            message: "The provided token is invalid".to_string(),
            status: 401,
        }
    }

    pub fn disabled_user() -> Self {
        Self {
            error: "disabled_user".to_string(),
            message: "User account is disabled".to_string(),
            status: 403,
        }
    }

    pub fn admin_required() -> Self {
        Self {
            error: "admin_required".to_string(),
            message: "Admin access required".to_string(),
            status: 403,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.status {
            401 => StatusCode::UNAUTHORIZED,
            403 => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "message": self.message,
                "error": {
                    "type": self.error,
                    "message": self.message,
                    "code": self.status
                }
            })),
        )
            .into_response()
    }
}

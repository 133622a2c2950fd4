//! Unified error handling for the admin panel.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use dona_onca_core::store::StoreError;

use crate::db::RepositoryError;
use crate::services::auth::AdminAuthError;
use crate::services::storage::StorageError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Store operation failed (stock, lifecycle).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Object storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Login failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Store(err) => match err {
                StoreError::ProductNotFound { .. } | StoreError::OrderNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                StoreError::InsufficientStock { .. } | StoreError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AdminAuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AdminAuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// User-facing message; internals are never exposed.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Erro interno do servidor.".to_string()
            }
            Self::Storage(_) => "Falha no serviço de armazenamento.".to_string(),
            Self::Store(err) => err.to_string(),
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
                AdminAuthError::InvalidEmail(_) => "E-mail inválido.".to_string(),
                AdminAuthError::Repository(_) => "Erro interno do servidor.".to_string(),
            },
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.status().is_server_error() || matches!(self, Self::Storage(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn status_codes_map_by_variant() {
        assert_eq!(
            get_status(AppError::NotFound("pedido".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("login".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("admin".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("entrada".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn stock_conflicts_answer_409() {
        let err = AppError::Store(StoreError::InsufficientStock {
            product_id: dona_onca_core::ProductId::new(1),
            requested: 2,
            available: 1,
        });
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.message(), "Erro interno do servidor.");
    }
}

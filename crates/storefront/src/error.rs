//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! User-facing messages are Portuguese, matching what the shop displays.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use dona_onca_core::checkout::CheckoutError;
use dona_onca_core::store::StoreError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cep::CepError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Catalog/order store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout wizard rejected the operation.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// CEP lookup failed.
    #[error("CEP error: {0}")]
    Cep(#[from] CepError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
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
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::Hash | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Cep(err) => match err {
                CepError::NotFound(_) | CepError::InvalidCep(_) => StatusCode::NOT_FOUND,
                CepError::Http(_) | CepError::Parse(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// User-facing message. Internal detail is never exposed.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Erro interno do servidor.".to_string()
            }
            Self::Store(err) => match err {
                StoreError::InsufficientStock { .. } => {
                    "Estoque insuficiente para um dos itens.".to_string()
                }
                StoreError::ProductNotFound { .. } => "Produto não encontrado.".to_string(),
                StoreError::OrderNotFound { .. } => "Pedido não encontrado.".to_string(),
                StoreError::InvalidTransition { .. } => {
                    "Mudança de status inválida.".to_string()
                }
                StoreError::Backend(_) => "Erro interno do servidor.".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "E-mail ou senha inválidos.".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "Já existe uma conta com este e-mail.".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "E-mail inválido.".to_string(),
                AuthError::Hash | AuthError::Repository(_) => {
                    "Erro interno do servidor.".to_string()
                }
            },
            Self::Checkout(err) => err.to_string(),
            Self::Cep(_) => "CEP não encontrado.".to_string(),
            Self::NotFound(what) => format!("Não encontrado: {what}"),
            Self::Unauthorized(_) => "Faça login para continuar.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) | Self::Store(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() && self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(
            AppError::NotFound("produto".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("x".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn insufficient_stock_maps_to_conflict() {
        use dona_onca_core::ProductId;

        let err = AppError::Store(StoreError::InsufficientStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Estoque insuficiente para um dos itens.");
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert!(!err.message().contains("pool"));
    }
}

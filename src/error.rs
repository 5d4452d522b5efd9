use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::{models, notify::NotifyError, store::StoreError};

pub trait StdErrorExt: std::error::Error + Send + Sync + 'static {}
impl<T> StdErrorExt for T where T: std::error::Error + Send + Sync + 'static {}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{user_message}")]
    BadRequest {
        user_message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("{user_message}")]
    Internal {
        user_message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

impl AppError {
    pub fn bad_request_with_source<E>(msg: impl Into<String>, err: E) -> Self
    where
        E: StdErrorExt,
    {
        Self::BadRequest {
            user_message: msg.into(),
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub fn internal_with_source<E>(msg: impl Into<String>, err: E) -> Self
    where
        E: StdErrorExt,
    {
        Self::Internal {
            user_message: msg.into(),
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl AppError {
    fn source_error(&self) -> Option<&anyhow::Error> {
        match self {
            AppError::BadRequest { source, .. } | AppError::Internal { source, .. } => {
                source.as_ref()
            }
            AppError::Validation(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, tag, user_message) = match &self {
            AppError::BadRequest { user_message, .. } => {
                (StatusCode::BAD_REQUEST, "bad_request", user_message.clone())
            }
            AppError::Internal { user_message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                user_message.clone(),
            ),
            AppError::Validation(errs) => {
                let msg = errs
                    .field_errors()
                    .values()
                    .flat_map(|v| v.iter())
                    .flat_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "invalid value".to_string());

                (StatusCode::BAD_REQUEST, "validation", msg)
            }
        };

        match (status_code.is_server_error(), self.source_error()) {
            (true, Some(source)) => log::error!("[{}] {}: {:?}", tag, user_message, source),
            (true, None) => log::error!("[{}] {}", tag, user_message),
            (false, Some(source)) => log::info!("[{}] {}: {:?}", tag, user_message, source),
            (false, None) => log::info!("[{}] {}", tag, user_message),
        }

        // the intake route reports `success: false`, the read routes only carry `error`
        let success = (!status_code.is_server_error()).then_some(false);

        (
            status_code,
            [(header::CONTENT_TYPE, "application/json")],
            Json(models::error::ResponseError {
                success,
                error: user_message,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Write(_) => Self::bad_request_with_source(err.to_string(), err),
            StoreError::Read(_) => Self::internal_with_source("Failed to fetch orders", err),
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        Self::bad_request_with_source(err.to_string(), err)
    }
}

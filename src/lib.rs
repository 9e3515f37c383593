//! Expenseur is a web service for tracking personal expenses against a
//! manually maintained account balance.
//!
//! This library provides a JSON REST API backed by one of three
//! interchangeable storage backends (a managed REST surface, a local SQLite
//! database, or an in-memory map) selected once at process start-up.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod auth;
mod balance;
mod config;
mod endpoints;
mod expense;
mod health;
mod logging;
mod pagination;
mod routing;
mod stores;
#[cfg(test)]
mod test_utils;
mod user;

pub use app_state::AppState;
pub use auth::AllowList;
pub use config::Config;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use stores::initialize_storage;

/// An alias for the type used for database primary keys.
pub type DatabaseID = i64;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// A single field that failed request validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The JSON field name as it appears on the wire.
    pub field: &'static str,
    /// Why the value was rejected.
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request payload was missing required fields or contained values
    /// that could not be interpreted.
    ///
    /// Carries one entry per offending field so that the client can point at
    /// the exact inputs that need fixing.
    #[error("invalid request data")]
    Validation(Vec<FieldError>),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., ID) are correct and that the resource has been
    /// created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The REST storage backend returned a transport or protocol error.
    ///
    /// The detail string should only be logged on the server. When
    /// communicating with the application client this error is replaced with
    /// a generic internal server error.
    #[error("the storage API request failed: {0}")]
    ApiError(String),

    /// A start-up storage probe did not answer before its deadline.
    #[error("the storage probe timed out after {0:?}")]
    ProbeTimeout(Duration),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::ApiError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "message": "Invalid request data",
                    "errors": errors,
                })),
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "message": "The requested resource could not be found",
                })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "message": "An unexpected error occurred",
                    })),
                )
                    .into_response()
            }
        }
    }
}

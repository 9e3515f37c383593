//! The health check endpoint.

use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

/// The body returned by the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process can serve requests.
    pub status: &'static str,
    /// The server's current time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// A route handler reporting that the server is up.
pub async fn get_health_endpoint() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: OffsetDateTime::now_utc(),
    })
}

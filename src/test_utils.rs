//! Helpers shared by the endpoint tests.

use std::sync::Arc;

use axum_test::TestServer;

use crate::{AllowList, AppState, PaginationConfig, build_router, stores::MemoryStorage};

/// An email on the allow-list of servers built by [test_server].
pub const AUTHORIZED_EMAIL: &str = "x@y.com";

/// Create a test server over an empty in-memory backend.
pub fn test_server() -> TestServer {
    let state = AppState::new(
        Arc::new(MemoryStorage::new()),
        AllowList::new([AUTHORIZED_EMAIL.to_string()]),
        PaginationConfig::default(),
    );

    TestServer::new(build_router(state))
}

/// A valid expense creation body with the given `value`, `date` and paid
/// flag.
pub fn expense_body(value: &str, date: &str, is_paid: bool) -> serde_json::Value {
    serde_json::json!({
        "category": "fuel",
        "description": "Gas",
        "value": value,
        "date": date,
        "paymentMethod": "cash",
        "isPaid": is_paid,
    })
}

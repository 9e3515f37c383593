//! The endpoint for flagging an expense as paid.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, DatabaseID, Error};

/// A route handler that sets the paid flag on an expense.
///
/// The operation is idempotent: marking an already-paid expense succeeds
/// again. Responds with 404 when the ID is unknown.
pub async fn mark_expense_paid_endpoint(
    State(state): State<AppState>,
    Path(expense_id): Path<DatabaseID>,
) -> Result<Json<serde_json::Value>, Error> {
    if state.storage.mark_expense_as_paid(expense_id).await? {
        Ok(Json(serde_json::json!({ "message": "Expense marked as paid" })))
    } else {
        Err(Error::NotFound)
    }
}

#[cfg(test)]
mod mark_expense_paid_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{expense_body, test_server},
    };

    #[tokio::test]
    async fn removes_the_expense_from_the_unpaid_list() {
        let server = test_server();
        let created: serde_json::Value = server
            .post(endpoints::EXPENSES)
            .json(&expense_body("50.00", "2024-03-01", false))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();

        server
            .patch(&format_endpoint(endpoints::MARK_EXPENSE_PAID, id))
            .await
            .assert_status_ok();

        let unpaid: serde_json::Value = server.get(endpoints::UNPAID_EXPENSES).await.json();
        assert_eq!(unpaid["total"], 0);
    }

    #[tokio::test]
    async fn marking_twice_succeeds_both_times() {
        let server = test_server();
        let created: serde_json::Value = server
            .post(endpoints::EXPENSES)
            .json(&expense_body("50.00", "2024-03-01", false))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();
        let url = format_endpoint(endpoints::MARK_EXPENSE_PAID, id);

        server.patch(&url).await.assert_status_ok();
        server.patch(&url).await.assert_status_ok();
    }

    #[tokio::test]
    async fn responds_with_404_for_an_unknown_id() {
        let server = test_server();

        let response = server
            .patch(&format_endpoint(endpoints::MARK_EXPENSE_PAID, 999))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

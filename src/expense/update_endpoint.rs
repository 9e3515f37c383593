//! The endpoint for editing an existing expense.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, DatabaseID, Error,
    expense::{Expense, ExpensePayload},
};

/// A route handler for merging a partial update onto an expense.
///
/// Fields absent from the payload keep their stored values. Responds with
/// 404 when the ID is unknown and 400 when a supplied field does not parse.
pub async fn update_expense_endpoint(
    State(state): State<AppState>,
    Path(expense_id): Path<DatabaseID>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Expense>, Error> {
    let update = payload.into_update()?;

    match state.storage.update_expense(expense_id, update).await? {
        Some(expense) => Ok(Json(expense)),
        None => Err(Error::NotFound),
    }
}

#[cfg(test)]
mod update_expense_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{expense_body, test_server},
    };

    #[tokio::test]
    async fn merges_the_supplied_fields() {
        let server = test_server();
        let created: serde_json::Value = server
            .post(endpoints::EXPENSES)
            .json(&expense_body("50.00", "2024-03-01", true))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, id))
            .json(&serde_json::json!({
                "description": "Diesel",
                "value": "62.10",
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["description"], "Diesel");
        assert_eq!(body["value"], "62.10");
        assert_eq!(body["category"], "fuel");
        assert_eq!(body["date"], "2024-03-01");
        assert_eq!(body["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn can_flip_the_paid_flag_both_ways() {
        let server = test_server();
        let created: serde_json::Value = server
            .post(endpoints::EXPENSES)
            .json(&expense_body("50.00", "2024-03-01", true))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();
        let url = format_endpoint(endpoints::EXPENSE, id);

        let unpaid: serde_json::Value = server
            .put(&url)
            .json(&serde_json::json!({ "isPaid": false }))
            .await
            .json();
        assert_eq!(unpaid["isPaid"], false);

        let paid: serde_json::Value = server
            .put(&url)
            .json(&serde_json::json!({ "isPaid": true }))
            .await
            .json();
        assert_eq!(paid["isPaid"], true);
    }

    #[tokio::test]
    async fn responds_with_404_for_an_unknown_id() {
        let server = test_server();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, 999))
            .json(&serde_json::json!({ "description": "Diesel" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_a_malformed_supplied_field() {
        let server = test_server();
        let created: serde_json::Value = server
            .post(endpoints::EXPENSES)
            .json(&expense_body("50.00", "2024-03-01", true))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, id))
            .json(&serde_json::json!({ "value": "sixty" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["errors"][0]["field"], "value");
    }
}

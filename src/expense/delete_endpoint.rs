//! The endpoint for removing an expense.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, DatabaseID, Error};

/// A route handler for deleting an expense.
///
/// Responds with 404 when the ID is unknown, which means a repeated delete
/// of the same expense fails the second time.
pub async fn delete_expense_endpoint(
    State(state): State<AppState>,
    Path(expense_id): Path<DatabaseID>,
) -> Result<Json<serde_json::Value>, Error> {
    if state.storage.delete_expense(expense_id).await? {
        Ok(Json(serde_json::json!({ "message": "Expense deleted" })))
    } else {
        Err(Error::NotFound)
    }
}

//! The endpoint for recording a new expense.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState, Error,
    expense::{Expense, ExpensePayload},
};

/// A route handler for creating a new expense.
///
/// Responds with 201 and the stored expense, or 400 with a field-level
/// detail list when the payload is invalid. The paid flag defaults to true
/// when the client leaves it out.
pub async fn create_expense_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let draft = payload.into_draft()?;

    let expense = state.storage.create_expense(draft).await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

//! The endpoints for reading and replacing the account balance, and for
//! projecting it against upcoming unpaid expenses.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    AppState, Error,
    balance::{AccountBalance, BalancePayload, needed_amount, unpaid_total},
};

/// A route handler returning the account balance.
///
/// Responds with a JSON `null` body while no balance has been recorded;
/// clients treat that as a normal state, not an error.
pub async fn get_account_balance_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Option<AccountBalance>>, Error> {
    let balance = state.storage.get_account_balance().await?;

    Ok(Json(balance))
}

/// A route handler replacing the account balance.
///
/// The balance is a singleton, so this is an upsert: the first update
/// creates the record and later ones replace it.
pub async fn update_account_balance_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<BalancePayload>,
) -> Result<Json<AccountBalance>, Error> {
    let draft = payload.into_draft()?;

    let balance = state.storage.update_account_balance(draft).await?;

    Ok(Json(balance))
}

/// The balance projected against the unpaid expenses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    /// The recorded balance, or zero when none has been recorded yet.
    pub current_balance: Decimal,
    /// The exact sum of the unpaid expense values.
    pub unpaid_total: Decimal,
    /// How much is missing to cover the unpaid total; zero when covered.
    pub needed_amount: Decimal,
}

/// A route handler projecting the balance against the unpaid expenses.
pub async fn get_account_projection_endpoint(
    State(state): State<AppState>,
) -> Result<Json<ProjectionResponse>, Error> {
    let current_balance = state
        .storage
        .get_account_balance()
        .await?
        .map(|balance| balance.current_balance)
        .unwrap_or(Decimal::ZERO);
    let unpaid = state.storage.get_unpaid_expenses().await?;

    Ok(Json(ProjectionResponse {
        current_balance,
        unpaid_total: unpaid_total(&unpaid),
        needed_amount: needed_amount(current_balance, &unpaid),
    }))
}

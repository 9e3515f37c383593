//! The singleton account balance and the shortfall arithmetic derived from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{DatabaseID, Error, FieldError, expense::Expense};

/// The account balance is a singleton; every backend stores it under this ID.
pub const ACCOUNT_BALANCE_ID: DatabaseID = 1;

/// The manually maintained balance of the user's account.
///
/// At most one logical balance record exists; updating it replaces the
/// record and refreshes [AccountBalance::updated_at].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Always [ACCOUNT_BALANCE_ID]; kept on the wire for compatibility.
    pub id: DatabaseID,
    /// The money currently in the account.
    pub current_balance: Decimal,
    /// When the balance was last edited.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated replacement for the singleton balance.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceDraft {
    /// The money currently in the account.
    pub current_balance: Decimal,
}

/// The raw JSON body accepted by the balance update endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePayload {
    /// The new balance as a string-encoded decimal, e.g. "100.00".
    pub current_balance: Option<String>,
}

impl BalancePayload {
    /// Validate the payload into a balance replacement.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the balance is missing or not a
    /// decimal number.
    pub fn into_draft(self) -> Result<BalanceDraft, Error> {
        let raw = self.current_balance.ok_or_else(|| {
            Error::Validation(vec![FieldError::new("currentBalance", "is required")])
        })?;

        let current_balance = raw.trim().parse::<Decimal>().map_err(|_| {
            Error::Validation(vec![FieldError::new(
                "currentBalance",
                format!("\"{raw}\" is not a decimal amount"),
            )])
        })?;

        Ok(BalanceDraft { current_balance })
    }
}

/// The exact sum of the values of `unpaid` expenses.
pub fn unpaid_total(unpaid: &[Expense]) -> Decimal {
    unpaid.iter().map(|expense| expense.value).sum()
}

/// How much money is missing to cover `unpaid` expenses from `balance`.
///
/// Zero when the balance already covers the total.
pub fn needed_amount(balance: Decimal, unpaid: &[Expense]) -> Decimal {
    (unpaid_total(unpaid) - balance).max(Decimal::ZERO)
}

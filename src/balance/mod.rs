//! The account balance: the singleton model, the shortfall arithmetic, and
//! the endpoints that expose both.

mod endpoints;
mod models;

pub use endpoints::{
    get_account_balance_endpoint, get_account_projection_endpoint,
    update_account_balance_endpoint,
};
pub use models::{
    ACCOUNT_BALANCE_ID, AccountBalance, BalanceDraft, BalancePayload, needed_amount, unpaid_total,
};

//! Expenses: the domain model and the endpoints that operate on it.

mod create_endpoint;
mod delete_endpoint;
mod list_endpoints;
mod models;
mod paid_endpoint;
mod update_endpoint;

pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use list_endpoints::{
    get_expenses_by_category_endpoint, get_expenses_endpoint, get_unpaid_expenses_endpoint,
};
pub use models::{Expense, ExpenseDraft, ExpensePayload, ExpenseUpdate};
pub use paid_endpoint::mark_expense_paid_endpoint;
pub use update_endpoint::update_expense_endpoint;

//! Contains the backend-agnostic storage contract, its three
//! implementations, and the start-up logic that picks between them.

mod init;
mod memory;
mod rest;
mod sqlite;

pub use init::initialize_storage;
pub use memory::MemoryStorage;
pub use rest::RestStorage;
pub use sqlite::SQLiteStorage;

use async_trait::async_trait;

use crate::{
    DatabaseID, Error,
    balance::{AccountBalance, BalanceDraft},
    expense::{Expense, ExpenseDraft, ExpenseUpdate},
    user::{User, UserDraft},
};

/// Handles persistence for expenses, the account balance, and the identity
/// mirror.
///
/// All backends honour the same contract so that the process can swap
/// persistence technology at start-up without touching the route handlers;
/// callers cannot tell which backend is active except by latency.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Every expense, ordered newest date first.
    async fn get_all_expenses(&self) -> Result<Vec<Expense>, Error>;

    /// Create a new expense, assigning its ID and creation timestamp.
    async fn create_expense(&self, draft: ExpenseDraft) -> Result<Expense, Error>;

    /// Merge `update` onto the expense with `id`.
    ///
    /// Returns `None`, not an error, when `id` is unknown.
    async fn update_expense(
        &self,
        id: DatabaseID,
        update: ExpenseUpdate,
    ) -> Result<Option<Expense>, Error>;

    /// Delete the expense with `id`, returning whether it existed.
    async fn delete_expense(&self, id: DatabaseID) -> Result<bool, Error>;

    /// The expenses recorded under `category`, newest date first.
    async fn get_expenses_by_category(&self, category: &str) -> Result<Vec<Expense>, Error>;

    /// The expenses not yet paid, ordered soonest due first.
    ///
    /// Note the ordering is the opposite of [Storage::get_all_expenses]:
    /// upcoming bills are read in the order they fall due.
    async fn get_unpaid_expenses(&self) -> Result<Vec<Expense>, Error>;

    /// Set the paid flag on the expense with `id`.
    ///
    /// Idempotent: marking an already-paid expense succeeds again. Returns
    /// false when `id` is unknown.
    async fn mark_expense_as_paid(&self, id: DatabaseID) -> Result<bool, Error>;

    /// The singleton account balance, if one has been recorded yet.
    async fn get_account_balance(&self) -> Result<Option<AccountBalance>, Error>;

    /// Replace the singleton account balance, refreshing its update
    /// timestamp.
    async fn update_account_balance(&self, draft: BalanceDraft) -> Result<AccountBalance, Error>;

    /// Fetch the mirrored identity record with `id`.
    async fn get_user(&self, id: &str) -> Result<Option<User>, Error>;

    /// Insert or refresh a mirrored identity record.
    async fn upsert_user(&self, draft: UserDraft) -> Result<User, Error>;
}

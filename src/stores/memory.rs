//! Implements the in-memory storage backend.
//!
//! This backend is the correctness baseline and the guaranteed fallback when
//! no other backend can be reached. Data lives for the process lifetime
//! only and is lost on restart.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    DatabaseID, Error,
    balance::{ACCOUNT_BALANCE_ID, AccountBalance, BalanceDraft},
    expense::{Expense, ExpenseDraft, ExpenseUpdate},
    stores::Storage,
    user::{User, UserDraft},
};

/// Stores expenses, the account balance, and the identity mirror in process
/// memory.
///
/// Expense IDs come from a monotonically increasing counter starting at one,
/// so IDs stay unique for the process lifetime even after deletes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    expenses: HashMap<DatabaseID, Expense>,
    next_expense_id: DatabaseID,
    balance: Option<AccountBalance>,
    users: HashMap<String, User>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            expenses: HashMap::new(),
            next_expense_id: 1,
            balance: None,
            users: HashMap::new(),
        }
    }
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_all_expenses(&self) -> Result<Vec<Expense>, Error> {
        let inner = self.inner.lock().unwrap();

        let mut expenses: Vec<_> = inner.expenses.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(expenses)
    }

    async fn create_expense(&self, draft: ExpenseDraft) -> Result<Expense, Error> {
        let mut inner = self.inner.lock().unwrap();

        let id = inner.next_expense_id;
        inner.next_expense_id += 1;

        let expense = Expense {
            id,
            category: draft.category,
            description: draft.description,
            value: draft.value,
            date: draft.date,
            payment_method: draft.payment_method,
            is_paid: draft.is_paid,
            created_at: OffsetDateTime::now_utc(),
        };

        inner.expenses.insert(id, expense.clone());

        Ok(expense)
    }

    async fn update_expense(
        &self,
        id: DatabaseID,
        update: ExpenseUpdate,
    ) -> Result<Option<Expense>, Error> {
        let mut inner = self.inner.lock().unwrap();

        Ok(inner.expenses.get_mut(&id).map(|expense| {
            update.apply_to(expense);
            expense.clone()
        }))
    }

    async fn delete_expense(&self, id: DatabaseID) -> Result<bool, Error> {
        let mut inner = self.inner.lock().unwrap();

        Ok(inner.expenses.remove(&id).is_some())
    }

    async fn get_expenses_by_category(&self, category: &str) -> Result<Vec<Expense>, Error> {
        let inner = self.inner.lock().unwrap();

        let mut expenses: Vec<_> = inner
            .expenses
            .values()
            .filter(|expense| expense.category == category)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(expenses)
    }

    async fn get_unpaid_expenses(&self) -> Result<Vec<Expense>, Error> {
        let inner = self.inner.lock().unwrap();

        let mut expenses: Vec<_> = inner
            .expenses
            .values()
            .filter(|expense| !expense.is_paid)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(expenses)
    }

    async fn mark_expense_as_paid(&self, id: DatabaseID) -> Result<bool, Error> {
        let mut inner = self.inner.lock().unwrap();

        match inner.expenses.get_mut(&id) {
            Some(expense) => {
                expense.is_paid = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_account_balance(&self) -> Result<Option<AccountBalance>, Error> {
        Ok(self.inner.lock().unwrap().balance.clone())
    }

    async fn update_account_balance(&self, draft: BalanceDraft) -> Result<AccountBalance, Error> {
        let balance = AccountBalance {
            id: ACCOUNT_BALANCE_ID,
            current_balance: draft.current_balance,
            updated_at: OffsetDateTime::now_utc(),
        };

        self.inner.lock().unwrap().balance = Some(balance.clone());

        Ok(balance)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, Error> {
        Ok(self.inner.lock().unwrap().users.get(id).cloned())
    }

    async fn upsert_user(&self, draft: UserDraft) -> Result<User, Error> {
        let mut inner = self.inner.lock().unwrap();

        let now = OffsetDateTime::now_utc();
        let created_at = inner
            .users
            .get(&draft.id)
            .map(|user| user.created_at)
            .unwrap_or(now);

        let user = User {
            id: draft.id.clone(),
            email: draft.email,
            first_name: draft.first_name,
            last_name: draft.last_name,
            profile_image_url: draft.profile_image_url,
            created_at,
            updated_at: now,
        };

        inner.users.insert(draft.id, user.clone());

        Ok(user)
    }
}

//! Implements the direct relational storage backend on SQLite.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter, types::Type, types::Value};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    DatabaseID, Error,
    balance::{ACCOUNT_BALANCE_ID, AccountBalance, BalanceDraft},
    expense::{Expense, ExpenseDraft, ExpenseUpdate},
    stores::Storage,
    user::{User, UserDraft},
};

const EXPENSE_COLUMNS: &str =
    "id, category, description, value, date, payment_method, is_paid, created_at";
const BALANCE_COLUMNS: &str = "id, current_balance, updated_at";
const USER_COLUMNS: &str =
    "id, email, first_name, last_name, profile_image_url, created_at, updated_at";

/// Stores the domain models in a SQLite database.
///
/// The connection is shared behind a mutex, so statements from concurrent
/// requests are serialised; this mirrors the single-user workload the
/// application is built for.
#[derive(Debug, Clone)]
pub struct SQLiteStorage {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStorage {
    /// Open the database at `path` and prepare it for use.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened or the
    /// tables cannot be created.
    pub fn open(path: &str) -> Result<Self, Error> {
        let connection = Connection::open(path)?;

        Self::new(connection)
    }

    /// Wrap an existing connection, verify connectivity, and create the
    /// required tables if they do not exist.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the connectivity check or the table
    /// creation fails.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        connection.query_row("SELECT 1", [], |_| Ok(()))?;
        create_tables(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
        Ok(Expense {
            id: row.get(0)?,
            category: row.get(1)?,
            description: row.get(2)?,
            value: decimal_column(row, 3)?,
            date: row.get(4)?,
            payment_method: row.get(5)?,
            is_paid: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn map_balance_row(row: &Row) -> Result<AccountBalance, rusqlite::Error> {
        Ok(AccountBalance {
            id: row.get(0)?,
            current_balance: decimal_column(row, 1)?,
            updated_at: row.get(2)?,
        })
    }

    fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            profile_image_url: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Monetary values are stored as their exact decimal string, never as REAL.
fn decimal_column(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    raw.parse().map_err(|error: rust_decimal::Error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

fn create_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                value TEXT NOT NULL,
                date TEXT NOT NULL,
                payment_method TEXT NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS account_balance (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                current_balance TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT,
                first_name TEXT,
                last_name TEXT,
                profile_image_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

#[async_trait]
impl Storage for SQLiteStorage {
    async fn get_all_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY date DESC"
            ))?
            .query_map([], Self::map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    async fn create_expense(&self, draft: ExpenseDraft) -> Result<Expense, Error> {
        let expense = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO expenses \
                 (category, description, value, date, payment_method, is_paid, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                (
                    draft.category,
                    draft.description,
                    draft.value.to_string(),
                    draft.date,
                    draft.payment_method,
                    draft.is_paid,
                    OffsetDateTime::now_utc(),
                ),
                Self::map_expense_row,
            )?;

        Ok(expense)
    }

    async fn update_expense(
        &self,
        id: DatabaseID,
        update: ExpenseUpdate,
    ) -> Result<Option<Expense>, Error> {
        let connection = self.connection.lock().unwrap();

        if update.is_empty() {
            let expense = connection
                .prepare(&format!(
                    "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = :id"
                ))?
                .query_row(&[(":id", &id)], Self::map_expense_row)
                .optional()?;

            return Ok(expense);
        }

        let mut set_parts = Vec::new();
        let mut parameters = Vec::new();

        let mut push_assignment = |column: &str, value: Value| {
            parameters.push(value);
            set_parts.push(format!("{column} = ?{}", parameters.len()));
        };

        if let Some(category) = update.category {
            push_assignment("category", Value::Text(category));
        }
        if let Some(description) = update.description {
            push_assignment("description", Value::Text(description));
        }
        if let Some(value) = update.value {
            push_assignment("value", Value::Text(value.to_string()));
        }
        if let Some(date) = update.date {
            push_assignment("date", Value::Text(date.to_string()));
        }
        if let Some(payment_method) = update.payment_method {
            push_assignment("payment_method", Value::Text(payment_method));
        }
        if let Some(is_paid) = update.is_paid {
            push_assignment("is_paid", Value::Integer(is_paid.into()));
        }

        parameters.push(Value::Integer(id));
        let query_string = format!(
            "UPDATE expenses SET {} WHERE id = ?{} RETURNING {EXPENSE_COLUMNS}",
            set_parts.join(", "),
            parameters.len(),
        );

        let expense = connection
            .prepare(&query_string)?
            .query_row(params_from_iter(parameters.iter()), Self::map_expense_row)
            .optional()?;

        Ok(expense)
    }

    async fn delete_expense(&self, id: DatabaseID) -> Result<bool, Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expenses WHERE id = :id", &[(":id", &id)])?;

        Ok(rows_affected > 0)
    }

    async fn get_expenses_by_category(&self, category: &str) -> Result<Vec<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses \
                 WHERE category = :category ORDER BY date DESC"
            ))?
            .query_map(&[(":category", category)], Self::map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    async fn get_unpaid_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses \
                 WHERE is_paid = 0 ORDER BY date ASC"
            ))?
            .query_map([], Self::map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    async fn mark_expense_as_paid(&self, id: DatabaseID) -> Result<bool, Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE expenses SET is_paid = 1 WHERE id = :id", &[(":id", &id)])?;

        Ok(rows_affected > 0)
    }

    async fn get_account_balance(&self) -> Result<Option<AccountBalance>, Error> {
        let balance = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {BALANCE_COLUMNS} FROM account_balance WHERE id = :id"
            ))?
            .query_row(&[(":id", &ACCOUNT_BALANCE_ID)], Self::map_balance_row)
            .optional()?;

        Ok(balance)
    }

    async fn update_account_balance(&self, draft: BalanceDraft) -> Result<AccountBalance, Error> {
        let balance = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO account_balance (id, current_balance, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     current_balance = excluded.current_balance,
                     updated_at = excluded.updated_at
                 RETURNING {BALANCE_COLUMNS}"
            ))?
            .query_row(
                (
                    ACCOUNT_BALANCE_ID,
                    draft.current_balance.to_string(),
                    OffsetDateTime::now_utc(),
                ),
                Self::map_balance_row,
            )?;

        Ok(balance)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = :id"))?
            .query_row(&[(":id", id)], Self::map_user_row)
            .optional()?;

        Ok(user)
    }

    async fn upsert_user(&self, draft: UserDraft) -> Result<User, Error> {
        let now = OffsetDateTime::now_utc();

        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO users \
                 (id, email, first_name, last_name, profile_image_url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     email = excluded.email,
                     first_name = excluded.first_name,
                     last_name = excluded.last_name,
                     profile_image_url = excluded.profile_image_url,
                     updated_at = excluded.updated_at
                 RETURNING {USER_COLUMNS}"
            ))?
            .query_row(
                (
                    draft.id,
                    draft.email,
                    draft.first_name,
                    draft.last_name,
                    draft.profile_image_url,
                    now,
                    now,
                ),
                Self::map_user_row,
            )?;

        Ok(user)
    }
}

//! Implements the storage backend that talks to a managed REST surface.
//!
//! Some hosting environments cannot open a direct database connection (DNS
//! restrictions, blocked ports), but can still reach the managed backend's
//! PostgREST-style HTTP API. This backend performs the same logical
//! operations as the direct one through that API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    DatabaseID, Error,
    balance::{ACCOUNT_BALANCE_ID, AccountBalance, BalanceDraft},
    expense::{Expense, ExpenseDraft, ExpenseUpdate},
    stores::Storage,
    user::{User, UserDraft},
};

const USER_AGENT: &str = concat!("expenseur/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const EXPENSES_TABLE: &str = "expenses";
const BALANCE_TABLE: &str = "account_balance";
const USERS_TABLE: &str = "users";

/// Asks the server to echo affected rows back in the response body.
const PREFER_REPRESENTATION: &str = "return=representation";
/// Turns an insert into an upsert on the primary key.
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

/// Stores the domain models behind a PostgREST-style HTTP API.
#[derive(Debug, Clone)]
pub struct RestStorage {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStorage {
    /// Create a client for the managed REST surface rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an [Error::ApiError] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch_expenses(&self, query: &[(&str, &str)]) -> Result<Vec<Expense>, Error> {
        let response = self
            .request(Method::GET, EXPENSES_TABLE)
            .query(query)
            .send()
            .await?;

        let rows: Vec<ExpenseRow> = check(response).await?.json().await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }
}

/// Reject non-2xx responses, keeping the status and body for the server log.
async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(Error::ApiError(format!("{status}: {body}")))
}

#[async_trait]
impl Storage for RestStorage {
    async fn get_all_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.fetch_expenses(&[("select", "*"), ("order", "date.desc")])
            .await
    }

    async fn create_expense(&self, draft: ExpenseDraft) -> Result<Expense, Error> {
        let response = self
            .request(Method::POST, EXPENSES_TABLE)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&NewExpenseRow::from(&draft))
            .send()
            .await?;

        let rows: Vec<ExpenseRow> = check(response).await?.json().await?;

        rows.into_iter()
            .next()
            .map(Expense::from)
            .ok_or_else(|| Error::ApiError("created expense missing from response".to_string()))
    }

    async fn update_expense(
        &self,
        id: DatabaseID,
        update: ExpenseUpdate,
    ) -> Result<Option<Expense>, Error> {
        if update.is_empty() {
            let expenses = self
                .fetch_expenses(&[("select", "*"), ("id", &format!("eq.{id}"))])
                .await?;

            return Ok(expenses.into_iter().next());
        }

        let response = self
            .request(Method::PATCH, EXPENSES_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&ExpensePatch::from(update))
            .send()
            .await?;

        let rows: Vec<ExpenseRow> = check(response).await?.json().await?;

        Ok(rows.into_iter().next().map(Expense::from))
    }

    async fn delete_expense(&self, id: DatabaseID) -> Result<bool, Error> {
        let response = self
            .request(Method::DELETE, EXPENSES_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;

        let rows: Vec<ExpenseRow> = check(response).await?.json().await?;

        Ok(!rows.is_empty())
    }

    async fn get_expenses_by_category(&self, category: &str) -> Result<Vec<Expense>, Error> {
        self.fetch_expenses(&[
            ("select", "*"),
            ("category", &format!("eq.{category}")),
            ("order", "date.desc"),
        ])
        .await
    }

    async fn get_unpaid_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.fetch_expenses(&[
            ("select", "*"),
            ("is_paid", "eq.false"),
            ("order", "date.asc"),
        ])
        .await
    }

    async fn mark_expense_as_paid(&self, id: DatabaseID) -> Result<bool, Error> {
        let response = self
            .request(Method::PATCH, EXPENSES_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&serde_json::json!({ "is_paid": true }))
            .send()
            .await?;

        let rows: Vec<ExpenseRow> = check(response).await?.json().await?;

        Ok(!rows.is_empty())
    }

    async fn get_account_balance(&self) -> Result<Option<AccountBalance>, Error> {
        let response = self
            .request(Method::GET, BALANCE_TABLE)
            .query(&[
                ("select", "*"),
                ("id", &format!("eq.{ACCOUNT_BALANCE_ID}")),
            ])
            .send()
            .await?;

        let rows: Vec<BalanceRow> = check(response).await?.json().await?;

        Ok(rows.into_iter().next().map(AccountBalance::from))
    }

    async fn update_account_balance(&self, draft: BalanceDraft) -> Result<AccountBalance, Error> {
        let response = self
            .request(Method::POST, BALANCE_TABLE)
            .header("Prefer", PREFER_UPSERT)
            .json(&BalanceRow {
                id: ACCOUNT_BALANCE_ID,
                current_balance: draft.current_balance,
                updated_at: OffsetDateTime::now_utc(),
            })
            .send()
            .await?;

        let rows: Vec<BalanceRow> = check(response).await?.json().await?;

        rows.into_iter()
            .next()
            .map(AccountBalance::from)
            .ok_or_else(|| Error::ApiError("updated balance missing from response".to_string()))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, Error> {
        let response = self
            .request(Method::GET, USERS_TABLE)
            .query(&[("select", "*"), ("id", &format!("eq.{id}"))])
            .send()
            .await?;

        let rows: Vec<UserRow> = check(response).await?.json().await?;

        Ok(rows.into_iter().next().map(User::from))
    }

    async fn upsert_user(&self, draft: UserDraft) -> Result<User, Error> {
        let response = self
            .request(Method::POST, USERS_TABLE)
            .header("Prefer", PREFER_UPSERT)
            .json(&NewUserRow::from(&draft))
            .send()
            .await?;

        let rows: Vec<UserRow> = check(response).await?.json().await?;

        rows.into_iter()
            .next()
            .map(User::from)
            .ok_or_else(|| Error::ApiError("upserted user missing from response".to_string()))
    }
}

/// One row of the managed `expenses` table, using its column names.
#[derive(Debug, Deserialize)]
struct ExpenseRow {
    id: DatabaseID,
    category: String,
    description: String,
    value: Decimal,
    date: Date,
    payment_method: String,
    is_paid: bool,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            description: row.description,
            value: row.value,
            date: row.date,
            payment_method: row.payment_method,
            is_paid: row.is_paid,
            created_at: row.created_at,
        }
    }
}

/// The insert body for a new expense. The server assigns `id` and
/// `created_at`.
#[derive(Debug, Serialize)]
struct NewExpenseRow<'a> {
    category: &'a str,
    description: &'a str,
    value: &'a Decimal,
    date: Date,
    payment_method: &'a str,
    is_paid: bool,
}

impl<'a> From<&'a ExpenseDraft> for NewExpenseRow<'a> {
    fn from(draft: &'a ExpenseDraft) -> Self {
        Self {
            category: &draft.category,
            description: &draft.description,
            value: &draft.value,
            date: draft.date,
            payment_method: &draft.payment_method,
            is_paid: draft.is_paid,
        }
    }
}

/// The patch body for a partial update; absent fields are left out entirely
/// so the server does not touch those columns.
#[derive(Debug, Serialize)]
struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_paid: Option<bool>,
}

impl From<ExpenseUpdate> for ExpensePatch {
    fn from(update: ExpenseUpdate) -> Self {
        Self {
            category: update.category,
            description: update.description,
            value: update.value,
            date: update.date,
            payment_method: update.payment_method,
            is_paid: update.is_paid,
        }
    }
}

/// One row of the managed `account_balance` table. Doubles as the upsert
/// body, which pins the singleton row's ID.
#[derive(Debug, Serialize, Deserialize)]
struct BalanceRow {
    id: DatabaseID,
    current_balance: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<BalanceRow> for AccountBalance {
    fn from(row: BalanceRow) -> Self {
        Self {
            id: row.id,
            current_balance: row.current_balance,
            updated_at: row.updated_at,
        }
    }
}

/// One row of the managed `users` table.
#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_image_url: row.profile_image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The upsert body for the identity mirror. `created_at` is left to the
/// server so that re-upserting a profile keeps the original value.
#[derive(Debug, Serialize)]
struct NewUserRow<'a> {
    id: &'a str,
    email: Option<&'a str>,
    first_name: Option<&'a str>,
    last_name: Option<&'a str>,
    profile_image_url: Option<&'a str>,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl<'a> From<&'a UserDraft> for NewUserRow<'a> {
    fn from(draft: &'a UserDraft) -> Self {
        Self {
            id: &draft.id,
            email: draft.email.as_deref(),
            first_name: draft.first_name.as_deref(),
            last_name: draft.last_name.as_deref(),
            profile_image_url: draft.profile_image_url.as_deref(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }
}

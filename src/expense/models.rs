//! The expense domain model and request payload validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{DatabaseID, Error, FieldError};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseID,
    /// The spending bucket the expense belongs to, e.g. "groceries".
    ///
    /// The set of categories is a client-side convention, not enforced here.
    pub category: String,
    /// A text description of what the expense was for.
    pub description: String,
    /// The amount of money owed or spent, kept as an exact decimal.
    pub value: Decimal,
    /// When the expense is (or was) due.
    pub date: Date,
    /// How the expense was or will be paid, e.g. "credit-card".
    pub payment_method: String,
    /// Whether the expense has been paid.
    pub is_paid: bool,
    /// When the expense was recorded. Set once at creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The fields needed to create a new expense, already validated.
///
/// The storage backend assigns the ID and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// The spending bucket the expense belongs to.
    pub category: String,
    /// A text description of what the expense was for.
    pub description: String,
    /// The amount of money owed or spent.
    pub value: Decimal,
    /// When the expense is (or was) due.
    pub date: Date,
    /// How the expense was or will be paid.
    pub payment_method: String,
    /// Whether the expense has already been paid.
    pub is_paid: bool,
}

/// A partial set of expense fields to merge onto an existing record.
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement amount.
    pub value: Option<Decimal>,
    /// Replacement due date.
    pub date: Option<Date>,
    /// Replacement payment method.
    pub payment_method: Option<String>,
    /// Replacement paid flag. General updates may set this either way,
    /// unlike the one-way mark-as-paid operation.
    pub is_paid: Option<bool>,
}

impl ExpenseUpdate {
    /// Merge the supplied fields onto `expense`, leaving absent ones alone.
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(value) = self.value {
            expense.value = value;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(payment_method) = &self.payment_method {
            expense.payment_method = payment_method.clone();
        }
        if let Some(is_paid) = self.is_paid {
            expense.is_paid = is_paid;
        }
    }

    /// Whether the update contains no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The raw JSON body accepted by the expense create and update endpoints.
///
/// Every field is optional so that validation can report all missing and
/// malformed fields in one response instead of failing on the first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    /// The spending bucket the expense belongs to.
    pub category: Option<String>,
    /// A text description of what the expense was for.
    pub description: Option<String>,
    /// The amount as a string-encoded decimal, e.g. "50.00".
    pub value: Option<String>,
    /// The due date as "YYYY-MM-DD".
    pub date: Option<String>,
    /// How the expense was or will be paid.
    pub payment_method: Option<String>,
    /// Whether the expense has already been paid. Defaults to true on
    /// creation.
    pub is_paid: Option<bool>,
}

impl ExpensePayload {
    /// Validate the payload as a creation request.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every missing or malformed field.
    pub fn into_draft(self) -> Result<ExpenseDraft, Error> {
        let mut errors = Vec::new();

        let category = require_text("category", self.category, &mut errors);
        let description = require_text("description", self.description, &mut errors);
        let payment_method = require_text("paymentMethod", self.payment_method, &mut errors);

        let value = match self.value {
            Some(raw) => collect_field("value", parse_value(&raw), &mut errors),
            None => {
                errors.push(FieldError::new("value", "is required"));
                None
            }
        };

        let date = match self.date {
            Some(raw) => collect_field("date", parse_date(&raw), &mut errors),
            None => {
                errors.push(FieldError::new("date", "is required"));
                None
            }
        };

        match (category, description, value, date, payment_method) {
            (Some(category), Some(description), Some(value), Some(date), Some(payment_method))
                if errors.is_empty() =>
            {
                Ok(ExpenseDraft {
                    category,
                    description,
                    value,
                    date,
                    payment_method,
                    is_paid: self.is_paid.unwrap_or(true),
                })
            }
            _ => Err(Error::Validation(errors)),
        }
    }

    /// Validate the payload as a partial update.
    ///
    /// Absent fields are skipped; supplied fields must still parse and an
    /// empty update is valid (it leaves the record unchanged).
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every malformed field.
    pub fn into_update(self) -> Result<ExpenseUpdate, Error> {
        let mut errors = Vec::new();

        let update = ExpenseUpdate {
            category: optional_text("category", self.category, &mut errors),
            description: optional_text("description", self.description, &mut errors),
            payment_method: optional_text("paymentMethod", self.payment_method, &mut errors),
            value: self
                .value
                .and_then(|raw| collect_field("value", parse_value(&raw), &mut errors)),
            date: self
                .date
                .and_then(|raw| collect_field("date", parse_date(&raw), &mut errors)),
            is_paid: self.is_paid,
        };

        if errors.is_empty() {
            Ok(update)
        } else {
            Err(Error::Validation(errors))
        }
    }
}

fn require_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        Some(_) => {
            errors.push(FieldError::new(field, "must not be empty"));
            None
        }
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

fn optional_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(text) if text.trim().is_empty() => {
            errors.push(FieldError::new(field, "must not be empty"));
            None
        }
        other => other,
    }
}

fn collect_field<T>(
    field: &'static str,
    result: Result<T, String>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

fn parse_value(raw: &str) -> Result<Decimal, String> {
    let value = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| format!("\"{raw}\" is not a decimal amount"))?;

    if value < Decimal::ZERO {
        return Err("must not be negative".to_string());
    }

    Ok(value)
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("\"{raw}\" is not a calendar date in the form 2024-03-01"))
}

#[cfg(test)]
mod expense_payload_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::Error;

    use super::ExpensePayload;

    fn valid_payload() -> ExpensePayload {
        ExpensePayload {
            category: Some("fuel".to_string()),
            description: Some("Gas".to_string()),
            value: Some("50.00".to_string()),
            date: Some("2024-03-01".to_string()),
            payment_method: Some("cash".to_string()),
            is_paid: None,
        }
    }

    #[test]
    fn draft_keeps_all_fields() {
        let draft = valid_payload().into_draft().unwrap();

        assert_eq!(draft.category, "fuel");
        assert_eq!(draft.description, "Gas");
        assert_eq!(draft.value, "50.00".parse::<Decimal>().unwrap());
        assert_eq!(draft.date, date!(2024 - 03 - 01));
        assert_eq!(draft.payment_method, "cash");
    }

    #[test]
    fn draft_defaults_to_paid() {
        let draft = valid_payload().into_draft().unwrap();

        assert!(draft.is_paid);
    }

    #[test]
    fn draft_keeps_explicit_unpaid_flag() {
        let mut payload = valid_payload();
        payload.is_paid = Some(false);

        let draft = payload.into_draft().unwrap();

        assert!(!draft.is_paid);
    }

    #[test]
    fn empty_payload_reports_every_missing_field() {
        let result = ExpensePayload::default().into_draft();

        let Err(Error::Validation(errors)) = result else {
            panic!("want validation error, got {result:?}");
        };

        let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
        assert_eq!(
            fields,
            ["category", "description", "paymentMethod", "value", "date"]
        );
    }

    #[test]
    fn draft_rejects_negative_value() {
        let mut payload = valid_payload();
        payload.value = Some("-1.00".to_string());

        let Err(Error::Validation(errors)) = payload.into_draft() else {
            panic!("negative value should not validate");
        };

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "value");
    }

    #[test]
    fn draft_rejects_malformed_value_and_date() {
        let mut payload = valid_payload();
        payload.value = Some("fifty".to_string());
        payload.date = Some("March 1st".to_string());

        let Err(Error::Validation(errors)) = payload.into_draft() else {
            panic!("malformed fields should not validate");
        };

        let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, ["value", "date"]);
    }

    #[test]
    fn update_accepts_empty_payload() {
        let update = ExpensePayload::default().into_update().unwrap();

        assert!(update.is_empty());
    }

    #[test]
    fn update_keeps_supplied_fields_only() {
        let payload = ExpensePayload {
            value: Some("12.34".to_string()),
            is_paid: Some(false),
            ..Default::default()
        };

        let update = payload.into_update().unwrap();

        assert_eq!(update.value, Some("12.34".parse().unwrap()));
        assert_eq!(update.is_paid, Some(false));
        assert_eq!(update.category, None);
        assert_eq!(update.date, None);
    }

    #[test]
    fn update_rejects_blank_category() {
        let payload = ExpensePayload {
            category: Some("   ".to_string()),
            ..Default::default()
        };

        let Err(Error::Validation(errors)) = payload.into_update() else {
            panic!("blank category should not validate");
        };

        assert_eq!(errors[0].field, "category");
    }
}

#[cfg(test)]
mod expense_serde_tests {
    use time::macros::{datetime, date};

    use super::Expense;

    #[test]
    fn serializes_to_the_wire_format() {
        let expense = Expense {
            id: 7,
            category: "fuel".to_string(),
            description: "Gas".to_string(),
            value: "50.00".parse().unwrap(),
            date: date!(2024 - 03 - 01),
            payment_method: "cash".to_string(),
            is_paid: true,
            created_at: datetime!(2024-03-01 12:00:00 UTC),
        };

        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["value"], "50.00");
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["paymentMethod"], "cash");
        assert_eq!(json["isPaid"], true);
        assert_eq!(json["createdAt"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn value_round_trips_exact_cents() {
        let expense = Expense {
            id: 1,
            category: "misc".to_string(),
            description: "Odds and ends".to_string(),
            value: "0.10".parse().unwrap(),
            date: date!(2024 - 03 - 01),
            payment_method: "cash".to_string(),
            is_paid: true,
            created_at: datetime!(2024-03-01 12:00:00 UTC),
        };

        let json = serde_json::to_string(&expense).unwrap();
        let back: Expense = serde_json::from_str(&json).unwrap();

        assert_eq!(back.value, expense.value);
        assert_eq!(back.value.to_string(), "0.10");
    }
}

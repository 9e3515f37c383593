//! The API endpoint URIs.
//!
//! For endpoints that take an ID parameter, e.g., '/api/expenses/{expense_id}',
//! use [format_endpoint].

/// The route reporting whether the server is up.
pub const HEALTH: &str = "/api/health";
/// The route that checks an email against the allow-list.
pub const CHECK_AUTHORIZATION: &str = "/api/auth/check-authorization";
/// The route serving the mirrored identity record.
pub const AUTH_USER: &str = "/api/auth/user";
/// The route listing the emails on the allow-list.
pub const AUTHORIZED_EMAILS: &str = "/api/auth/authorized-emails";
/// The route to add an email to the allow-list.
pub const ADD_EMAIL: &str = "/api/auth/add-email";
/// The route to remove an email from the allow-list.
pub const REMOVE_EMAIL: &str = "/api/auth/remove-email";
/// The admin view of the allow-list.
pub const ADMIN_USERS: &str = "/api/admin/users";
/// The admin route to remove a single allow-list entry.
pub const ADMIN_USER: &str = "/api/admin/users/{email}";
/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route listing expenses that are not yet paid.
pub const UNPAID_EXPENSES: &str = "/api/expenses/unpaid";
/// The route listing the expenses in one category.
pub const EXPENSES_BY_CATEGORY: &str = "/api/expenses/category/{category}";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to flag a single expense as paid.
pub const MARK_EXPENSE_PAID: &str = "/api/expenses/{expense_id}/paid";
/// The route to read and replace the account balance.
pub const ACCOUNT_BALANCE: &str = "/api/account/balance";
/// The route projecting the balance against unpaid expenses.
pub const ACCOUNT_PROJECTION: &str = "/api/account/projection";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}',
/// '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII
/// characters and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::HEALTH);
        assert_endpoint_is_valid_uri(endpoints::CHECK_AUTHORIZATION);
        assert_endpoint_is_valid_uri(endpoints::AUTH_USER);
        assert_endpoint_is_valid_uri(endpoints::AUTHORIZED_EMAILS);
        assert_endpoint_is_valid_uri(endpoints::ADD_EMAIL);
        assert_endpoint_is_valid_uri(endpoints::REMOVE_EMAIL);
        assert_endpoint_is_valid_uri(endpoints::ADMIN_USERS);
        assert_endpoint_is_valid_uri(endpoints::ADMIN_USER);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::UNPAID_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_BY_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::MARK_EXPENSE_PAID);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT_BALANCE);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT_PROJECTION);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::EXPENSE, 1);

        assert_eq!(formatted_path, "/api/expenses/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::MARK_EXPENSE_PAID, 7);

        assert_eq!(formatted_path, "/api/expenses/7/paid");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint(endpoints::EXPENSES, 1);

        assert_eq!(formatted_path, "/api/expenses");
    }
}

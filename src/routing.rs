//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    auth::{
        add_admin_user_endpoint, add_email_endpoint, check_authorization_endpoint,
        get_admin_users_endpoint, get_authorized_emails_endpoint, get_current_user_endpoint,
        remove_admin_user_endpoint, remove_email_endpoint,
    },
    balance::{
        get_account_balance_endpoint, get_account_projection_endpoint,
        update_account_balance_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expenses_by_category_endpoint,
        get_expenses_endpoint, get_unpaid_expenses_endpoint, mark_expense_paid_endpoint,
        update_expense_endpoint,
    },
    health::get_health_endpoint,
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
///
/// The API is consumed cross-origin by the hosted frontend, so every
/// response allows any origin, the standard verbs, and common headers.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(endpoints::HEALTH, get(get_health_endpoint))
        .route(
            endpoints::CHECK_AUTHORIZATION,
            post(check_authorization_endpoint),
        )
        .route(endpoints::AUTH_USER, get(get_current_user_endpoint))
        .route(
            endpoints::AUTHORIZED_EMAILS,
            get(get_authorized_emails_endpoint),
        )
        .route(endpoints::ADD_EMAIL, post(add_email_endpoint))
        .route(endpoints::REMOVE_EMAIL, delete(remove_email_endpoint))
        .route(
            endpoints::ADMIN_USERS,
            get(get_admin_users_endpoint).post(add_admin_user_endpoint),
        )
        .route(endpoints::ADMIN_USER, delete(remove_admin_user_endpoint))
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::UNPAID_EXPENSES, get(get_unpaid_expenses_endpoint))
        .route(
            endpoints::EXPENSES_BY_CATEGORY,
            get(get_expenses_by_category_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::MARK_EXPENSE_PAID, patch(mark_expense_paid_endpoint))
        .route(
            endpoints::ACCOUNT_BALANCE,
            get(get_account_balance_endpoint).put(update_account_balance_endpoint),
        )
        .route(
            endpoints::ACCOUNT_PROJECTION,
            get(get_account_projection_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
        .with_state(state)
}

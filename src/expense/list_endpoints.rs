//! The endpoints listing expenses: the full history, the unpaid subset, and
//! a single category.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState, Error,
    expense::Expense,
    pagination::{Page, PageQuery, paginate},
};

/// A route handler listing all expenses, newest date first, one page at a
/// time.
pub async fn get_expenses_endpoint(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Expense>>, Error> {
    let expenses = state.storage.get_all_expenses().await?;

    let page = query.page.unwrap_or(state.pagination_config.default_page);
    let limit = query
        .limit
        .unwrap_or(state.pagination_config.default_page_size);

    Ok(Json(paginate(expenses, page, limit)))
}

/// A route handler listing unpaid expenses, soonest due first, one page at a
/// time.
///
/// The default page size is smaller than the main list's; the upcoming
/// expenses view only shows a handful of rows.
pub async fn get_unpaid_expenses_endpoint(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Expense>>, Error> {
    let expenses = state.storage.get_unpaid_expenses().await?;

    let page = query.page.unwrap_or(state.pagination_config.default_page);
    let limit = query
        .limit
        .unwrap_or(state.pagination_config.unpaid_page_size);

    Ok(Json(paginate(expenses, page, limit)))
}

/// A route handler listing the expenses recorded under one category.
pub async fn get_expenses_by_category_endpoint(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Expense>>, Error> {
    let expenses = state.storage.get_expenses_by_category(&category).await?;

    Ok(Json(expenses))
}

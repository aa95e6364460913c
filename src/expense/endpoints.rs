//! Route handlers that expose the [ExpenseStore] to authenticated users.
//!
//! The owner of every expense is the user in the auth cookie, never a value
//! supplied in the request body.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    expense::{ExpenseData, ExpenseId, ExpenseStore},
};

/// The fields a client sends to create or update an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// What the money was spent on.
    pub name: String,
    /// How much was spent.
    pub amount: f64,
    /// The category of the expense.
    pub category: String,
    /// The date in the format `YYYY-MM-DD`.
    pub date: String,
}

impl TryFrom<ExpenseForm> for ExpenseData {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        ExpenseData::parse(&form.name, form.amount, &form.category, &form.date)
            .map_err(Error::from)
    }
}

/// The body returned after creating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// The ID of the new record.
    pub id: i64,
}

/// List the user's expenses in the order they were added.
pub async fn list_expenses_endpoint(
    State(store): State<ExpenseStore>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match store.list(user_id) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Create an expense owned by the user and respond with its ID.
pub async fn create_expense_endpoint(
    State(store): State<ExpenseStore>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<ExpenseForm>,
) -> Response {
    let result = ExpenseData::try_from(form).and_then(|data| store.add(user_id, data));

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Get a single expense owned by the user.
pub async fn get_expense_endpoint(
    State(store): State<ExpenseStore>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    match store.get(expense_id, user_id) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Replace all the fields of an expense owned by the user.
pub async fn update_expense_endpoint(
    State(store): State<ExpenseStore>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    Json(form): Json<ExpenseForm>,
) -> Response {
    let result =
        ExpenseData::try_from(form).and_then(|data| store.update(expense_id, user_id, data));

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

/// Delete an expense owned by the user.
pub async fn delete_expense_endpoint(
    State(store): State<ExpenseStore>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    match store.delete(expense_id, user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            if error != Error::NotFound {
                tracing::error!("Could not delete expense {expense_id}: {error}");
            }
            error.into_response()
        }
    }
}

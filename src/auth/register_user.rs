//! Route handler for registering new users.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthStore, UserIdResponse};

/// The data entered by the user when registering.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name the user will log in with.
    pub username: String,
    /// Password entered during registration.
    pub password: String,
    /// The password typed in a second time, checked when present.
    pub confirm_password: Option<String>,
}

/// Handler for creating a new user.
///
/// Responds with 201 and the new user's ID on success. The client must log
/// in separately to get an auth cookie.
pub async fn register_user(
    State(auth_store): State<AuthStore>,
    Json(user_data): Json<RegisterForm>,
) -> Response {
    match auth_store.register(
        &user_data.username,
        &user_data.password,
        user_data.confirm_password.as_deref(),
    ) {
        Ok(user_id) => (StatusCode::CREATED, Json(UserIdResponse { user_id })).into_response(),
        Err(error) => error.into_response(),
    }
}

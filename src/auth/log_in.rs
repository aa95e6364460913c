//! This file defines the route for handling log-in requests.
//! The lower level credential and cookie logic lives in [AuthStore](crate::auth::AuthStore)
//! and the cookie module.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{AuthState, UserID, set_auth_cookie},
};

/// The credentials entered by the user when logging in.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The body returned after a successful log-in or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdResponse {
    /// The ID of the authenticated user.
    pub user_id: UserID,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the user's ID returned.
///
/// # Errors
///
/// Responds with a 401 status if the username or password is not correct.
pub async fn post_log_in(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<LogInData>,
) -> Response {
    let user_id = match state
        .auth_store
        .log_in(&user_data.username, &user_data.password)
    {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    match set_auth_cookie(jar, user_id, state.cookie_duration) {
        Ok(jar) => (jar, Json(UserIdResponse { user_id })).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            Error::InvalidCredentials.into_response()
        }
    }
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::{AuthState, AuthStore, DEFAULT_COOKIE_DURATION, cookie::COOKIE_USER_ID},
        db::initialize,
        endpoints,
    };

    use super::{UserIdResponse, post_log_in};

    fn get_test_state() -> AuthState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        AuthState {
            cookie_key: Key::from(&Sha512::digest(b"foobar")),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            auth_store: AuthStore::with_hash_cost(Arc::new(Mutex::new(connection)), 4),
        }
    }

    fn get_server(state: AuthState) -> TestServer {
        let app = Router::new()
            .route(endpoints::LOG_IN, post(post_log_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = get_test_state();
        let user_id = state.auth_store.register("alice", "test", None).unwrap();
        let server = get_server(state);

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({ "username": "alice", "password": "test" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<UserIdResponse>(), UserIdResponse { user_id });
        assert_ne!(response.cookie(COOKIE_USER_ID).value(), user_id.to_string());
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let state = get_test_state();
        state.auth_store.register("alice", "test", None).unwrap();
        let server = get_server(state);

        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "username": "alice", "password": "wrongpassword" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_user() {
        let server = get_server(get_test_state());

        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "username": "nobody", "password": "test" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let server = get_server(get_test_state());

        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "username": "alice" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

//! Log-out route handler that invalidates authentication cookies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::auth::invalidate_auth_cookie;

/// Invalidate the auth cookie.
pub async fn post_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, StatusCode::NO_CONTENT).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{auth::cookie::COOKIE_USER_ID, endpoints};

    use super::post_log_out;

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie() {
        let key = Key::from(&Sha512::digest(b"foobar"));
        let app = Router::new()
            .route(endpoints::LOG_OUT, post(post_log_out))
            .with_state(key);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.post(endpoints::LOG_OUT).await;

        response.assert_status(StatusCode::NO_CONTENT);
        let cookie = response.cookie(COOKIE_USER_ID);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }
}

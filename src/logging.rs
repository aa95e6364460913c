//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::Value;

/// The number of characters of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that is read into memory for logging.
///
/// Matches the default body limit of axum's `Json` extractor.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// The fields whose values are never written to the log.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in request bodies are replaced with asterisks whatever the
/// content type of the request says.
///
/// Requests with bodies over [MAX_REQUEST_BODY_BYTES] are rejected with a 413
/// status before they reach the router.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(text) => text,
        Err(error) => {
            let error = error.into_inner();
            if error.downcast_ref::<LengthLimitError>().is_some() {
                tracing::warn!(
                    "Rejected request to {} with a body over {MAX_REQUEST_BODY_BYTES} bytes",
                    parts.uri
                );
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            }

            tracing::warn!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &redact_passwords(&body_text));

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body, usize::MAX).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Replace the values of the password fields in a JSON object or a
/// URL encoded form with asterisks.
///
/// Other JSON values and plain text are returned unchanged.
fn redact_passwords(body_text: &str) -> String {
    match serde_json::from_str::<Value>(body_text) {
        Ok(Value::Object(mut object)) => {
            for field_name in REDACTED_FIELDS {
                if let Some(field) = object.get_mut(field_name) {
                    *field = Value::String("********".to_owned());
                }
            }

            Value::Object(object).to_string()
        }
        Ok(_) => body_text.to_owned(),
        Err(_) => redact_form_fields(body_text),
    }
}

fn redact_form_fields(form_text: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if REDACTED_FIELDS.contains(&key) => format!("{key}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

async fn body_to_text(body: Body, limit: usize) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, limit).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

fn truncate(body: &str) -> Option<String> {
    if body.chars().count() > LOG_BODY_LENGTH_LIMIT {
        Some(body.chars().take(LOG_BODY_LENGTH_LIMIT).collect())
    } else {
        None
    }
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}

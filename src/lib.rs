//! An expense tracker for recording personal spending and summarizing it.
//!
//! Users register with a username and password, then record expenses and
//! notes that only they can see. Reports total a user's expenses over a date
//! range, broken down by category and by month.
//!
//! The stores ([AuthStore], [ExpenseStore], [NoteStore] and [ReportEngine])
//! can be used on their own, and [build_router] exposes them as a JSON API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod db;
mod endpoints;
mod error;
mod expense;
mod logging;
mod note;
mod report;
mod routing;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{
    AuthState, AuthStore, CookieError, DEFAULT_COOKIE_DURATION, LogInData, PasswordHash,
    RegisterForm, User, UserID, UserIdResponse, Username, ValidatedPassword,
};
pub use db::initialize as initialize_db;
pub use error::{Error, ValidationError};
pub use expense::{
    CreatedResponse, Expense, ExpenseData, ExpenseForm, ExpenseId, ExpenseStore, parse_date,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_REQUEST_BODY_BYTES, logging_middleware};
pub use note::{Note, NoteForm, NoteId, NoteStore, NoteText};
pub use report::{MonthlyTotal, Report, ReportEngine, ReportQuery, YearMonth};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

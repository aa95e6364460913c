//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, auth::AuthStore, db::initialize, expense::ExpenseStore, note::NoteStore,
    report::ReportEngine,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// Registers users and checks their credentials.
    pub auth_store: AuthStore,

    /// The users' expenses.
    pub expense_store: ExpenseStore,

    /// The users' notes.
    pub note_store: NoteStore,

    /// Summarizes the users' expenses.
    pub report_engine: ReportEngine,

    /// The database connection shared by the stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// All the stores share `db_connection`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        cookie_duration: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let expense_store = ExpenseStore::new(connection.clone());

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration,
            auth_store: AuthStore::new(connection.clone()),
            report_engine: ReportEngine::new(expense_store.clone()),
            expense_store,
            note_store: NoteStore::new(connection.clone()),
            db_connection: connection,
        })
    }

    /// Hash new passwords with `hash_cost` rounds instead of [PasswordHash::DEFAULT_COST].
    ///
    /// [PasswordHash::DEFAULT_COST]: crate::auth::PasswordHash::DEFAULT_COST
    pub fn with_hash_cost(self, hash_cost: u32) -> Self {
        Self {
            auth_store: AuthStore::with_hash_cost(self.db_connection.clone(), hash_cost),
            ..self
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<AppState> for AuthStore {
    fn from_ref(state: &AppState) -> Self {
        state.auth_store.clone()
    }
}

impl FromRef<AppState> for ExpenseStore {
    fn from_ref(state: &AppState) -> Self {
        state.expense_store.clone()
    }
}

impl FromRef<AppState> for NoteStore {
    fn from_ref(state: &AppState) -> Self {
        state.note_store.clone()
    }
}

impl FromRef<AppState> for ReportEngine {
    fn from_ref(state: &AppState) -> Self {
        state.report_engine.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

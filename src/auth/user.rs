//! Code for creating the user table, registering users and verifying their credentials.

use std::{
    fmt::Display,
    sync::{Arc, Mutex, OnceLock},
};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error, ValidationError,
    auth::{PasswordHash, ValidatedPassword},
    db::lock_connection,
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated, non-empty username.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [ValidationError::EmptyUsername] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.is_empty() {
            Err(ValidationError::EmptyUsername)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a username without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Registers users and verifies their credentials.
#[derive(Debug, Clone)]
pub struct AuthStore {
    connection: Arc<Mutex<Connection>>,
    hash_cost: u32,
    /// Checked against when the username is unknown, so that log-in takes
    /// about as long whether or not the user exists.
    dummy_hash: Arc<OnceLock<PasswordHash>>,
}

impl AuthStore {
    /// Create a new auth store that hashes passwords with [PasswordHash::DEFAULT_COST].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self::with_hash_cost(connection, PasswordHash::DEFAULT_COST)
    }

    /// Create a new auth store that hashes passwords with `hash_cost` rounds.
    pub fn with_hash_cost(connection: Arc<Mutex<Connection>>, hash_cost: u32) -> Self {
        Self {
            connection,
            hash_cost,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Register a new user and return their ID.
    ///
    /// If `confirmation` is given it must match `password`.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::Validation] if the username or password is empty, or the confirmation does not match,
    /// - [Error::DuplicateUsername] if the username is already registered,
    /// - [Error::HashingError] if the password could not be hashed,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: Option<&str>,
    ) -> Result<UserID, Error> {
        let username = Username::new(username)?;
        let password = ValidatedPassword::new_confirmed(password, confirmation)?;
        let password_hash = PasswordHash::new(password, self.hash_cost)?;

        let connection = lock_connection(&self.connection)?;
        connection.execute(
            "INSERT INTO user (username, password) VALUES (?1, ?2)",
            (username.as_ref(), password_hash.as_ref()),
        )?;

        let id = UserID::new(connection.last_insert_rowid());
        tracing::info!("Registered user {id}");

        Ok(id)
    }

    /// Check `password` against the stored credential for `username` and
    /// return the user's ID if it matches.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidCredentials] if there is no such user or the password does not match,
    /// - [Error::HashingError] if the stored hash is malformed,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn log_in(&self, username: &str, password: &str) -> Result<UserID, Error> {
        let user = match self.get_by_username(username.trim()) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                self.verify_dummy_password(password);
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        };

        if user.password_hash.verify(password)? {
            Ok(user.id)
        } else {
            tracing::warn!("Failed log-in attempt for user {}", user.id);
            Err(Error::InvalidCredentials)
        }
    }

    /// Get the user with the ID `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if `user_id` does not belong to a registered
    /// user, or [Error::SqlError] if there was an error accessing the database.
    pub fn get(&self, user_id: UserID) -> Result<User, Error> {
        lock_connection(&self.connection)?
            .prepare("SELECT id, username, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &user_id.as_i64())], map_user_row)
            .map_err(|error| error.into())
    }

    /// Get the number of users in the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::SqlError] if an SQL related error occurred.
    pub fn count(&self) -> Result<usize, Error> {
        let count: i64 = lock_connection(&self.connection)?.query_row(
            "SELECT COUNT(id) FROM user;",
            [],
            |row| row.get(0),
        )?;

        usize::try_from(count)
            .map_err(|_| Error::SqlError(rusqlite::Error::IntegralValueOutOfRange(0, count)))
    }

    /// Check `password` against a throwaway hash with the same cost as the
    /// real ones, ignoring the result.
    fn verify_dummy_password(&self, password: &str) {
        let dummy_hash = self.dummy_hash.get_or_init(|| {
            let raw_hash =
                bcrypt::hash("not a real password", self.hash_cost).unwrap_or_else(|error| {
                    tracing::error!("Could not create dummy password hash: {error}");
                    String::new()
                });

            PasswordHash::new_unchecked(&raw_hash)
        });

        let _ = dummy_hash.verify(password);
    }

    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        lock_connection(&self.connection)?
            .prepare("SELECT id, username, password FROM user WHERE username = :username")?
            .query_row(&[(":username", &username)], map_user_row)
            .map_err(|error| error.into())
    }
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(raw_id),
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

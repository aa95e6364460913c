//! Free-text notes kept by a user alongside their expenses.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, ValidationError, auth::UserID, db::lock_connection};

/// Database identifier for a note.
pub type NoteId = i64;

/// The validated, non-empty text of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteText(String);

impl NoteText {
    /// Create the text of a note, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [ValidationError::EmptyNote] if `text` is empty or only whitespace.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();

        if text.is_empty() {
            Err(ValidationError::EmptyNote)
        } else {
            Ok(Self(text.to_string()))
        }
    }

    /// Create the text of a note without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid
    /// string is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for NoteText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NoteText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note written by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// The ID of the note.
    pub id: NoteId,
    /// What the user wrote.
    pub text: NoteText,
    /// The user that wrote the note.
    pub owner_id: UserID,
}

/// Create the note table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_note_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS note (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            note TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Adds and lists a user's notes.
#[derive(Debug, Clone)]
pub struct NoteStore {
    connection: Arc<Mutex<Connection>>,
}

impl NoteStore {
    /// Create a new note store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Save a note for `owner_id` and return its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if `text` is empty,
    /// - [Error::NotFound] if `owner_id` does not refer to a registered user,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn add(&self, owner_id: UserID, text: &str) -> Result<NoteId, Error> {
        let text = NoteText::new(text)?;
        let connection = lock_connection(&self.connection)?;

        connection.execute(
            "INSERT INTO note (note, user_id) VALUES (?1, ?2)",
            (text.as_ref(), owner_id.as_i64()),
        )?;

        Ok(connection.last_insert_rowid())
    }

    /// Get all the notes written by `owner_id` in the order they were added.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    pub fn list(&self, owner_id: UserID) -> Result<Vec<Note>, Error> {
        lock_connection(&self.connection)?
            .prepare("SELECT id, note, user_id FROM note WHERE user_id = ?1 ORDER BY id ASC")?
            .query_map([owner_id.as_i64()], map_note_row)?
            .map(|maybe_note| maybe_note.map_err(|error| error.into()))
            .collect()
    }
}

fn map_note_row(row: &Row) -> Result<Note, rusqlite::Error> {
    let raw_text: String = row.get(1)?;

    Ok(Note {
        id: row.get(0)?,
        text: NoteText::new_unchecked(&raw_text),
        owner_id: UserID::new(row.get(2)?),
    })
}

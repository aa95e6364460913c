//! Defines the expense model and the store that scopes every query to the expense's owner.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, ValidationError, auth::UserID, db::lock_connection};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money spent by a user on something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub name: String,
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// The category used to group expenses in reports, e.g. "Food".
    pub category: String,
    /// When the money was spent.
    pub date: Date,
    /// The user that recorded the expense.
    pub owner_id: UserID,
}

/// The user editable fields of an expense, validated on construction.
///
/// Both [ExpenseStore::add] and [ExpenseStore::update] take this type, so
/// invalid input is rejected before the database is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseData {
    name: String,
    amount: f64,
    category: String,
    date: Date,
}

impl ExpenseData {
    /// Validate the fields of an expense.
    ///
    /// `name` and `category` are trimmed of surrounding whitespace.
    ///
    /// # Errors
    /// This function will return a:
    /// - [ValidationError::EmptyExpenseName] if `name` is empty,
    /// - [ValidationError::NonPositiveAmount] if `amount` is not a finite number greater than zero,
    /// - or [ValidationError::EmptyCategory] if `category` is empty.
    pub fn new(
        name: &str,
        amount: f64,
        category: &str,
        date: Date,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyExpenseName);
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(amount));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Self {
            name: name.to_owned(),
            amount,
            category: category.to_owned(),
            date,
        })
    }

    /// Validate the fields of an expense whose date is an ISO 8601 calendar
    /// date string, e.g. "2024-03-05".
    ///
    /// # Errors
    /// Returns the errors of [ExpenseData::new], or
    /// [ValidationError::InvalidDate] if `date` is not a valid calendar date.
    pub fn parse(
        name: &str,
        amount: f64,
        category: &str,
        date: &str,
    ) -> Result<Self, ValidationError> {
        let date = parse_date(date)?;

        Self::new(name, amount, category, date)
    }

    /// What the money was spent on.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How much was spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The category of the expense.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// When the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }
}

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date in the format `YYYY-MM-DD`.
///
/// # Errors
/// Returns [ValidationError::InvalidDate] if `raw_date` is not formatted
/// correctly or does not exist in the calendar (e.g. "2023-02-29").
pub fn parse_date(raw_date: &str) -> Result<Date, ValidationError> {
    Date::parse(raw_date.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw_date.to_owned()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

/// Creates, reads, updates and deletes expenses on behalf of their owners.
///
/// Every method that takes an [ExpenseId] also takes the ID of the user
/// making the request, and treats expenses owned by someone else exactly
/// like expenses that do not exist.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl ExpenseStore {
    /// Create a new expense store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Record a new expense for `owner_id` and return its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `owner_id` does not refer to a registered user,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn add(&self, owner_id: UserID, data: ExpenseData) -> Result<ExpenseId, Error> {
        let connection = lock_connection(&self.connection)?;

        connection.execute(
            "INSERT INTO expense (name, amount, category, date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                data.name,
                data.amount,
                data.category,
                data.date,
                owner_id.as_i64()
            ],
        )?;

        Ok(connection.last_insert_rowid())
    }

    /// Retrieve the expense `id` if it belongs to `requester_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to an expense owned by `requester_id`,
    /// - or [Error::SqlError] there is some other SQL error.
    pub fn get(&self, id: ExpenseId, requester_id: UserID) -> Result<Expense, Error> {
        lock_connection(&self.connection)?
            .prepare(
                "SELECT id, name, amount, category, date, user_id FROM expense
                 WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, requester_id.as_i64()), map_expense_row)
            .map_err(|error| error.into())
    }

    /// Replace every field of the expense `id` with `data`.
    ///
    /// The update is a single statement, so readers see either the old or the
    /// new expense and never a mix of the two.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to an expense owned by `requester_id`,
    /// - or [Error::SqlError] there is some other SQL error.
    pub fn update(
        &self,
        id: ExpenseId,
        requester_id: UserID,
        data: ExpenseData,
    ) -> Result<(), Error> {
        let rows_affected = lock_connection(&self.connection)?.execute(
            "UPDATE expense
             SET name = ?1, amount = ?2, category = ?3, date = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                data.name,
                data.amount,
                data.category,
                data.date,
                id,
                requester_id.as_i64()
            ],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete the expense `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to an expense owned by `requester_id`,
    /// - or [Error::SqlError] there is some other SQL error.
    pub fn delete(&self, id: ExpenseId, requester_id: UserID) -> Result<(), Error> {
        let rows_affected = lock_connection(&self.connection)?.execute(
            "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
            (id, requester_id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Get all the expenses owned by `owner_id` in the order they were added.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    pub fn list(&self, owner_id: UserID) -> Result<Vec<Expense>, Error> {
        lock_connection(&self.connection)?
            .prepare(
                "SELECT id, name, amount, category, date, user_id FROM expense
                 WHERE user_id = ?1 ORDER BY id ASC",
            )?
            .query_map([owner_id.as_i64()], map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
            .collect()
    }
}

/// Map a database row to an Expense.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        owner_id: UserID::new(row.get(5)?),
    })
}

// ============================================================================
// TESTS
// ============================================================================

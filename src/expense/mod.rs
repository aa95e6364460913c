//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the validated `ExpenseData` input type
//! - The `ExpenseStore` for storing, querying, and managing a user's expenses
//! - Route handlers exposing the store over HTTP

mod core;
mod endpoints;

pub use core::{
    Expense, ExpenseData, ExpenseId, ExpenseStore, create_expense_table, parse_date,
};
pub use endpoints::{
    CreatedResponse, ExpenseForm, create_expense_endpoint, delete_expense_endpoint,
    get_expense_endpoint, list_expenses_endpoint, update_expense_endpoint,
};

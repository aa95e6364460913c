//! Builds spending reports from a user's expenses.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error, ValidationError,
    auth::UserID,
    expense::{Expense, ExpenseStore, parse_date},
    report::aggregation::{
        aggregate_by_category, aggregate_by_month, filter_by_date_range, sum_amounts,
    },
};

/// A calendar month, ordered chronologically and written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Create a month from its year and its month number, from 1 to 12.
    ///
    /// # Errors
    ///
    /// Returns [ValidationError::InvalidDate] if `month` is not between 1 and 12.
    pub fn new(year: i32, month: u8) -> Result<Self, ValidationError> {
        Month::try_from(month)
            .map(|_| Self { year, month })
            .map_err(|_| ValidationError::InvalidDate(format!("{year}-{month:02}")))
    }

    /// The year of the month.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, from 1 for January to 12 for December.
    pub fn month(&self) -> u8 {
        self.month
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_date(&format!("{value}-01"))
            .map(YearMonth::from)
            .map_err(|_| ValidationError::InvalidDate(value))
    }
}

/// The amount spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// The month the expenses fall in.
    pub month: YearMonth,
    /// The sum of the expenses in `month`.
    pub total: f64,
}

/// A summary of the expenses in a date range.
///
/// The default report is the report over no expenses: a zero total, no
/// average and empty breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The sum of all expense amounts.
    pub total: f64,
    /// The mean expense amount, absent when there are no expenses.
    pub average: Option<f64>,
    /// How many expenses the report covers.
    pub count: usize,
    /// The total spent per category, in ascending order of category name.
    pub category_breakdown: BTreeMap<String, f64>,
    /// The total spent per month, oldest first. Only months with expenses appear.
    pub monthly_series: Vec<MonthlyTotal>,
    /// The expenses the report covers, in the order they were added.
    pub expenses: Vec<Expense>,
}

impl Report {
    fn from_expenses(expenses: Vec<Expense>) -> Self {
        if expenses.is_empty() {
            return Self::default();
        }

        let total = sum_amounts(&expenses);
        let count = expenses.len();
        let monthly_series = aggregate_by_month(&expenses)
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect();

        Self {
            total,
            average: Some(total / count as f64),
            count,
            category_breakdown: aggregate_by_category(&expenses),
            monthly_series,
            expenses,
        }
    }
}

/// Summarizes a user's expenses over a date range.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    expense_store: ExpenseStore,
}

impl ReportEngine {
    /// Create a report engine that reads expenses from `expense_store`.
    pub fn new(expense_store: ExpenseStore) -> Self {
        Self { expense_store }
    }

    /// Summarize the expenses of `user_id` dated from `start` to `end`, inclusive.
    ///
    /// An empty report is returned if the user has no expenses in the range,
    /// including when `start` is after `end`.
    ///
    /// # Errors
    /// This function will return an error if the expenses could not be read from the database.
    pub fn summarize(&self, user_id: UserID, start: Date, end: Date) -> Result<Report, Error> {
        let expenses = self.expense_store.list(user_id)?;
        let expenses = filter_by_date_range(expenses, start, end);

        Ok(Report::from_expenses(expenses))
    }

    /// The dates of the earliest and the latest expenses of `user_id`, or
    /// `None` if the user has no expenses.
    ///
    /// # Errors
    /// This function will return an error if the expenses could not be read from the database.
    pub fn date_bounds(&self, user_id: UserID) -> Result<Option<(Date, Date)>, Error> {
        let expenses = self.expense_store.list(user_id)?;

        let first = expenses.iter().map(|expense| expense.date).min();
        let last = expenses.iter().map(|expense| expense.date).max();

        Ok(first.zip(last))
    }
}


#[cfg(test)]
mod report_engine_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        auth::{AuthStore, UserID},
        db::initialize,
        expense::{ExpenseData, ExpenseStore},
    };

    use super::{MonthlyTotal, Report, ReportEngine, YearMonth};

    fn get_engine() -> (ReportEngine, ExpenseStore, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));
        let user_id = AuthStore::with_hash_cost(connection.clone(), 4)
            .register("alice", "hunter2", None)
            .unwrap();
        let expense_store = ExpenseStore::new(connection);

        (ReportEngine::new(expense_store.clone()), expense_store, user_id)
    }

    fn add_expense(store: &ExpenseStore, user_id: UserID, amount: f64, category: &str, date: Date) {
        store
            .add(
                user_id,
                ExpenseData::new("Something", amount, category, date).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn summarize_march_expenses() {
        let (engine, store, user_id) = get_engine();
        add_expense(&store, user_id, 10.0, "Food", date!(2024 - 03 - 01));
        add_expense(&store, user_id, 20.0, "Food", date!(2024 - 03 - 15));
        add_expense(&store, user_id, 99.0, "Rent", date!(2024 - 04 - 01));

        let report = engine
            .summarize(user_id, date!(2024 - 03 - 01), date!(2024 - 03 - 31))
            .unwrap();

        assert_eq!(report.total, 30.0);
        assert_eq!(report.average, Some(15.0));
        assert_eq!(report.count, 2);
        assert_eq!(
            report.category_breakdown.into_iter().collect::<Vec<_>>(),
            vec![("Food".to_owned(), 30.0)]
        );
        assert_eq!(
            report.monthly_series,
            vec![MonthlyTotal {
                month: YearMonth::new(2024, 3).unwrap(),
                total: 30.0
            }]
        );
        assert_eq!(report.expenses.len(), 2);
    }

    #[test]
    fn summarize_without_expenses_is_empty() {
        let (engine, _, user_id) = get_engine();

        let report = engine
            .summarize(user_id, date!(2024 - 01 - 01), date!(2024 - 12 - 31))
            .unwrap();

        assert_eq!(report, Report::default());
        assert_eq!(report.total, 0.0);
        assert_eq!(report.average, None);
        assert!(report.category_breakdown.is_empty());
        assert!(report.monthly_series.is_empty());
    }

    #[test]
    fn summarize_with_start_after_end_is_empty() {
        let (engine, store, user_id) = get_engine();
        add_expense(&store, user_id, 10.0, "Food", date!(2024 - 03 - 05));

        let report = engine
            .summarize(user_id, date!(2024 - 03 - 31), date!(2024 - 03 - 01))
            .unwrap();

        assert_eq!(report, Report::default());
    }

    #[test]
    fn summarize_ignores_other_users_expenses() {
        let (engine, store, user_id) = get_engine();
        add_expense(&store, user_id, 10.0, "Food", date!(2024 - 03 - 05));

        let report = engine
            .summarize(
                UserID::new(user_id.as_i64() + 1),
                date!(2024 - 01 - 01),
                date!(2024 - 12 - 31),
            )
            .unwrap();

        assert_eq!(report, Report::default());
    }

    #[test]
    fn summarize_orders_categories_and_months() {
        let (engine, store, user_id) = get_engine();
        add_expense(&store, user_id, 5.0, "Transport", date!(2024 - 05 - 02));
        add_expense(&store, user_id, 7.0, "Food", date!(2024 - 02 - 10));
        add_expense(&store, user_id, 3.0, "Bills", date!(2024 - 05 - 20));

        let report = engine
            .summarize(user_id, date!(2024 - 01 - 01), date!(2024 - 12 - 31))
            .unwrap();

        let categories: Vec<_> = report.category_breakdown.keys().cloned().collect();
        assert_eq!(categories, vec!["Bills", "Food", "Transport"]);
        let months: Vec<_> = report
            .monthly_series
            .iter()
            .map(|monthly| monthly.month.to_string())
            .collect();
        assert_eq!(months, vec!["2024-02", "2024-05"]);
        assert_eq!(report.monthly_series[1].total, 8.0);
    }

    #[test]
    fn date_bounds_returns_earliest_and_latest() {
        let (engine, store, user_id) = get_engine();
        add_expense(&store, user_id, 5.0, "Food", date!(2024 - 05 - 02));
        add_expense(&store, user_id, 7.0, "Food", date!(2023 - 11 - 10));
        add_expense(&store, user_id, 3.0, "Food", date!(2024 - 01 - 20));

        assert_eq!(
            engine.date_bounds(user_id),
            Ok(Some((date!(2023 - 11 - 10), date!(2024 - 05 - 02))))
        );
    }

    #[test]
    fn date_bounds_is_none_without_expenses() {
        let (engine, _, user_id) = get_engine();

        assert_eq!(engine.date_bounds(user_id), Ok(None));
    }
}

//! Expense aggregation for reports.
//!
//! Provides functions to filter expenses by date, and to total them by
//! category and by calendar month.

use std::collections::{BTreeMap, HashMap};

use time::Date;

use crate::{expense::Expense, report::YearMonth};

/// Keeps the expenses dated between `start` and `end`, inclusive.
///
/// The relative order of the expenses is preserved. No expenses are kept if
/// `start` is after `end`.
pub(super) fn filter_by_date_range(expenses: Vec<Expense>, start: Date, end: Date) -> Vec<Expense> {
    expenses
        .into_iter()
        .filter(|expense| start <= expense.date && expense.date <= end)
        .collect()
}

/// Sums the amounts of `expenses`.
pub(super) fn sum_amounts(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Sums expense amounts by category.
///
/// # Returns
/// Map of each category to the sum of its expense amounts, iterating in
/// ascending order of category name.
pub(super) fn aggregate_by_category(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    totals
}

/// Sums expense amounts by calendar month.
///
/// # Returns
/// Vector of (month, total) pairs sorted chronologically. Months without any
/// expenses are left out.
pub(super) fn aggregate_by_month(expenses: &[Expense]) -> Vec<(YearMonth, f64)> {
    let mut totals: HashMap<YearMonth, f64> = HashMap::new();

    for expense in expenses {
        *totals.entry(YearMonth::from(expense.date)).or_insert(0.0) += expense.amount;
    }

    let mut sorted: Vec<_> = totals.into_iter().collect();
    sorted.sort_by_key(|(month, _)| *month);
    sorted
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        expense::Expense,
        report::{
            YearMonth,
            aggregation::{
                aggregate_by_category, aggregate_by_month, filter_by_date_range, sum_amounts,
            },
        },
    };

    fn create_test_expense(id: i64, amount: f64, date: Date, category: &str) -> Expense {
        Expense {
            id,
            name: format!("expense #{id}"),
            amount,
            category: category.to_owned(),
            date,
            owner_id: UserID::new(1),
        }
    }

    #[test]
    fn filter_by_date_range_is_inclusive() {
        let expenses = vec![
            create_test_expense(1, 1.0, date!(2024 - 02 - 29), "Food"),
            create_test_expense(2, 2.0, date!(2024 - 03 - 01), "Food"),
            create_test_expense(3, 3.0, date!(2024 - 03 - 31), "Food"),
            create_test_expense(4, 4.0, date!(2024 - 04 - 01), "Food"),
        ];

        let result = filter_by_date_range(expenses, date!(2024 - 03 - 01), date!(2024 - 03 - 31));

        let ids: Vec<_> = result.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn filter_by_date_range_keeps_nothing_when_start_after_end() {
        let expenses = vec![create_test_expense(1, 1.0, date!(2024 - 03 - 05), "Food")];

        let result = filter_by_date_range(expenses, date!(2024 - 03 - 31), date!(2024 - 03 - 01));

        assert!(result.is_empty());
    }

    #[test]
    fn sum_amounts_handles_empty_input() {
        assert_eq!(sum_amounts(&[]), 0.0);
    }

    #[test]
    fn aggregate_by_category_sorts_alphabetically() {
        let expenses = vec![
            create_test_expense(1, 5.0, date!(2024 - 01 - 15), "Transport"),
            create_test_expense(2, 10.0, date!(2024 - 01 - 20), "Food"),
            create_test_expense(3, 2.5, date!(2024 - 02 - 10), "Bills"),
            create_test_expense(4, 7.5, date!(2024 - 02 - 11), "Food"),
        ];

        let result = aggregate_by_category(&expenses);

        let pairs: Vec<_> = result.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Bills".to_owned(), 2.5),
                ("Food".to_owned(), 17.5),
                ("Transport".to_owned(), 5.0),
            ]
        );
    }

    #[test]
    fn aggregate_by_month_sums_and_sorts_chronologically() {
        let expenses = vec![
            create_test_expense(1, 100.0, date!(2024 - 03 - 15), "Food"),
            create_test_expense(2, 50.0, date!(2023 - 12 - 20), "Transport"),
            create_test_expense(3, 30.0, date!(2024 - 03 - 10), "Food"),
            create_test_expense(4, 25.0, date!(2024 - 01 - 25), "Food"),
        ];

        let result = aggregate_by_month(&expenses);

        assert_eq!(
            result,
            vec![
                (YearMonth::new(2023, 12).unwrap(), 50.0),
                (YearMonth::new(2024, 1).unwrap(), 25.0),
                (YearMonth::new(2024, 3).unwrap(), 130.0),
            ]
        );
    }

    #[test]
    fn aggregate_by_month_handles_empty_input() {
        assert!(aggregate_by_month(&[]).is_empty());
    }
}

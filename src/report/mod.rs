//! Spending reports: totals, averages and breakdowns by category and month.

mod aggregation;
mod endpoint;
mod engine;

pub use endpoint::{ReportQuery, get_report_endpoint};
pub use engine::{MonthlyTotal, Report, ReportEngine, YearMonth};

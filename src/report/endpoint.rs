//! The route handler for the spending report.

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    expense::parse_date,
    report::{Report, ReportEngine},
};

/// The optional date range of a report, each date in the format `YYYY-MM-DD`.
///
/// A missing date defaults to the date of the user's earliest or latest
/// expense respectively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// The first day the report covers.
    pub start: Option<String>,
    /// The last day the report covers.
    pub end: Option<String>,
}

/// Summarize the user's expenses between the dates in the query string.
pub async fn get_report_endpoint(
    State(engine): State<ReportEngine>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Response {
    match build_report(&engine, user_id, query) {
        Ok(report) => Json(report).into_response(),
        Err(error) => error.into_response(),
    }
}

fn build_report(
    engine: &ReportEngine,
    user_id: UserID,
    query: ReportQuery,
) -> Result<Report, Error> {
    let start = query.start.as_deref().map(parse_date).transpose()?;
    let end = query.end.as_deref().map(parse_date).transpose()?;

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => match engine.date_bounds(user_id)? {
            Some((first, last)) => (start.unwrap_or(first), end.unwrap_or(last)),
            None => return Ok(Report::default()),
        },
    };

    tracing::debug!("Building report for user {user_id} from {start} to {end}");
    engine.summarize(user_id, start, end)
}

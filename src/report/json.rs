use crate::error::AppResult;

use super::RaceReport;

/// Pretty-printed JSON report. Bodies keep `<`, `>` and `&` as sent.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &RaceReport) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

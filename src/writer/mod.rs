//! Summary writer - SearchOutcome → human-readable report
//!
//! Text layout, one line per included day followed by the totals block:
//!
//! ```text
//! Mon: 5.00 units, Cost: €10.00, Unique Route Count: 1
//! Tue: 3.00 units, Cost: €6.00, Unique Route Count: 1
//!
//! Total Units: 8.00
//! Total Cost: €16.00
//! ```

use crate::error::{PineError, PineResult};
use crate::excel::SummaryExporter;
use crate::types::{DailyAggregate, SearchOutcome};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when no destination is given
pub const DEFAULT_EXPORT_FILE: &str = "search_result.txt";

/// `search_result.txt` next to the running executable
pub fn default_export_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_EXPORT_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
}

/// Format a number with exactly two decimal places
pub fn format_amount(n: f64) -> String {
    format!("{:.2}", n)
}

/// Format a cost with the euro sign
pub fn format_cost(n: f64) -> String {
    format!("€{:.2}", n)
}

/// Summary line for one day
pub fn format_day(day: &DailyAggregate) -> String {
    format!(
        "{}: {} units, Cost: {}, Unique Route Count: {}",
        day.day,
        format_amount(day.units),
        format_cost(day.cost),
        day.unique_routes
    )
}

/// Render the whole text summary
pub fn format_summary(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    for day in outcome.daily() {
        out.push_str(&format_day(&day));
        out.push('\n');
    }
    out.push_str(&format!("\nTotal Units: {}\n", format_amount(outcome.total_units)));
    out.push_str(&format!("Total Cost: {}\n", format_cost(outcome.total_cost)));
    out
}

/// Write the text summary to `destination`, replacing any previous file.
/// Returns the absolute path written.
pub fn export_summary(outcome: &SearchOutcome, destination: &Path) -> PineResult<PathBuf> {
    fs::write(destination, format_summary(outcome)).map_err(|e| {
        PineError::Export(format!("Failed to write {}: {}", destination.display(), e))
    })?;
    info!(path = %destination.display(), days = outcome.daily_units.len(), "summary exported");
    Ok(resolved(destination))
}

/// Export as .xlsx when the destination asks for it, otherwise as text
pub fn export_report(outcome: &SearchOutcome, destination: &Path) -> PineResult<PathBuf> {
    let is_xlsx = destination
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        SummaryExporter::new(outcome).export(destination)?;
        info!(path = %destination.display(), "summary workbook exported");
        Ok(resolved(destination))
    } else {
        export_summary(outcome, destination)
    }
}

fn resolved(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

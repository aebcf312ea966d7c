//! Search-and-aggregate engine
//!
//! Per sheet, in workbook order:
//! 1. keep rows whose selected identifier contains the query (case-insensitive)
//! 2. count distinct routes over those matched rows
//! 3. drop rows whose unit quantity is exactly zero; the rest join the result
//! 4. sum units and cost over the remaining rows
//! 5. a sheet with a positive unit sum gets a daily entry and feeds the totals
//!
//! Step 2 runs before step 3, so zero-unit rows still count towards routes.

use crate::error::PineResult;
use crate::excel::{SheetSource, WorkbookSource};
use crate::layout::{ColumnLayout, Field};
use crate::types::{CellValue, MatchedRow, SearchColumn, SearchOutcome, Sheet};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Search a workbook with the default report layout.
///
/// `search_by_customer` selects the customer column, otherwise the
/// transporter column is matched. Never fails: an unreadable workbook
/// yields an outcome whose `error` is set and whose aggregates are empty.
pub fn search<P: AsRef<Path>>(path: P, query: &str, search_by_customer: bool) -> SearchOutcome {
    let column = SearchColumn::from_customer_flag(search_by_customer);
    SearchEngine::default().search_path(path, query, column)
}

/// Totals for a single sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTally {
    /// Rows matching the query, zero-unit rows included
    pub matched: usize,
    pub unique_routes: usize,
    /// Rows matching the query with non-zero units
    pub included: Vec<MatchedRow>,
    pub units: f64,
    pub cost: f64,
}

impl SheetTally {
    /// Only sheets with a positive unit sum appear in the daily aggregates
    pub fn counts_towards_totals(&self) -> bool {
        self.units > 0.0
    }
}

/// Distinct-route key; numbers compare by value so `5` and `5.0` are one route
#[derive(Debug, Hash, PartialEq, Eq)]
enum RouteKey {
    Missing,
    Bool(bool),
    Number(u64),
    Text(String),
}

impl From<&CellValue> for RouteKey {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Null => RouteKey::Missing,
            CellValue::Bool(b) => RouteKey::Bool(*b),
            CellValue::Int(i) => RouteKey::Number(number_bits(*i as f64)),
            CellValue::Float(f) => RouteKey::Number(number_bits(*f)),
            CellValue::Text(s) => RouteKey::Text(s.clone()),
        }
    }
}

fn number_bits(v: f64) -> u64 {
    // -0.0 and 0.0 are the same route
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Aggregating search engine over a fixed column layout
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    layout: ColumnLayout,
}

impl SearchEngine {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Search a workbook file, folding any data-source failure into the outcome
    pub fn search_path<P: AsRef<Path>>(
        &self,
        path: P,
        query: &str,
        column: SearchColumn,
    ) -> SearchOutcome {
        let path = path.as_ref();
        match self.try_search_path(path, query, column) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "search failed");
                SearchOutcome::failed(e.to_string())
            }
        }
    }

    /// Search a workbook file, propagating data-source failures
    pub fn try_search_path<P: AsRef<Path>>(
        &self,
        path: P,
        query: &str,
        column: SearchColumn,
    ) -> PineResult<SearchOutcome> {
        let mut source = WorkbookSource::open(path)?.with_header_rows(self.layout.header_rows);
        self.search_source(&mut source, query, column)
    }

    /// Search every sheet of a source, in its enumeration order
    pub fn search_source<S: SheetSource + ?Sized>(
        &self,
        source: &mut S,
        query: &str,
        column: SearchColumn,
    ) -> PineResult<SearchOutcome> {
        let needle = query.to_lowercase();
        let mut outcome = SearchOutcome::default();

        for name in source.sheet_names() {
            let sheet = source.load_sheet(&name)?;
            let tally = self.scan_sheet(&sheet, &needle, column);

            debug!(
                sheet = %sheet.name,
                matched = tally.matched,
                included = tally.included.len(),
                units = tally.units,
                cost = tally.cost,
                routes = tally.unique_routes,
                "scanned sheet"
            );

            if tally.counts_towards_totals() {
                outcome.record_day(&sheet.name, tally.units, tally.cost, tally.unique_routes);
            }
            outcome.rows.extend(tally.included);
        }

        info!(
            query,
            column = column.label(),
            rows = outcome.rows.len(),
            days = outcome.daily_units.len(),
            total_units = outcome.total_units,
            total_cost = outcome.total_cost,
            "search complete"
        );
        Ok(outcome)
    }

    /// Filter and aggregate one sheet. `needle` must already be lowercase.
    pub fn scan_sheet(&self, sheet: &Sheet, needle: &str, column: SearchColumn) -> SheetTally {
        let field = Field::from(column);

        let matched: Vec<_> = sheet
            .rows
            .iter()
            .filter(|row| {
                self.layout
                    .value(row, field)
                    .to_string()
                    .to_lowercase()
                    .contains(needle)
            })
            .collect();

        let unique_routes = matched
            .iter()
            .map(|row| RouteKey::from(self.layout.value(row, Field::Route)))
            .collect::<HashSet<_>>()
            .len();

        let mut units = 0.0;
        let mut cost = 0.0;
        let mut included = Vec::new();
        for row in &matched {
            let row_units = self.layout.value(row, Field::Units);
            if row_units.is_zero() {
                continue;
            }
            units += row_units.number_or_zero();
            cost += self.layout.value(row, Field::Cost).number_or_zero();
            included.push(MatchedRow {
                sheet: sheet.name.clone(),
                row: row.number,
                cells: row.cells.clone(),
            });
        }

        SheetTally {
            matched: matched.len(),
            unique_routes,
            included,
            units,
            cost,
        }
    }
}

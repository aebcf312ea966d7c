use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A single spreadsheet cell, reduced to the shapes the search cares about
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell (or a position past the end of a short row)
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell. Only `Int` and `Float` are numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Value used when summing: non-numeric cells count as zero
    pub fn number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// True only for numeric cells holding exactly zero
    pub fn is_zero(&self) -> bool {
        self.as_number() == Some(0.0)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
            CellValue::Int(i) => write!(f, "{}", i),
            // Whole numbers print without a fractional part, as a spreadsheet shows them
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

//==============================================================================
// Dataset model
//==============================================================================

static NULL_CELL: CellValue = CellValue::Null;

/// One data row of a sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    /// 1-based row number in the source sheet
    pub number: usize,
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<CellValue>) -> Self {
        Self { number, cells }
    }

    /// Cell at a 0-based column position, `Null` when the row is shorter
    pub fn cell(&self, position: usize) -> &CellValue {
        self.cells.get(position).unwrap_or(&NULL_CELL)
    }
}

/// A named sheet (one per report day)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a data row, numbering it after the header row
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        let number = self.rows.len() + 2;
        self.rows.push(Row::new(number, cells));
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// In-memory multi-sheet dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub sheets: Vec<Sheet>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }
}

//==============================================================================
// Search input/output
//==============================================================================

/// Which identifier column the query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchColumn {
    Customer,
    Transporter,
}

impl SearchColumn {
    /// Map the boolean selector used by callers (`true` = customer)
    pub fn from_customer_flag(search_by_customer: bool) -> Self {
        if search_by_customer {
            SearchColumn::Customer
        } else {
            SearchColumn::Transporter
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchColumn::Customer => "customer",
            SearchColumn::Transporter => "transporter",
        }
    }
}

/// A row that passed both the query filter and the zero-unit filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRow {
    pub sheet: String,
    /// 1-based row number in the source sheet
    pub row: usize,
    pub cells: Vec<CellValue>,
}

/// Per-sheet aggregate, as rendered in the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub day: String,
    pub units: f64,
    pub cost: f64,
    pub unique_routes: usize,
}

/// Result of one search
///
/// The three daily maps always share the same keys, in sheet order.
/// A failed search carries `error` and empty/zero aggregates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub rows: Vec<MatchedRow>,
    pub total_units: f64,
    pub total_cost: f64,
    pub daily_units: IndexMap<String, f64>,
    pub daily_cost: IndexMap<String, f64>,
    pub daily_route_count: IndexMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    /// Outcome for a search that could not read its data source
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// True when no sheet produced an aggregate entry
    pub fn is_empty(&self) -> bool {
        self.daily_units.is_empty()
    }

    /// Record an included sheet and fold it into the grand totals
    pub fn record_day(&mut self, day: &str, units: f64, cost: f64, unique_routes: usize) {
        self.daily_units.insert(day.to_string(), units);
        self.daily_cost.insert(day.to_string(), cost);
        self.daily_route_count.insert(day.to_string(), unique_routes);
        self.total_units += units;
        self.total_cost += cost;
    }

    /// Per-day rows in sheet order
    pub fn daily(&self) -> Vec<DailyAggregate> {
        self.daily_units
            .iter()
            .map(|(day, units)| DailyAggregate {
                day: day.clone(),
                units: *units,
                cost: self.daily_cost.get(day).copied().unwrap_or(0.0),
                unique_routes: self.daily_route_count.get(day).copied().unwrap_or(0),
            })
            .collect()
    }
}

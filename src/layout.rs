//! Column layout of the daily report
//!
//! The search reads five columns by position. `ColumnLayout` names them once
//! so the engine never touches raw offsets. A layout can be loaded from YAML,
//! where every column is either a 0-based index or a spreadsheet letter:
//!
//! ```yaml
//! header_rows: 1
//! customer: B
//! route: K
//! transporter: L
//! units: 18
//! cost: T
//! ```

use crate::error::{PineError, PineResult};
use crate::types::{CellValue, Row, SearchColumn};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Named columns the search reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Customer,
    Route,
    Transporter,
    Units,
    Cost,
}

impl From<SearchColumn> for Field {
    fn from(column: SearchColumn) -> Self {
        match column {
            SearchColumn::Customer => Field::Customer,
            SearchColumn::Transporter => Field::Transporter,
        }
    }
}

/// Positions of the report columns (0-based, column A = 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnLayout {
    /// Leading rows of every sheet that hold column titles
    pub header_rows: usize,
    #[serde(deserialize_with = "column_position")]
    pub customer: usize,
    #[serde(deserialize_with = "column_position")]
    pub route: usize,
    #[serde(deserialize_with = "column_position")]
    pub transporter: usize,
    #[serde(deserialize_with = "column_position")]
    pub units: usize,
    #[serde(deserialize_with = "column_position")]
    pub cost: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            header_rows: 1,
            customer: 1,     // B
            route: 10,       // K
            transporter: 11, // L
            units: 18,       // S
            cost: 19,        // T
        }
    }
}

impl ColumnLayout {
    /// Load a layout from a YAML file and validate it
    pub fn from_file(path: &Path) -> PineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PineError::Config(format!(
                "Failed to read layout file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> PineResult<Self> {
        let layout: ColumnLayout = serde_yaml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Reject layouts that would make the aggregates meaningless
    pub fn validate(&self) -> PineResult<()> {
        if self.units == self.cost {
            return Err(PineError::Config(format!(
                "units and cost cannot share column {}",
                index_to_column_letter(self.units)
            )));
        }
        Ok(())
    }

    pub fn position(&self, field: Field) -> usize {
        match field {
            Field::Customer => self.customer,
            Field::Route => self.route,
            Field::Transporter => self.transporter,
            Field::Units => self.units,
            Field::Cost => self.cost,
        }
    }

    /// Cell for a named field, `Null` when the row is too short
    pub fn value<'a>(&self, row: &'a Row, field: Field) -> &'a CellValue {
        row.cell(self.position(field))
    }
}

/// Column given either as an index (`18`) or a letter (`"S"`)
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRef {
    Index(usize),
    Letter(String),
}

fn column_position<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    match ColumnRef::deserialize(deserializer)? {
        ColumnRef::Index(i) => Ok(i),
        ColumnRef::Letter(s) => column_letter_to_index(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid column reference '{}'", s))
        }),
    }
}

/// Convert a column letter to a 0-based index (A→0, Z→25, AA→26)
pub fn column_letter_to_index(letter: &str) -> Option<usize> {
    let letter = letter.trim();
    if letter.is_empty() {
        return None;
    }

    let mut index = 0usize;
    for c in letter.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Convert a 0-based column index to its letter (0→A, 25→Z, 26→AA)
pub fn index_to_column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

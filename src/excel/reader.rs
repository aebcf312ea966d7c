//! Sheet sources - where the search engine gets its rows from

use crate::error::{PineError, PineResult};
use crate::types::{CellValue, Dataset, Row, Sheet};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A multi-sheet dataset that can be enumerated and loaded sheet by sheet
pub trait SheetSource {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Load every data row of one sheet
    fn load_sheet(&mut self, name: &str) -> PineResult<Sheet>;
}

impl SheetSource for Dataset {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn load_sheet(&mut self, name: &str) -> PineResult<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| PineError::DataSource(format!("Sheet '{}' not found", name)))
    }
}

/// Spreadsheet file read through calamine (.xlsx, .xlsm, .xlsb, .xls, .ods)
pub struct WorkbookSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
    header_rows: usize,
}

impl WorkbookSource {
    /// Open a workbook; the first row of every sheet is treated as a header
    pub fn open<P: AsRef<Path>>(path: P) -> PineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook = open_workbook_auto(&path).map_err(|e| {
            PineError::DataSource(format!("Failed to open {}: {}", path.display(), e))
        })?;

        Ok(Self {
            path,
            workbook,
            header_rows: 1,
        })
    }

    /// Number of leading title rows skipped in every sheet
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Turn a used range into data rows with absolute column positions
    fn rows_from_range(&self, range: &Range<Data>) -> Vec<Row> {
        let Some((start_row, start_col)) = range.start() else {
            return Vec::new();
        };

        range
            .rows()
            .enumerate()
            .filter_map(|(offset, cells)| {
                let absolute_row = start_row as usize + offset;
                if absolute_row < self.header_rows {
                    return None;
                }
                // Interior blank lines stay as all-Null records
                let mut values = vec![CellValue::Null; start_col as usize];
                values.extend(cells.iter().map(data_to_cell_value));
                Some(Row::new(absolute_row + 1, values))
            })
            .collect()
    }
}

impl SheetSource for WorkbookSource {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn load_sheet(&mut self, name: &str) -> PineResult<Sheet> {
        let range = self.workbook.worksheet_range(name).map_err(|e| {
            PineError::DataSource(format!(
                "Failed to read sheet '{}' in {}: {}",
                name,
                self.path.display(),
                e
            ))
        })?;

        let rows = self.rows_from_range(&range);
        debug!(sheet = name, rows = rows.len(), "loaded sheet");

        Ok(Sheet {
            name: name.to_string(),
            rows,
        })
    }
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        // Spreadsheet serial date (days since 1899-12-30)
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#ERROR: {:?}", e)),
    }
}

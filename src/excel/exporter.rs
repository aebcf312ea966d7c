//! Excel summary exporter - SearchOutcome → .xlsx

use crate::error::{PineError, PineResult};
use crate::types::SearchOutcome;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

const HEADERS: [&str; 4] = ["Day", "Units", "Cost", "Unique Route Count"];

/// Writes the per-day aggregate table and grand totals to a worksheet
pub struct SummaryExporter<'a> {
    outcome: &'a SearchOutcome,
    sheet_name: String,
}

impl<'a> SummaryExporter<'a> {
    pub fn new(outcome: &'a SearchOutcome) -> Self {
        Self {
            outcome,
            sheet_name: "Summary".to_string(),
        }
    }

    /// Name of the worksheet holding the summary
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Export the summary to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> PineResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| PineError::Export(format!("Failed to set worksheet name: {}", e)))?;

        self.write_summary(worksheet)
            .map_err(|e| PineError::Export(format!("Failed to write summary: {}", e)))?;

        workbook
            .save(output_path)
            .map_err(|e| PineError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn write_summary(&self, worksheet: &mut Worksheet) -> Result<(), rust_xlsxwriter::XlsxError> {
        let bold = Format::new().set_bold();
        let amount = Format::new().set_num_format("0.00");
        let euros = Format::new().set_num_format("€#,##0.00");
        let bold_amount = Format::new().set_bold().set_num_format("0.00");
        let bold_euros = Format::new().set_bold().set_num_format("€#,##0.00");

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }

        let mut row: u32 = 1;
        for day in self.outcome.daily() {
            worksheet.write_string(row, 0, &day.day)?;
            worksheet.write_number_with_format(row, 1, day.units, &amount)?;
            worksheet.write_number_with_format(row, 2, day.cost, &euros)?;
            worksheet.write_number(row, 3, day.unique_routes as f64)?;
            row += 1;
        }

        // Blank line, then the totals block
        row += 1;
        worksheet.write_string_with_format(row, 0, "Total", &bold)?;
        worksheet.write_number_with_format(row, 1, self.outcome.total_units, &bold_amount)?;
        worksheet.write_number_with_format(row, 2, self.outcome.total_cost, &bold_euros)?;

        worksheet.set_column_width(0, 16)?;
        worksheet.set_column_width(3, 20)?;
        Ok(())
    }
}

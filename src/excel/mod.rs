//! Spreadsheet I/O
//!
//! - Reading: workbook sheets → rows for the search engine (calamine)
//! - Writing: search summary → .xlsx (rust_xlsxwriter)

mod exporter;
mod reader;

pub use exporter::SummaryExporter;
pub use reader::{SheetSource, WorkbookSource};

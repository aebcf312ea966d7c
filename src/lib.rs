//! PineSearch - daily report search and aggregation
//!
//! Searches every sheet of a daily-report workbook for rows whose customer
//! (or transporter) contains a query, drops zero-unit rows, and totals units,
//! cost and distinct routes per day.
//!
//! # Example
//!
//! ```no_run
//! use pinesearch::core::search;
//! use pinesearch::writer::export_summary;
//! use std::path::Path;
//!
//! let outcome = search("daily_report.xlsx", "acme", true);
//! if let Some(error) = &outcome.error {
//!     eprintln!("No matching records found ({error})");
//! } else if !outcome.is_empty() {
//!     for day in outcome.daily() {
//!         println!("{}: {:.2} units", day.day, day.units);
//!     }
//!     export_summary(&outcome, Path::new("search_result.txt"))?;
//! }
//! # Ok::<(), pinesearch::error::PineError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod layout;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{PineError, PineResult};
pub use layout::ColumnLayout;
pub use types::{CellValue, Dataset, MatchedRow, SearchColumn, SearchOutcome, Sheet};

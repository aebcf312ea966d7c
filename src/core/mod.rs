//! Search-and-aggregate engine over daily report workbooks

pub mod search;

pub use search::{search, SearchEngine, SheetTally};

//! CLI command handlers

pub mod commands;

pub use commands::{load_layout, search, sheets, watch, SearchOptions};

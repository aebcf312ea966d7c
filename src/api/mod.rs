//! PineSearch API Server module
//!
//! Provides an HTTP REST API over the search engine.
//! Run with `pinesearch-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server};

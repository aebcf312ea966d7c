//! PineSearch API Server binary
//!
//! HTTP REST API for daily report lookups.

use clap::Parser;
use pinesearch::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "pinesearch-server")]
#[command(version)]
#[command(about = "PineSearch API Server - HTTP REST API for daily report search")]
#[command(long_about = r#"
PineSearch API Server - HTTP REST API

Endpoints:
  - POST /api/v1/search  - Search a workbook, return rows and per-day aggregates
  - POST /api/v1/export  - Search a workbook and write the summary file
  - GET  /health         - Health check
  - GET  /version        - Server version info
  - GET  /               - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - Tracing and structured logging (RUST_LOG)

Example usage:
  pinesearch-server                           # Start on localhost:8080
  pinesearch-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/search \
    -H "Content-Type: application/json" \
    -d '{"file_path": "report.xlsx", "query": "ACME", "search_by_customer": true}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PINESEARCH_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PINESEARCH_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}

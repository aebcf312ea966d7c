//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cli::load_layout;
use crate::core::SearchEngine;
use crate::error::{PineError, PineResult};
use crate::types::{SearchColumn, SearchOutcome};
use crate::writer;

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "PineSearch API Server".to_string(),
        version: state.version.clone(),
        description: "HTTP API for daily report search and aggregation".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new(
                "/api/v1/search",
                "POST",
                "Search a workbook and return per-day aggregates",
            ),
            EndpointInfo::new(
                "/api/v1/export",
                "POST",
                "Search a workbook and write the summary file",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["search".to_string(), "export".to_string()],
    }))
}

fn default_true() -> bool {
    true
}

/// Search request
#[derive(Deserialize)]
pub struct SearchRequest {
    pub file_path: String,
    #[serde(default)]
    pub query: String,
    /// Match the customer column; `false` matches the transporter column
    #[serde(default = "default_true")]
    pub search_by_customer: bool,
    /// Optional YAML column layout on the server's filesystem
    #[serde(default)]
    pub layout_path: Option<String>,
}

/// Run the blocking workbook scan off the async executor
async fn run_search(req: &SearchRequest) -> PineResult<SearchOutcome> {
    let layout = load_layout(req.layout_path.as_deref().map(Path::new))?;
    let path = PathBuf::from(&req.file_path);
    let query = req.query.clone();
    let column = SearchColumn::from_customer_flag(req.search_by_customer);

    tokio::task::spawn_blocking(move || SearchEngine::new(layout).search_path(path, &query, column))
        .await
        .map_err(|e| PineError::DataSource(format!("Search task failed: {}", e)))
}

/// POST /api/v1/search - Search a workbook
pub async fn search(Json(req): Json<SearchRequest>) -> impl IntoResponse {
    info!(file = %req.file_path, query = %req.query, "search request");

    match run_search(&req).await {
        Ok(outcome) => match outcome.error {
            Some(ref message) => Json(ApiResponse::err(message.clone())),
            None => Json(ApiResponse::ok(outcome)),
        },
        Err(e) => Json(ApiResponse::<SearchOutcome>::err(e.to_string())),
    }
}

/// Export request
#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub search: SearchRequest,
    /// Destination; `.xlsx` writes a workbook, anything else plain text
    pub output_path: String,
}

/// Export response
#[derive(Serialize, Default)]
pub struct ExportResponse {
    pub exported: bool,
    pub output_path: String,
    pub days: usize,
    pub message: String,
}

/// POST /api/v1/export - Search a workbook and write the summary
pub async fn export(Json(req): Json<ExportRequest>) -> impl IntoResponse {
    info!(
        file = %req.search.file_path,
        output = %req.output_path,
        "export request"
    );

    let outcome = match run_search(&req.search).await {
        Ok(outcome) => outcome,
        Err(e) => return Json(ApiResponse::<ExportResponse>::err(e.to_string())),
    };

    if let Some(ref message) = outcome.error {
        return Json(ApiResponse::err(message.clone()));
    }

    if outcome.is_empty() {
        return Json(ApiResponse::ok(ExportResponse {
            exported: false,
            output_path: req.output_path,
            days: 0,
            message: "No matching records found.".to_string(),
        }));
    }

    let destination = PathBuf::from(&req.output_path);
    let days = outcome.daily_units.len();
    let written =
        tokio::task::spawn_blocking(move || writer::export_report(&outcome, &destination)).await;

    match written {
        Ok(Ok(path)) => Json(ApiResponse::ok(ExportResponse {
            exported: true,
            output_path: path.display().to_string(),
            days,
            message: "Export completed".to_string(),
        })),
        Ok(Err(e)) => Json(ApiResponse::ok(ExportResponse {
            exported: false,
            output_path: req.output_path,
            days,
            message: format!("Error: {}", e),
        })),
        Err(e) => Json(ApiResponse::err(format!("Export task failed: {}", e))),
    }
}

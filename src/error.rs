use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// The school sheet could not be read.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook {path:?}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// A click could not be turned into an LGA.
#[derive(Debug, Error, PartialEq)]
pub enum ResolutionError {
    #[error("no LGAs to match against")]
    NoAggregates,

    #[error("click coordinate ({lat}, {lng}) is not finite")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::DataLoad(ref e) => {
                tracing::error!("Data load error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "School data is unavailable".to_string(),
                )
            }
            AppError::Template(ref e) => {
                tracing::error!("Template error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

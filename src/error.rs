use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::io;
use std::path::PathBuf;

/// Errors raised by the directory scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan was started with an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A filter pattern could not be compiled.
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// An exclude glob could not be compiled.
    #[error("invalid exclude pattern: {0}")]
    InvalidExclude(#[from] globset::Error),
    /// Listing a directory or stat'ing an entry failed.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScanError::Filesystem { path: path.into(), source }
    }

    /// The underlying I/O error kind, if this is a filesystem error.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ScanError::Filesystem { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Errors raised by the view engine.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("failed to read template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The HTTP-facing error type.
///
/// Every variant renders as a JSON body of the form
/// `{ "error": { "code", "message", "details"? }, "status", "timestamp" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("View error: {0}")]
    View(ViewError),
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::NotFound(name) => AppError::NotFound(format!("template '{}' not found", name)),
            other => AppError::View(other),
        }
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ScanError::InvalidFilter { .. } | ScanError::InvalidExclude(_) => {
                AppError::BadRequest(err.to_string())
            }
            other => AppError::View(ViewError::Scan(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::View(e) => {
                tracing::warn!("View error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "VIEW_ERROR",
                    "Template rendering failed".to_string(),
                    Some(json!({ "details": e.to_string() })),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

/// A type alias for `Result<T, AppError>`, used by the HTTP handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Request validation helpers.
pub mod validation {
    use super::ScanError;
    use std::path::Path;

    /// Rejects roots that can never name a directory.
    pub fn validate_root(root: &Path) -> Result<(), ScanError> {
        if root.as_os_str().is_empty() {
            return Err(ScanError::InvalidArgument("root path cannot be empty".to_string()));
        }
        if root.to_string_lossy().contains('\0') {
            return Err(ScanError::InvalidArgument("root path contains null characters".to_string()));
        }
        Ok(())
    }
}

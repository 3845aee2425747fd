//! Error types for the lca-app service layer.

use std::path::PathBuf;

use lca_core::DataFormatError;
use lca_model::ModelError;

/// Application error wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    #[error("Model store error: {0}")]
    Store(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Project '{0}' has no results section")]
    MissingResults(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lca-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<lca_project::ProjectError> for AppError {
    fn from(err: lca_project::ProjectError) -> Self {
        match err {
            lca_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            lca_project::ProjectError::DataFormat(e) => AppError::DataFormat(e),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<lca_store::StoreError> for AppError {
    fn from(err: lca_store::StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<lca_results::ResultsError> for AppError {
    fn from(err: lca_results::ResultsError) -> Self {
        match err {
            lca_results::ResultsError::DataFormat(e) => AppError::DataFormat(e),
            lca_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

//! Shared application service layer for geolca.
//!
//! Centralizes the pipeline behind the CLI: project loading, model building
//! against a store, results analysis and run output persistence.

pub mod analysis_service;
pub mod error;
pub mod model_service;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod store_service;

pub use analysis_service::{Analysis, analyze};
pub use error::{AppError, AppResult};
pub use model_service::build_model;
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{ProjectSummary, load_inventory, load_project, summarize, validate_project};
pub use query::{RunSummary, get_run_summary, list_runs};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, build_project_model, run_pipeline,
    run_pipeline_with_progress,
};
pub use store_service::{StoreOverride, open_store};

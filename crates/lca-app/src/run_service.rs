//! End-to-end pipeline: model build, results analysis, output persistence.

use std::path::{Path, PathBuf};

use lca_model::ModelReport;
use lca_project::resolve_path;
use lca_results::{CriticalSummary, Mismatch, OutputStore, RunManifest, compute_run_id};
use tracing::info;

use crate::analysis_service;
use crate::error::AppResult;
use crate::model_service;
use crate::progress::{Progress, RunProgressEvent, RunStage};
use crate::project_service;
use crate::store_service::{self, StoreOverride};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub store: StoreOverride,
    /// Build the model in the store before analysing results.
    pub build_model: bool,
    pub tool_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            store: StoreOverride::default(),
            build_model: true,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub options: RunOptions,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub run_dir: PathBuf,
    pub manifest: RunManifest,
    pub model: Option<ModelReport>,
    pub summary: CriticalSummary,
    pub mismatches: Vec<Mismatch>,
}

pub fn run_pipeline(request: &RunRequest) -> AppResult<RunResponse> {
    run_pipeline_with_progress(request, None)
}

/// Run the pipeline and stream progress events.
///
/// Any failure aborts the run; nothing is retried.
pub fn run_pipeline_with_progress(
    request: &RunRequest,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let mut progress = Progress::new(progress_cb);
    let project_path = request.project_path;

    progress.emit(RunStage::LoadingProject, project_path.display().to_string());
    let project = project_service::load_project(project_path)?;
    let inputs = analysis_service::input_paths(project_path, &project)?;

    let model = if request.options.build_model {
        progress.emit(RunStage::LoadingInventory, project.inventory.path.display().to_string());
        let inventory = project_service::load_inventory(project_path, &project)?;

        progress.emit(RunStage::OpeningStore, "connecting");
        let mut store = store_service::open_store(&project.store, request.options.store)?;
        Some(model_service::build_model_with(
            store.as_mut(),
            &project,
            &inventory,
            &mut progress,
        )?)
    } else {
        None
    };

    let analysis = analysis_service::analyze_with(project_path, &project, &mut progress)?;

    progress.emit(RunStage::SavingOutputs, "writing diagrams");
    let contents = inputs
        .iter()
        .map(std::fs::read)
        .collect::<Result<Vec<_>, _>>()?;
    let slices: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();
    let run_id = compute_run_id(&slices, &project.aggregation, &request.options.tool_version);

    let manifest = RunManifest {
        run_id: run_id.clone(),
        project: project.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        tool_version: request.options.tool_version.clone(),
        rule: analysis.rule.describe(),
        categories: analysis.contributions.categories.clone(),
        product_system: model.as_ref().map(|m| m.product_system.id.clone()),
        mismatches: analysis.mismatches.clone(),
    };
    let outputs = OutputStore::new(resolve_path(project_path, &project.output.dir))?;
    let run_dir = outputs.save_run(
        &manifest,
        &analysis.critical_diagram,
        &analysis.coalesced_diagram,
        &analysis.summary,
    )?;
    info!(run_id = %run_id, dir = %run_dir.display(), "run saved");

    progress.emit(RunStage::Completed, run_id.clone());
    Ok(RunResponse {
        run_id,
        run_dir,
        manifest,
        model,
        summary: analysis.summary,
        mismatches: analysis.mismatches,
    })
}

/// Build the model only: inventory, store, registration, product system.
pub fn build_project_model(
    project_path: &Path,
    overrides: StoreOverride,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<ModelReport> {
    let mut progress = Progress::new(progress_cb);

    progress.emit(RunStage::LoadingProject, project_path.display().to_string());
    let project = project_service::load_project(project_path)?;

    progress.emit(RunStage::LoadingInventory, project.inventory.path.display().to_string());
    let inventory = project_service::load_inventory(project_path, &project)?;

    progress.emit(RunStage::OpeningStore, "connecting");
    let mut store = store_service::open_store(&project.store, overrides)?;
    let report = model_service::build_model_with(store.as_mut(), &project, &inventory, &mut progress)?;

    progress.emit(RunStage::Completed, report.product_system.id.clone());
    Ok(report)
}

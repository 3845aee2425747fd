//! Query helpers for saved runs.

use std::path::Path;

use lca_project::resolve_path;
use lca_results::{OutputStore, RunManifest};

use crate::error::AppResult;
use crate::project_service;

/// Summary of a saved run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub timestamp: String,
    pub rule: String,
    /// Category with its critical candidates.
    pub critical: Vec<(String, Vec<String>)>,
    /// Candidate with the number of categories it is critical for.
    pub counts: Vec<(String, usize)>,
    pub most_critical: Vec<String>,
    pub mismatches: usize,
}

fn output_store(project_path: &Path) -> AppResult<OutputStore> {
    let project = project_service::load_project(project_path)?;
    Ok(OutputStore::new(resolve_path(project_path, &project.output.dir))?)
}

/// Saved runs of the project, oldest first.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let project = project_service::load_project(project_path)?;
    let store = OutputStore::new(resolve_path(project_path, &project.output.dir))?;
    Ok(store.list_runs(&project.name)?)
}

pub fn get_run_summary(project_path: &Path, run_id: &str) -> AppResult<RunSummary> {
    let store = output_store(project_path)?;
    let manifest = store.load_manifest(run_id)?;
    let summary = store.load_summary(run_id)?;

    Ok(RunSummary {
        run_id: manifest.run_id,
        timestamp: manifest.timestamp,
        rule: manifest.rule,
        critical: summary
            .categories
            .into_iter()
            .map(|c| (c.category, c.critical))
            .collect(),
        counts: summary
            .counts
            .into_iter()
            .map(|c| (c.label, c.count))
            .collect(),
        most_critical: summary.most_critical,
        mismatches: manifest.mismatches.len(),
    })
}

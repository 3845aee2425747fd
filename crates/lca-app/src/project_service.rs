//! Project loading, validation and introspection.

use std::path::{Path, PathBuf};

use lca_core::LinkingOptions;
use lca_project::{Inventory, Project, PropertyDefaults, StoreDef, resolve_path};

use crate::error::{AppError, AppResult};

/// Overview of a project for listing.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub functional_unit: String,
    pub inventory: PathBuf,
    pub store: String,
    pub linking: LinkingOptions,
    pub candidates: Vec<String>,
    pub has_results: bool,
}

/// Load and validate a project from a YAML file.
pub fn load_project(path: &Path) -> AppResult<Project> {
    lca_project::load_yaml(path).map_err(|e| match e {
        lca_project::ProjectError::Io(source) => AppError::ProjectFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    lca_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))
}

/// Load the project's inventory, resolving its path against the project
/// file's directory.
pub fn load_inventory(project_path: &Path, project: &Project) -> AppResult<Inventory> {
    let path = resolve_path(project_path, &project.inventory.path);
    let defaults = PropertyDefaults::from(&project.inventory);
    Ok(lca_project::load_inventory(&path, &defaults)?)
}

pub fn summarize(project_path: &Path, project: &Project) -> ProjectSummary {
    let store = match &project.store {
        StoreDef::Ipc { host, port, .. } => format!("ipc {host}:{port}"),
        StoreDef::Memory => "memory".to_string(),
    };
    ProjectSummary {
        name: project.name.clone(),
        functional_unit: project.functional_unit.clone(),
        inventory: resolve_path(project_path, &project.inventory.path),
        store,
        linking: project.linking,
        candidates: project
            .aggregation
            .candidates
            .iter()
            .map(|c| c.label.clone())
            .collect(),
        has_results: project.results.is_some(),
    }
}

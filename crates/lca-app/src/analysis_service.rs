//! Impact results analysis: import, reconcile, find critical processes and
//! shape both diagrams.

use std::path::{Path, PathBuf};

use lca_core::Tolerances;
use lca_project::{Project, resolve_path};
use lca_results::{
    CandidateSet, CategoryCritical, ContributionTable, CriticalRule, CriticalSummary, DamageTable,
    ImpactTable, Mismatch, SankeyDiagram, coalesced_diagram, critical_diagram, critical_processes,
    load_contributions, load_damage, load_impacts, reconcile,
};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::progress::{Progress, RunProgressEvent, RunStage};

/// Relative tolerance for impact/contribution reconciliation.
const RECONCILE_REL: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub impacts: ImpactTable,
    pub contributions: ContributionTable,
    pub damage: Option<DamageTable>,
    pub mismatches: Vec<Mismatch>,
    pub candidates: CandidateSet,
    pub rule: CriticalRule,
    pub critical: Vec<CategoryCritical>,
    pub summary: CriticalSummary,
    pub critical_diagram: SankeyDiagram,
    pub coalesced_diagram: SankeyDiagram,
}

pub fn analyze(
    project_path: &Path,
    project: &Project,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<Analysis> {
    analyze_with(project_path, project, &mut Progress::new(progress_cb))
}

/// Input files that determine a run's outputs, in a fixed order.
pub(crate) fn input_paths(project_path: &Path, project: &Project) -> AppResult<Vec<PathBuf>> {
    let results = project
        .results
        .as_ref()
        .ok_or_else(|| AppError::MissingResults(project.name.clone()))?;
    let mut paths = vec![
        resolve_path(project_path, &project.inventory.path),
        resolve_path(project_path, &results.impacts),
        resolve_path(project_path, &results.contributions),
    ];
    if let Some(damage) = &results.damage {
        paths.push(resolve_path(project_path, damage));
    }
    Ok(paths)
}

pub(crate) fn analyze_with(
    project_path: &Path,
    project: &Project,
    progress: &mut Progress<'_>,
) -> AppResult<Analysis> {
    let results = project
        .results
        .as_ref()
        .ok_or_else(|| AppError::MissingResults(project.name.clone()))?;

    progress.emit(RunStage::ImportingResults, "reading impact tables");
    let impacts = load_impacts(&resolve_path(project_path, &results.impacts))?;
    let contributions = load_contributions(&resolve_path(project_path, &results.contributions))?;
    let damage = results
        .damage
        .as_ref()
        .map(|p| load_damage(&resolve_path(project_path, p)))
        .transpose()?;
    let mismatches = reconcile(&impacts, &contributions, Tolerances::relative(RECONCILE_REL));

    progress.emit(
        RunStage::Aggregating,
        format!("{} categories", contributions.categories.len()),
    );
    let candidates = CandidateSet::from_defs(&project.aggregation.candidates, &contributions);
    let rule = CriticalRule::from(&project.aggregation.rule);
    let critical = critical_processes(&contributions, &candidates, rule);
    let summary = CriticalSummary::new(&critical, &candidates, rule);
    let critical_diagram = critical_diagram(&critical, &candidates)?;
    let coalesced_diagram = coalesced_diagram(&contributions, damage.as_ref())?;

    info!(
        categories = contributions.categories.len(),
        candidates = candidates.len(),
        most_critical = ?summary.most_critical,
        "analysis complete"
    );

    Ok(Analysis {
        impacts,
        contributions,
        damage,
        mismatches,
        candidates,
        rule,
        critical,
        summary,
        critical_diagram,
        coalesced_diagram,
    })
}

//! End-to-end pipeline tests on the geopolymer demo with an in-memory store.

use std::path::{Path, PathBuf};

use lca_app::{
    AppError, RunOptions, RunProgressEvent, RunRequest, RunStage, StoreOverride, build_model,
    build_project_model, get_run_summary, list_runs, load_inventory, load_project, run_pipeline,
    run_pipeline_with_progress,
};
use lca_core::ProcessType;
use lca_model::ModelError;
use lca_project::{Project, resolve_path};
use lca_store::{MemoryStore, ModelStore, Process};

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/geopolymer/geopolymer.yaml")
}

/// Copy of the demo project in a fresh temp directory with absolute input
/// paths, so outputs never land in the source tree.
fn temp_project(tag: &str, edit: impl FnOnce(&mut Project)) -> (PathBuf, PathBuf) {
    let demo = demo_path();
    let mut project = lca_project::load_yaml(&demo).unwrap();
    project.inventory.path = resolve_path(&demo, &project.inventory.path);
    if let Some(results) = project.results.as_mut() {
        results.impacts = resolve_path(&demo, &results.impacts);
        results.contributions = resolve_path(&demo, &results.contributions);
        results.damage = results.damage.as_ref().map(|d| resolve_path(&demo, d));
    }
    edit(&mut project);

    let dir = std::env::temp_dir().join(format!("geolca-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.yaml");
    lca_project::save_yaml(&path, &project).unwrap();
    (dir, path)
}

fn memory_options() -> RunOptions {
    RunOptions {
        store: StoreOverride {
            memory: true,
            port: None,
        },
        build_model: true,
        tool_version: "test".to_string(),
    }
}

fn cleanup(dir: &Path) {
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn full_run_on_demo() {
    let (dir, project_path) = temp_project("full", |_| {});
    let request = RunRequest {
        project_path: &project_path,
        options: memory_options(),
    };

    let mut stages = Vec::new();
    let response = run_pipeline_with_progress(
        &request,
        Some(&mut |event: RunProgressEvent| stages.push(event.stage)),
    )
    .unwrap();

    let model = response.model.as_ref().unwrap();
    assert_eq!(model.flows_created, 8);
    assert_eq!(model.product_system.processes.len(), 8);
    assert!(model.product_system.dangling.is_empty());

    assert_eq!(response.summary.most_critical, ["Activator", "Fly Ash"]);
    assert!(response.mismatches.is_empty());
    for file in [
        "manifest.json",
        "critical.json",
        "coalesced.json",
        "critical_summary.json",
    ] {
        assert!(response.run_dir.join(file).exists(), "missing {file}");
    }

    let pos = |s: RunStage| stages.iter().position(|&x| x == s).unwrap();
    assert!(pos(RunStage::RegisteringFlows) < pos(RunStage::RegisteringProcesses));
    assert!(pos(RunStage::RegisteringProcesses) < pos(RunStage::LinkingExchanges));
    assert!(pos(RunStage::LinkingExchanges) < pos(RunStage::BuildingProductSystem));
    assert_eq!(stages.last(), Some(&RunStage::Completed));

    cleanup(&dir);
}

#[test]
fn same_inputs_give_same_run_id() {
    let (dir, project_path) = temp_project("rerun", |_| {});
    let request = RunRequest {
        project_path: &project_path,
        options: memory_options(),
    };

    let first = run_pipeline(&request).unwrap();
    let second = run_pipeline(&request).unwrap();
    assert_eq!(first.run_id, second.run_id);

    let runs = list_runs(&project_path).unwrap();
    assert_eq!(runs.len(), 1);

    let summary = get_run_summary(&project_path, &first.run_id).unwrap();
    assert_eq!(summary.critical.len(), 4);
    assert_eq!(summary.critical[0].1, ["Activator"]);
    assert!(summary.counts.contains(&("GGBFS".to_string(), 0)));

    cleanup(&dir);
}

#[test]
fn analysis_without_store() {
    let (dir, project_path) = temp_project("analyze", |p| {
        p.aggregation.candidates.clear();
    });
    let request = RunRequest {
        project_path: &project_path,
        options: RunOptions {
            build_model: false,
            ..memory_options()
        },
    };
    let response = run_pipeline(&request).unwrap();
    assert!(response.model.is_none());
    assert!(response.manifest.product_system.is_none());
    // Every process is a candidate when none are configured.
    assert_eq!(response.summary.counts.len(), 7);
    cleanup(&dir);
}

#[test]
fn missing_results_section_is_reported() {
    let (dir, project_path) = temp_project("noresults", |p| p.results = None);
    let request = RunRequest {
        project_path: &project_path,
        options: memory_options(),
    };
    let err = run_pipeline(&request).unwrap_err();
    assert!(matches!(err, AppError::MissingResults(_)));

    let report = build_project_model(&project_path, memory_options().store, None).unwrap();
    assert_eq!(report.product_system.root.name, "Geopolymer concrete");
    cleanup(&dir);
}

#[test]
fn missing_project_file() {
    let err = load_project(Path::new("does/not/exist.yaml")).unwrap_err();
    assert!(matches!(err, AppError::ProjectFileRead { .. }));
}

#[test]
fn system_process_preference_only_steers_linking() {
    let demo = demo_path();
    let mut project = load_project(&demo).unwrap();
    project.linking.preferred_type = ProcessType::SystemProcess;
    let inventory = load_inventory(&demo, &project).unwrap();

    let mut store = MemoryStore::with_reference_data();
    let report = build_model(&mut store, &project, &inventory, None).unwrap();

    assert_eq!(report.processes_created, 8);
    assert!(
        store
            .processes()
            .iter()
            .all(|p| p.process_type == ProcessType::UnitProcess)
    );
    assert_eq!(
        store.product_systems()[0].options.preferred_type,
        ProcessType::SystemProcess
    );
}

#[test]
fn same_named_store_process_is_not_overwritten() {
    let demo = demo_path();
    let project = load_project(&demo).unwrap();
    let inventory = load_inventory(&demo, &project).unwrap();

    let mut store = MemoryStore::with_reference_data();
    let foreign = Process::new("Sand", ProcessType::SystemProcess, "ecoinvent dataset");
    store.insert_process(&foreign).unwrap();

    let err = build_model(&mut store, &project, &inventory, None).unwrap_err();
    assert!(matches!(
        err,
        AppError::Model(ModelError::ForeignProcess { ref process, .. }) if process == "Sand"
    ));
    assert_eq!(store.process(&foreign.id), Some(&foreign));
    assert_eq!(store.stats().process_updates, 0);
    assert!(store.product_systems().is_empty());
}

//! Building the LCA model in a store from a project's inventory.

use lca_model::{ModelPlan, ModelReport, ModelSession};
use lca_project::{Inventory, Project};
use lca_store::ModelStore;
use tracing::info;

use crate::error::AppResult;
use crate::progress::{Progress, RunProgressEvent, RunStage};

/// Register the inventory's flows and processes and build the product
/// system. Flows are registered before any process exchanges are attached.
pub fn build_model(
    store: &mut dyn ModelStore,
    project: &Project,
    inventory: &Inventory,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<ModelReport> {
    build_model_with(store, project, inventory, &mut Progress::new(progress_cb))
}

pub(crate) fn build_model_with(
    store: &mut dyn ModelStore,
    project: &Project,
    inventory: &Inventory,
    progress: &mut Progress<'_>,
) -> AppResult<ModelReport> {
    let plan = ModelPlan::from_inventory(inventory)?;
    let mut session = ModelSession::new(store);

    progress.emit(
        RunStage::RegisteringFlows,
        format!("{} flows", plan.flows.len()),
    );
    session.register_flows(&plan)?;

    progress.emit(
        RunStage::RegisteringProcesses,
        format!("{} processes", plan.processes.len()),
    );
    session.create_processes(&plan)?;

    progress.emit(RunStage::LinkingExchanges, "attaching exchanges");
    session.link_processes(&plan)?;

    let root = session.plan_root(&plan)?;
    progress.emit(
        RunStage::BuildingProductSystem,
        format!("root {} ({})", root.name, project.linking.default_providers),
    );
    let product_system = session.build_product_system(&root, project.linking)?;

    let report = session.report(product_system);
    info!(
        product_system = %report.product_system.id,
        flows_created = report.flows_created,
        processes_created = report.processes_created,
        "model built"
    );
    Ok(report)
}

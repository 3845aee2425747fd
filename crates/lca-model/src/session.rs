//! Model session: one run's registrars bound to one store connection.

use chrono::Local;
use lca_core::LinkingOptions;
use lca_store::ModelStore;
use tracing::info;

use crate::error::{ModelError, ModelResult};
use crate::flows::{FlowRef, FlowRegistrar};
use crate::plan::ModelPlan;
use crate::processes::{ExchangeSpec, ProcessRef, ProcessRegistrar};
use crate::product_system::{ProductSystem, build_product_system};

/// Summary of a completed model build.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub flows_created: usize,
    pub flows_reused: usize,
    pub processes_created: usize,
    pub processes_reused: usize,
    pub product_system: ProductSystem,
}

/// Explicit handle for one run against a store.
///
/// The store is borrowed for the session's lifetime; all calls go through
/// it strictly in sequence.
pub struct ModelSession<'s, S: ModelStore + ?Sized> {
    store: &'s mut S,
    flows: FlowRegistrar,
    processes: ProcessRegistrar,
}

impl<'s, S: ModelStore + ?Sized> ModelSession<'s, S> {
    /// New session stamped with the current local time.
    pub fn new(store: &'s mut S) -> Self {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::with_stamp(store, stamp)
    }

    pub fn with_stamp(store: &'s mut S, stamp: impl Into<String>) -> Self {
        let stamp = stamp.into();
        Self {
            store,
            flows: FlowRegistrar::new(stamp.clone()),
            processes: ProcessRegistrar::new(stamp),
        }
    }

    pub fn store(&mut self) -> &mut S {
        &mut *self.store
    }

    pub fn flows(&self) -> &FlowRegistrar {
        &self.flows
    }

    pub fn processes(&self) -> &ProcessRegistrar {
        &self.processes
    }

    pub fn ensure_flow(&mut self, name: &str, property: &str) -> ModelResult<FlowRef> {
        self.flows.ensure_flow(&mut *self.store, name, property)
    }

    pub fn ensure_process(
        &mut self,
        name: &str,
        kind: lca_core::ProcessType,
    ) -> ModelResult<ProcessRef> {
        self.processes.ensure_process(&mut *self.store, name, kind)
    }

    pub fn link_flows(
        &mut self,
        process: &ProcessRef,
        inputs: &[ExchangeSpec],
        outputs: &[ExchangeSpec],
    ) -> ModelResult<()> {
        self.processes
            .link_flows(&mut *self.store, &self.flows, process, inputs, outputs)
    }

    pub fn build_product_system(
        &mut self,
        root: &ProcessRef,
        options: LinkingOptions,
    ) -> ModelResult<ProductSystem> {
        build_product_system(&mut *self.store, &self.processes, root, options)
    }

    /// Register every flow of `plan`.
    pub fn register_flows(&mut self, plan: &ModelPlan) -> ModelResult<Vec<FlowRef>> {
        let specs: Vec<(&str, &str)> = plan
            .flows
            .iter()
            .map(|f| (f.name.as_str(), f.property.as_str()))
            .collect();
        self.flows.ensure_flows(&mut *self.store, &specs)
    }

    /// Create every process of `plan`, in plan order.
    pub fn create_processes(&mut self, plan: &ModelPlan) -> ModelResult<Vec<ProcessRef>> {
        plan.processes
            .iter()
            .map(|p| self.ensure_process(&p.name, p.kind))
            .collect()
    }

    /// Attach exchanges to every process of `plan`. Flows and processes must
    /// already be registered.
    pub fn link_processes(&mut self, plan: &ModelPlan) -> ModelResult<()> {
        for p in &plan.processes {
            let process = self
                .processes
                .get(&p.name)
                .map(|r| r.reference.clone())
                .ok_or_else(|| ModelError::UnregisteredProcess {
                    process: p.name.clone(),
                })?;
            let inputs = self.exchange_specs(&p.name, &p.inputs)?;
            let outputs = self.exchange_specs(&p.name, &p.outputs)?;
            self.link_flows(&process, &inputs, &outputs)?;
        }
        Ok(())
    }

    /// Create and link every process of `plan`.
    pub fn register_processes(&mut self, plan: &ModelPlan) -> ModelResult<Vec<ProcessRef>> {
        let created = self.create_processes(plan)?;
        self.link_processes(plan)?;
        Ok(created)
    }

    fn exchange_specs(&self, process: &str, sides: &[(String, f64)]) -> ModelResult<Vec<ExchangeSpec>> {
        sides
            .iter()
            .map(|(flow, amount)| {
                self.flows
                    .get(flow)
                    .map(|f| ExchangeSpec::new(f.clone(), *amount))
                    .ok_or_else(|| ModelError::UnregisteredFlow {
                        process: process.to_string(),
                        flow: flow.clone(),
                    })
            })
            .collect()
    }

    /// The registered reference process of `plan`.
    pub fn plan_root(&self, plan: &ModelPlan) -> ModelResult<ProcessRef> {
        let root = plan.root().ok_or(ModelError::NoProcesses)?;
        self.processes
            .get(&root.name)
            .map(|r| r.reference.clone())
            .ok_or_else(|| ModelError::UnregisteredProcess {
                process: root.name.clone(),
            })
    }

    /// Register flows, then processes, then build the product system rooted
    /// at the plan's reference process.
    pub fn apply_plan(
        &mut self,
        plan: &ModelPlan,
        options: LinkingOptions,
    ) -> ModelResult<ModelReport> {
        self.register_flows(plan)?;
        self.register_processes(plan)?;
        let root = self.plan_root(plan)?;
        let product_system = self.build_product_system(&root, options)?;
        let report = self.report(product_system);
        info!(
            flows_created = report.flows_created,
            flows_reused = report.flows_reused,
            processes_created = report.processes_created,
            "model built"
        );
        Ok(report)
    }

    pub fn report(&self, product_system: ProductSystem) -> ModelReport {
        ModelReport {
            flows_created: self.flows.created(),
            flows_reused: self.flows.reused(),
            processes_created: self.processes.created(),
            processes_reused: self.processes.reused(),
            product_system,
        }
    }
}

//! Process registrar and exchange linking.

use std::collections::HashMap;

use lca_core::ProcessType;
use lca_store::{Exchange, ModelStore, ModelType, Process};
use tracing::{debug, info};

use crate::error::{ModelError, ModelResult};
use crate::flows::{FlowRef, FlowRegistrar};

/// Leading text of the description geolca gives the processes it adds.
const OWNED_MARKER: &str = "Added by geolca on";

/// Whether a stored process description marks it as added by geolca.
fn is_owned(description: &str) -> bool {
    description.starts_with(OWNED_MARKER)
}

/// Handle to a registered process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRef {
    pub id: String,
    pub name: String,
    pub kind: ProcessType,
}

/// One side of a process exchange: a registered flow and its amount in the
/// flow's reference unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSpec {
    pub flow: FlowRef,
    pub amount: f64,
}

impl ExchangeSpec {
    pub fn new(flow: FlowRef, amount: f64) -> Self {
        Self { flow, amount }
    }
}

/// A registered process together with the exchanges last linked to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredProcess {
    pub reference: ProcessRef,
    pub description: String,
    pub inputs: Vec<ExchangeSpec>,
    pub outputs: Vec<ExchangeSpec>,
}

#[derive(Debug, Clone)]
pub struct ProcessRegistrar {
    stamp: String,
    processes: Vec<RegisteredProcess>,
    by_name: HashMap<String, usize>,
    created: usize,
    reused: usize,
}

impl ProcessRegistrar {
    pub fn new(stamp: impl Into<String>) -> Self {
        Self {
            stamp: stamp.into(),
            processes: Vec::new(),
            by_name: HashMap::new(),
            created: 0,
            reused: 0,
        }
    }

    /// Registered processes in registration order.
    pub fn processes(&self) -> &[RegisteredProcess] {
        &self.processes
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredProcess> {
        self.by_name.get(name).map(|&i| &self.processes[i])
    }

    /// Most recently registered process.
    pub fn last(&self) -> Option<&ProcessRef> {
        self.processes.last().map(|p| &p.reference)
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn reused(&self) -> usize {
        self.reused
    }

    /// Return the process named `name`, creating an empty one of type `kind`
    /// if the store does not have it yet.
    ///
    /// A process already in the store keeps its stored type and description.
    /// It is only reused when geolca added it; any other process of the same
    /// name is a [`ModelError::ForeignProcess`], since linking would rewrite
    /// its exchanges.
    pub fn ensure_process<S: ModelStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
        kind: ProcessType,
    ) -> ModelResult<ProcessRef> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName { what: "process" });
        }
        if let Some(known) = self.get(name) {
            return Ok(known.reference.clone());
        }

        let existing = store
            .find(ModelType::Process, name)
            .map_err(|source| ModelError::Lookup {
                entity: name.to_string(),
                source,
            })?;
        let (id, kind, description) = match existing {
            Some(found) => {
                let stored = store
                    .get_process(&found.id)
                    .map_err(|source| ModelError::Lookup {
                        entity: name.to_string(),
                        source,
                    })?;
                if !is_owned(&stored.description) {
                    return Err(ModelError::ForeignProcess {
                        process: name.to_string(),
                        id: found.id,
                    });
                }
                debug!(process = name, id = %found.id, "process already in store");
                self.reused += 1;
                (found.id, stored.process_type, stored.description)
            }
            None => {
                let description = format!("{OWNED_MARKER} {}.", self.stamp);
                let process = Process::new(name, kind, description.clone());
                let stored = store.insert_process(&process).map_err(|source| {
                    ModelError::RegistrationFailure {
                        entity: name.to_string(),
                        source,
                    }
                })?;
                info!(process = name, kind = %kind, id = %stored.id, "process created");
                self.created += 1;
                (stored.id, kind, description)
            }
        };

        let reference = ProcessRef {
            id,
            name: name.to_string(),
            kind,
        };
        self.by_name
            .insert(reference.name.clone(), self.processes.len());
        self.processes.push(RegisteredProcess {
            reference: reference.clone(),
            description,
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        Ok(reference)
    }

    /// Attach `inputs` and `outputs` to `process` and write it back to the
    /// store. The first output becomes the quantitative reference.
    ///
    /// Every flow must have been registered through `flows` beforehand.
    /// Linking again replaces the previous exchanges.
    pub fn link_flows<S: ModelStore + ?Sized>(
        &mut self,
        store: &mut S,
        flows: &FlowRegistrar,
        process: &ProcessRef,
        inputs: &[ExchangeSpec],
        outputs: &[ExchangeSpec],
    ) -> ModelResult<()> {
        let slot = match self.by_name.get(&process.name) {
            Some(&i) if self.processes[i].reference.id == process.id => i,
            _ => {
                return Err(ModelError::UnregisteredProcess {
                    process: process.name.clone(),
                });
            }
        };

        for spec in inputs.iter().chain(outputs) {
            if !flows.is_registered(&spec.flow) {
                return Err(ModelError::UnregisteredFlow {
                    process: process.name.clone(),
                    flow: spec.flow.name.clone(),
                });
            }
            if !spec.amount.is_finite() || spec.amount < 0.0 {
                return Err(ModelError::InvalidAmount {
                    process: process.name.clone(),
                    flow: spec.flow.name.clone(),
                    amount: spec.amount,
                });
            }
        }

        let exchanges: Vec<Exchange> = outputs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec, false, i == 0))
            .chain(inputs.iter().map(|spec| (spec, true, false)))
            .enumerate()
            .map(|(n, (spec, input, qref))| Exchange {
                internal_id: n as u32 + 1,
                input,
                quantitative_reference: qref,
                amount: spec.amount,
                flow: lca_store::Ref {
                    model_type: ModelType::Flow,
                    id: spec.flow.id.clone(),
                    name: spec.flow.name.clone(),
                },
            })
            .collect();

        let entry = &mut self.processes[slot];
        let stored = Process {
            model_type: ModelType::Process,
            id: process.id.clone(),
            name: process.name.clone(),
            description: entry.description.clone(),
            process_type: entry.reference.kind,
            exchanges,
        };
        store
            .update_process(&stored)
            .map_err(|source| ModelError::RegistrationFailure {
                entity: process.name.clone(),
                source,
            })?;

        entry.inputs = inputs.to_vec();
        entry.outputs = outputs.to_vec();
        debug!(
            process = %process.name,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "process linked"
        );
        Ok(())
    }
}

//! Model plan: the flows and processes an inventory maps to, in the order
//! they have to be registered.

use lca_core::ProcessType;
use lca_project::{Inventory, InventoryRow};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPlan {
    pub name: String,
    pub property: String,
}

/// A process with its exchanges as `(flow name, amount)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessPlan {
    pub name: String,
    pub kind: ProcessType,
    pub inputs: Vec<(String, f64)>,
    pub outputs: Vec<(String, f64)>,
}

/// Registration plan derived from an inventory.
///
/// Each input row becomes (part of) a provider process producing one unit of
/// its flow. The reference row becomes the reference process, consuming every
/// input flow in its inventory amount. The reference process is always last.
///
/// Every planned process is a unit process; the linking preference only
/// steers provider choice when the product system is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPlan {
    pub flows: Vec<FlowPlan>,
    pub processes: Vec<ProcessPlan>,
}

impl ModelPlan {
    pub fn from_inventory(inventory: &Inventory) -> ModelResult<Self> {
        let reference = inventory.reference();
        let flows = inventory
            .rows()
            .iter()
            .map(|r| FlowPlan {
                name: r.flow.clone(),
                property: r.property.clone(),
            })
            .collect();

        let mut processes: Vec<ProcessPlan> = Vec::new();
        for row in inventory.inputs() {
            let name = row.process_name();
            if name == reference.process_name() {
                return Err(ModelError::InvalidPlan(format!(
                    "input '{}' shares process '{}' with the reference output",
                    row.flow, name
                )));
            }
            let output = (row.flow.clone(), 1.0);
            match processes.iter_mut().find(|p| p.name == name) {
                Some(existing) => existing.outputs.push(output),
                None => processes.push(ProcessPlan {
                    name: name.to_string(),
                    kind: ProcessType::UnitProcess,
                    inputs: Vec::new(),
                    outputs: vec![output],
                }),
            }
        }

        processes.push(ProcessPlan {
            name: reference.process_name().to_string(),
            kind: ProcessType::UnitProcess,
            inputs: inventory.inputs().map(consumed).collect(),
            outputs: vec![consumed(reference)],
        });

        Ok(Self { flows, processes })
    }

    /// The reference process; the product-system root.
    pub fn root(&self) -> Option<&ProcessPlan> {
        self.processes.last()
    }

    pub fn flow(&self, name: &str) -> Option<&FlowPlan> {
        self.flows.iter().find(|f| f.name == name)
    }
}

fn consumed(row: &InventoryRow) -> (String, f64) {
    (row.flow.clone(), row.amount.unwrap_or(1.0))
}

//! Graph validation logic.

use std::collections::HashSet;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Direction, Exchange, FlowNode, ProcessNode};

/// Validate the graph structure: all references exist, names are unique,
/// amounts are usable and exchange lists are consistent.
pub(crate) fn validate_structure(
    flows: &[FlowNode],
    processes: &[ProcessNode],
    exchanges: &[Exchange],
) -> GraphResult<()> {
    // Unique names
    let mut seen = HashSet::new();
    for flow in flows {
        if !seen.insert(flow.name.as_str()) {
            return Err(GraphError::DuplicateName {
                what: "flow",
                name: flow.name.clone(),
            });
        }
    }
    seen.clear();
    for process in processes {
        if !seen.insert(process.name.as_str()) {
            return Err(GraphError::DuplicateName {
                what: "process",
                name: process.name.clone(),
            });
        }
    }

    // Each exchange references a valid flow and process
    for ex in exchanges {
        if ex.flow.index() as usize >= flows.len() {
            return Err(GraphError::InvalidFlowRef {
                exchange: ex.id,
                flow: ex.flow,
            });
        }
        if ex.process.index() as usize >= processes.len() {
            return Err(GraphError::InvalidProcessRef {
                exchange: ex.id,
                process: ex.process,
            });
        }
    }

    for ex in exchanges {
        if !ex.amount.is_finite() || ex.amount < 0.0 {
            return Err(GraphError::InvalidAmount {
                process: processes[ex.process.index() as usize].name.clone(),
                flow: flows[ex.flow.index() as usize].name.clone(),
                amount: ex.amount,
            });
        }
    }

    // Each process's exchange list points back at the process
    for process in processes {
        let mut inputs = HashSet::new();
        let mut outputs = HashSet::new();
        for &ex_id in &process.exchanges {
            let Some(ex) = exchanges.get(ex_id.index() as usize) else {
                return Err(GraphError::InconsistentExchanges {
                    process: process.id,
                });
            };
            if ex.process != process.id {
                return Err(GraphError::InconsistentExchanges {
                    process: process.id,
                });
            }
            match ex.direction {
                Direction::Input => inputs.insert(ex.flow),
                Direction::Output => outputs.insert(ex.flow),
            };
        }
        if let Some(flow) = inputs.intersection(&outputs).next() {
            return Err(GraphError::SelfLoop {
                process: process.name.clone(),
                flow: flows[flow.index() as usize].name.clone(),
            });
        }
    }

    Ok(())
}

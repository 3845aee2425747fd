//! Incremental graph builder.

use lca_core::{ExchangeId, FlowId, ProcessId, ProcessType};

use crate::error::GraphResult;
use crate::graph::{Direction, Exchange, FlowNode, ModelGraph, ProcessNode};
use crate::validate;

/// Builder for constructing a model graph incrementally.
///
/// Use `add_flow`, `add_process` and `add_exchange` to build up the graph,
/// then call `build()` to validate and freeze it into an immutable
/// `ModelGraph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    flows: Vec<FlowNode>,
    processes: Vec<ProcessNode>,
    exchanges: Vec<Exchange>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flow and return its ID. Adding a name twice returns the
    /// existing ID.
    pub fn add_flow(&mut self, name: impl Into<String>) -> FlowId {
        let name = name.into();
        if let Some(existing) = self.flows.iter().find(|f| f.name == name) {
            return existing.id;
        }
        let id = FlowId::from_index(self.flows.len() as u32);
        self.flows.push(FlowNode { id, name });
        id
    }

    /// Add a process and return its ID.
    pub fn add_process(&mut self, name: impl Into<String>, kind: ProcessType) -> ProcessId {
        let id = ProcessId::from_index(self.processes.len() as u32);
        self.processes.push(ProcessNode {
            id,
            name: name.into(),
            kind,
            exchanges: Vec::new(),
        });
        id
    }

    /// Attach an exchange of `flow` to `process`.
    pub fn add_exchange(
        &mut self,
        process: ProcessId,
        flow: FlowId,
        direction: Direction,
        amount: f64,
    ) -> ExchangeId {
        let id = ExchangeId::from_index(self.exchanges.len() as u32);
        self.exchanges.push(Exchange {
            id,
            process,
            flow,
            direction,
            amount,
        });
        if let Some(p) = self.processes.get_mut(process.index() as usize) {
            p.exchanges.push(id);
        }
        id
    }

    /// Build and validate the graph, returning an immutable `ModelGraph`.
    pub fn build(self) -> GraphResult<ModelGraph> {
        validate::validate_structure(&self.flows, &self.processes, &self.exchanges)?;

        let (provider_offsets, providers) = Self::build_providers(&self.flows, &self.exchanges);

        Ok(ModelGraph {
            flows: self.flows,
            processes: self.processes,
            exchanges: self.exchanges,
            provider_offsets,
            providers,
        })
    }

    /// Build compact provider lists: for each flow, the processes that
    /// output it.
    fn build_providers(flows: &[FlowNode], exchanges: &[Exchange]) -> (Vec<usize>, Vec<ProcessId>) {
        let mut per_flow: Vec<Vec<ProcessId>> = vec![Vec::new(); flows.len()];
        for ex in exchanges {
            if ex.direction == Direction::Output {
                per_flow[ex.flow.index() as usize].push(ex.process);
            }
        }

        let mut offsets = Vec::with_capacity(flows.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for mut list in per_flow {
            // Sort for determinism; a process listing the same output twice
            // is still one provider.
            list.sort();
            list.dedup();
            flat.extend_from_slice(&list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

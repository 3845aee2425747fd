//! Core graph data structures.

use lca_core::{ExchangeId, FlowId, ProcessId, ProcessType};

/// Direction of an exchange relative to its process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Consumed by the process.
    Input,
    /// Produced by the process.
    Output,
}

/// A product flow (material, energy carrier, or the reference product).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub id: FlowId,
    pub name: String,
}

/// A unit or system process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNode {
    pub id: ProcessId,
    pub name: String,
    pub kind: ProcessType,
    /// Exchanges owned by this process, in insertion order.
    pub exchanges: Vec<ExchangeId>,
}

/// An input or output of a process.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub id: ExchangeId,
    pub process: ProcessId,
    pub flow: FlowId,
    pub direction: Direction,
    pub amount: f64,
}

/// The graph: a validated, immutable collection of flows, processes and
/// exchanges.
///
/// Besides the entity tables it stores compact provider adjacency: for each
/// flow, the processes that output it (sorted by process ID, i.e.
/// registration order).
#[derive(Debug, Clone)]
pub struct ModelGraph {
    pub(crate) flows: Vec<FlowNode>,
    pub(crate) processes: Vec<ProcessNode>,
    pub(crate) exchanges: Vec<Exchange>,

    /// Flow i's providers are in providers[provider_offsets[i]..provider_offsets[i+1]].
    pub(crate) provider_offsets: Vec<usize>,

    pub(crate) providers: Vec<ProcessId>,
}

impl ModelGraph {
    pub fn flows(&self) -> &[FlowNode] {
        &self.flows
    }

    pub fn processes(&self) -> &[ProcessNode] {
        &self.processes
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Get a flow by ID (returns None if ID out of bounds).
    pub fn flow(&self, id: FlowId) -> Option<&FlowNode> {
        self.flows.get(id.index() as usize)
    }

    /// Get a process by ID (returns None if ID out of bounds).
    pub fn process(&self, id: ProcessId) -> Option<&ProcessNode> {
        self.processes.get(id.index() as usize)
    }

    pub fn exchange(&self, id: ExchangeId) -> Option<&Exchange> {
        self.exchanges.get(id.index() as usize)
    }

    pub fn flow_by_name(&self, name: &str) -> Option<&FlowNode> {
        self.flows.iter().find(|f| f.name == name)
    }

    pub fn process_by_name(&self, name: &str) -> Option<&ProcessNode> {
        self.processes.iter().find(|p| p.name == name)
    }

    fn process_exchanges(
        &self,
        process: ProcessId,
        direction: Direction,
    ) -> impl Iterator<Item = &Exchange> + '_ {
        self.process(process)
            .map(|p| p.exchanges.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&e| self.exchange(e))
            .filter(move |e| e.direction == direction)
    }

    /// Input exchanges of a process.
    pub fn inputs(&self, process: ProcessId) -> impl Iterator<Item = &Exchange> + '_ {
        self.process_exchanges(process, Direction::Input)
    }

    /// Output exchanges of a process.
    pub fn outputs(&self, process: ProcessId) -> impl Iterator<Item = &Exchange> + '_ {
        self.process_exchanges(process, Direction::Output)
    }

    /// Processes that output `flow`.
    pub fn providers(&self, flow: FlowId) -> &[ProcessId] {
        let idx = flow.index() as usize;
        if idx >= self.flows.len() {
            return &[];
        }
        let start = self.provider_offsets[idx];
        let end = self.provider_offsets[idx + 1];
        &self.providers[start..end]
    }

    pub fn flow_name(&self, id: FlowId) -> &str {
        self.flow(id).map(|f| f.name.as_str()).unwrap_or("?")
    }

    pub fn process_name(&self, id: ProcessId) -> &str {
        self.process(id).map(|p| p.name.as_str()).unwrap_or("?")
    }
}

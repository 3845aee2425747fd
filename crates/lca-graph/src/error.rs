//! Graph-specific error types.

use lca_core::{ExchangeId, FlowId, ProcessId};

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction, validation and resolution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An exchange refers to a flow that doesn't exist.
    InvalidFlowRef { exchange: ExchangeId, flow: FlowId },

    /// An exchange refers to a process that doesn't exist.
    InvalidProcessRef {
        exchange: ExchangeId,
        process: ProcessId,
    },

    /// Two flows or two processes share a name.
    DuplicateName { what: &'static str, name: String },

    /// A process consumes and produces the same flow.
    SelfLoop { process: String, flow: String },

    /// Exchange amount is negative or non-finite.
    InvalidAmount {
        process: String,
        flow: String,
        amount: f64,
    },

    /// A process's exchange list is inconsistent with the exchange table.
    InconsistentExchanges { process: ProcessId },

    /// Root process not present in the graph.
    UnknownRoot { root: ProcessId },

    /// An input flow has no provider and linking is strict.
    UnresolvedProvider { process: String, flow: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidFlowRef { exchange, flow } => {
                write!(f, "Exchange {} refers to non-existent flow {}", exchange, flow)
            }
            GraphError::InvalidProcessRef { exchange, process } => {
                write!(
                    f,
                    "Exchange {} refers to non-existent process {}",
                    exchange, process
                )
            }
            GraphError::DuplicateName { what, name } => {
                write!(f, "Duplicate {} name '{}'", what, name)
            }
            GraphError::SelfLoop { process, flow } => {
                write!(
                    f,
                    "Process '{}' has flow '{}' as both input and output",
                    process, flow
                )
            }
            GraphError::InvalidAmount {
                process,
                flow,
                amount,
            } => {
                write!(
                    f,
                    "Process '{}' has invalid amount {} for flow '{}'",
                    process, amount, flow
                )
            }
            GraphError::InconsistentExchanges { process } => {
                write!(f, "Process {} has an inconsistent exchange list", process)
            }
            GraphError::UnknownRoot { root } => {
                write!(f, "Root process {} not found in graph", root)
            }
            GraphError::UnresolvedProvider { process, flow } => {
                write!(
                    f,
                    "No provider for input '{}' of process '{}'",
                    flow, process
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}

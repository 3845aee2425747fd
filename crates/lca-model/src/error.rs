use lca_graph::GraphError;
use lca_store::StoreError;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Empty {what} name")]
    EmptyName { what: &'static str },

    #[error("Unknown reference property '{property}' for flow '{flow}'")]
    UnknownReferenceProperty { flow: String, property: String },

    #[error("Model store rejected '{entity}': {source}")]
    RegistrationFailure {
        entity: String,
        #[source]
        source: StoreError,
    },

    #[error("Lookup of '{entity}' failed: {source}")]
    Lookup {
        entity: String,
        #[source]
        source: StoreError,
    },

    #[error("Flow '{flow}' linked to process '{process}' was never registered")]
    UnregisteredFlow { process: String, flow: String },

    #[error("Process '{process}' ({id}) already exists in the model store and was not added by geolca")]
    ForeignProcess { process: String, id: String },

    #[error("Process '{process}' was never registered")]
    UnregisteredProcess { process: String },

    #[error("No provider for input '{flow}' of process '{process}'")]
    UnresolvedProvider { process: String, flow: String },

    #[error("Invalid amount {amount} for flow '{flow}' in process '{process}'")]
    InvalidAmount {
        process: String,
        flow: String,
        amount: f64,
    },

    #[error("No processes registered")]
    NoProcesses,

    #[error("Invalid model plan: {0}")]
    InvalidPlan(String),

    #[error("Model graph error: {0}")]
    Graph(GraphError),
}

impl From<GraphError> for ModelError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnresolvedProvider { process, flow } => {
                ModelError::UnresolvedProvider { process, flow }
            }
            other => ModelError::Graph(other),
        }
    }
}

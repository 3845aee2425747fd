//! lca-store: client side of the external LCA model store.
//!
//! The store owns flows, processes and product systems; geolca only creates
//! and looks them up. Two implementations of [`ModelStore`] are provided:
//! [`IpcClient`] talks JSON-RPC to a running openLCA-style IPC server, and
//! [`MemoryStore`] keeps everything in process for tests and dry runs.

pub mod ipc;
pub mod memory;
pub mod model;

pub use ipc::IpcClient;
pub use memory::{MemoryStore, StoreStats, StoredProductSystem};
pub use model::{Exchange, Flow, FlowPropertyFactor, FlowType, ModelType, Process, Ref};

use lca_core::LinkingOptions;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Cannot reach model store at {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    #[error("Model store error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected model store response: {0}")]
    Protocol(String),

    #[error("{model_type} {id} not found in model store")]
    UnknownReference { model_type: ModelType, id: String },

    #[error("Model store rejected {what}: {message}")]
    Rejected { what: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operations consumed from the external model store.
///
/// Calls are blocking round-trips; later steps depend on identifiers
/// returned by earlier ones, so callers issue them strictly in sequence.
pub trait ModelStore {
    /// All descriptors of one model type.
    fn get_descriptors(&mut self, model_type: ModelType) -> StoreResult<Vec<Ref>>;

    /// Full process dataset, including its exchanges.
    fn get_process(&mut self, id: &str) -> StoreResult<Process>;

    fn insert_flow(&mut self, flow: &Flow) -> StoreResult<Ref>;

    fn insert_process(&mut self, process: &Process) -> StoreResult<Ref>;

    /// Replace a stored process (used to attach exchanges).
    fn update_process(&mut self, process: &Process) -> StoreResult<Ref>;

    fn create_product_system(
        &mut self,
        root_process_id: &str,
        options: &LinkingOptions,
    ) -> StoreResult<Ref>;

    /// First descriptor of `model_type` whose name matches exactly.
    fn find(&mut self, model_type: ModelType, name: &str) -> StoreResult<Option<Ref>> {
        Ok(self
            .get_descriptors(model_type)?
            .into_iter()
            .find(|d| d.name == name))
    }

    fn find_flow_property(&mut self, name: &str) -> StoreResult<Option<Ref>> {
        self.find(ModelType::FlowProperty, name)
    }
}

impl<S: ModelStore + ?Sized> ModelStore for Box<S> {
    fn get_descriptors(&mut self, model_type: ModelType) -> StoreResult<Vec<Ref>> {
        (**self).get_descriptors(model_type)
    }

    fn get_process(&mut self, id: &str) -> StoreResult<Process> {
        (**self).get_process(id)
    }

    fn insert_flow(&mut self, flow: &Flow) -> StoreResult<Ref> {
        (**self).insert_flow(flow)
    }

    fn insert_process(&mut self, process: &Process) -> StoreResult<Ref> {
        (**self).insert_process(process)
    }

    fn update_process(&mut self, process: &Process) -> StoreResult<Ref> {
        (**self).update_process(process)
    }

    fn create_product_system(
        &mut self,
        root_process_id: &str,
        options: &LinkingOptions,
    ) -> StoreResult<Ref> {
        (**self).create_product_system(root_process_id, options)
    }

    fn find(&mut self, model_type: ModelType, name: &str) -> StoreResult<Option<Ref>> {
        (**self).find(model_type, name)
    }
}

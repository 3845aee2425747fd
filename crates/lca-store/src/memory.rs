//! In-process model store.
//!
//! Behaves like the external store where it matters to callers: it hands
//! back references on insert, validates exchange and property references,
//! and does not de-duplicate by name. It also counts calls so tests can
//! assert how many objects a run created.

use lca_core::LinkingOptions;
use tracing::debug;

use crate::model::{Flow, ModelType, Process, Ref};
use crate::{ModelStore, StoreError, StoreResult};

/// Flow properties seeded by [`MemoryStore::with_reference_data`].
pub const REFERENCE_PROPERTIES: [&str; 6] =
    ["Mass", "Volume", "Energy", "Area", "Length", "Number of items"];

/// Call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub flow_inserts: usize,
    pub process_inserts: usize,
    pub process_updates: usize,
    pub descriptor_queries: usize,
    pub product_systems: usize,
}

impl StoreStats {
    pub fn inserts(&self) -> usize {
        self.flow_inserts + self.process_inserts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredProductSystem {
    pub reference: Ref,
    pub root_process_id: String,
    pub options: LinkingOptions,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    flow_properties: Vec<Ref>,
    flows: Vec<Flow>,
    processes: Vec<Process>,
    product_systems: Vec<StoredProductSystem>,
    stats: StoreStats,
    reject_inserts: Option<String>,
}

impl MemoryStore {
    /// Empty store without any reference data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the common flow properties.
    pub fn with_reference_data() -> Self {
        let mut store = Self::new();
        for name in REFERENCE_PROPERTIES {
            store.add_flow_property(name);
        }
        store
    }

    pub fn add_flow_property(&mut self, name: &str) -> Ref {
        let r = Ref {
            model_type: ModelType::FlowProperty,
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.flow_properties.push(r.clone());
        r
    }

    /// Make every subsequent insert fail with `message`.
    pub fn reject_inserts(&mut self, message: impl Into<String>) {
        self.reject_inserts = Some(message.into());
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn product_systems(&self) -> &[StoredProductSystem] {
        &self.product_systems
    }

    pub fn process(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Number of stored flows with exactly this name.
    pub fn count_flows_named(&self, name: &str) -> usize {
        self.flows.iter().filter(|f| f.name == name).count()
    }

    fn check_insert(&self, what: &str, id: &str) -> StoreResult<()> {
        if let Some(message) = &self.reject_inserts {
            return Err(StoreError::Rejected {
                what: what.to_string(),
                message: message.clone(),
            });
        }
        let taken = self.flows.iter().any(|f| f.id == id)
            || self.processes.iter().any(|p| p.id == id);
        if taken {
            return Err(StoreError::Rejected {
                what: what.to_string(),
                message: format!("id {id} already exists"),
            });
        }
        Ok(())
    }

    fn check_exchanges(&self, process: &Process) -> StoreResult<()> {
        for ex in &process.exchanges {
            if !self.flows.iter().any(|f| f.id == ex.flow.id) {
                return Err(StoreError::UnknownReference {
                    model_type: ModelType::Flow,
                    id: ex.flow.id.clone(),
                });
            }
        }
        Ok(())
    }
}

impl ModelStore for MemoryStore {
    fn get_descriptors(&mut self, model_type: ModelType) -> StoreResult<Vec<Ref>> {
        self.stats.descriptor_queries += 1;
        let refs = match model_type {
            ModelType::FlowProperty => self.flow_properties.clone(),
            ModelType::Flow => self.flows.iter().map(Flow::reference).collect(),
            ModelType::Process => self.processes.iter().map(Process::reference).collect(),
            ModelType::ProductSystem => self
                .product_systems
                .iter()
                .map(|ps| ps.reference.clone())
                .collect(),
        };
        Ok(refs)
    }

    fn get_process(&mut self, id: &str) -> StoreResult<Process> {
        self.process(id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownReference {
                model_type: ModelType::Process,
                id: id.to_string(),
            })
    }

    fn insert_flow(&mut self, flow: &Flow) -> StoreResult<Ref> {
        self.check_insert(&flow.name, &flow.id)?;
        if flow.reference_property().is_none() {
            return Err(StoreError::Rejected {
                what: flow.name.clone(),
                message: "flow has no reference flow property".to_string(),
            });
        }
        for factor in &flow.flow_properties {
            if !self
                .flow_properties
                .iter()
                .any(|p| p.id == factor.flow_property.id)
            {
                return Err(StoreError::UnknownReference {
                    model_type: ModelType::FlowProperty,
                    id: factor.flow_property.id.clone(),
                });
            }
        }
        self.stats.flow_inserts += 1;
        self.flows.push(flow.clone());
        debug!(flow = %flow.name, id = %flow.id, "memory store: flow inserted");
        Ok(flow.reference())
    }

    fn insert_process(&mut self, process: &Process) -> StoreResult<Ref> {
        self.check_insert(&process.name, &process.id)?;
        self.check_exchanges(process)?;
        self.stats.process_inserts += 1;
        self.processes.push(process.clone());
        debug!(process = %process.name, id = %process.id, "memory store: process inserted");
        Ok(process.reference())
    }

    fn update_process(&mut self, process: &Process) -> StoreResult<Ref> {
        self.check_exchanges(process)?;
        let slot = self
            .processes
            .iter_mut()
            .find(|p| p.id == process.id)
            .ok_or_else(|| StoreError::UnknownReference {
                model_type: ModelType::Process,
                id: process.id.clone(),
            })?;
        *slot = process.clone();
        self.stats.process_updates += 1;
        Ok(process.reference())
    }

    fn create_product_system(
        &mut self,
        root_process_id: &str,
        options: &LinkingOptions,
    ) -> StoreResult<Ref> {
        let root = self
            .process(root_process_id)
            .ok_or_else(|| StoreError::UnknownReference {
                model_type: ModelType::Process,
                id: root_process_id.to_string(),
            })?;
        let reference = Ref {
            model_type: ModelType::ProductSystem,
            id: uuid::Uuid::new_v4().to_string(),
            name: root.name.clone(),
        };
        self.product_systems.push(StoredProductSystem {
            reference: reference.clone(),
            root_process_id: root_process_id.to_string(),
            options: *options,
        });
        self.stats.product_systems += 1;
        Ok(reference)
    }
}

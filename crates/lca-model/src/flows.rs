//! Flow registrar: one store flow per distinct name.

use std::collections::HashMap;

use lca_store::{Flow, ModelStore, ModelType, Ref};
use tracing::{debug, info};

use crate::error::{ModelError, ModelResult};

/// Handle to a registered flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRef {
    pub id: String,
    pub name: String,
    /// Reference flow property name.
    pub property: String,
}

/// Registers flows in a [`ModelStore`], looking each name up before
/// creating it.
///
/// Within one registrar a name is resolved at most once; later calls are
/// answered locally without touching the store.
#[derive(Debug, Clone)]
pub struct FlowRegistrar {
    stamp: String,
    flows: Vec<FlowRef>,
    by_name: HashMap<String, usize>,
    properties: HashMap<String, Ref>,
    created: usize,
    reused: usize,
}

impl FlowRegistrar {
    /// `stamp` is written into the description of every created flow.
    pub fn new(stamp: impl Into<String>) -> Self {
        Self {
            stamp: stamp.into(),
            flows: Vec::new(),
            by_name: HashMap::new(),
            properties: HashMap::new(),
            created: 0,
            reused: 0,
        }
    }

    /// Registered flows in registration order.
    pub fn flows(&self) -> &[FlowRef] {
        &self.flows
    }

    pub fn get(&self, name: &str) -> Option<&FlowRef> {
        self.by_name.get(name).map(|&i| &self.flows[i])
    }

    /// Whether `flow` was handed out by this registrar.
    pub fn is_registered(&self, flow: &FlowRef) -> bool {
        self.get(&flow.name).is_some_and(|f| f.id == flow.id)
    }

    /// Flows this registrar created in the store.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Flows found already present in the store.
    pub fn reused(&self) -> usize {
        self.reused
    }

    /// Look up the flow property `property` for `flow`, caching the result.
    pub fn resolve_property<S: ModelStore + ?Sized>(
        &mut self,
        store: &mut S,
        flow: &str,
        property: &str,
    ) -> ModelResult<Ref> {
        if let Some(found) = self.properties.get(property) {
            return Ok(found.clone());
        }
        let found = store
            .find_flow_property(property)
            .map_err(|source| ModelError::Lookup {
                entity: property.to_string(),
                source,
            })?
            .ok_or_else(|| ModelError::UnknownReferenceProperty {
                flow: flow.to_string(),
                property: property.to_string(),
            })?;
        self.properties.insert(property.to_string(), found.clone());
        Ok(found)
    }

    /// Return the flow named `name`, creating it with reference property
    /// `property` if the store does not have it yet.
    pub fn ensure_flow<S: ModelStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
        property: &str,
    ) -> ModelResult<FlowRef> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName { what: "flow" });
        }
        if let Some(known) = self.get(name) {
            return Ok(known.clone());
        }

        let property_ref = self.resolve_property(store, name, property)?;

        let existing = store
            .find(ModelType::Flow, name)
            .map_err(|source| ModelError::Lookup {
                entity: name.to_string(),
                source,
            })?;
        let id = match existing {
            Some(found) => {
                debug!(flow = name, id = %found.id, "flow already in store");
                self.reused += 1;
                found.id
            }
            None => {
                let description = format!("Flow for {name}, added by geolca on {}.", self.stamp);
                let flow = Flow::product(name, property_ref, description);
                let stored =
                    store
                        .insert_flow(&flow)
                        .map_err(|source| ModelError::RegistrationFailure {
                            entity: name.to_string(),
                            source,
                        })?;
                info!(flow = name, property, id = %stored.id, "flow created");
                self.created += 1;
                stored.id
            }
        };

        let flow = FlowRef {
            id,
            name: name.to_string(),
            property: property.to_string(),
        };
        self.by_name.insert(flow.name.clone(), self.flows.len());
        self.flows.push(flow.clone());
        Ok(flow)
    }

    /// Register `(name, property)` pairs in order.
    ///
    /// Every property is resolved before the first flow is created, so an
    /// unknown property leaves the store untouched.
    pub fn ensure_flows<S: ModelStore + ?Sized>(
        &mut self,
        store: &mut S,
        specs: &[(&str, &str)],
    ) -> ModelResult<Vec<FlowRef>> {
        for &(name, property) in specs {
            if self.get(name).is_none() {
                self.resolve_property(store, name, property)?;
            }
        }
        specs
            .iter()
            .map(|&(name, property)| self.ensure_flow(store, name, property))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lca_store::MemoryStore;

    #[test]
    fn second_call_is_answered_locally() {
        let mut store = MemoryStore::with_reference_data();
        let mut reg = FlowRegistrar::new("test");

        let a = reg.ensure_flow(&mut store, "Sand", "Mass").unwrap();
        let queries = store.stats().descriptor_queries;
        let b = reg.ensure_flow(&mut store, "Sand", "Mass").unwrap();

        assert_eq!(a, b);
        assert_eq!(store.stats().descriptor_queries, queries);
        assert_eq!(store.stats().flow_inserts, 1);
        assert!(reg.is_registered(&a));
    }

    #[test]
    fn existing_store_flow_is_reused() {
        let mut store = MemoryStore::with_reference_data();
        let first = FlowRegistrar::new("one")
            .ensure_flow(&mut store, "Fly ash", "Mass")
            .unwrap();

        let mut reg = FlowRegistrar::new("two");
        let again = reg.ensure_flow(&mut store, "Fly ash", "Mass").unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(reg.created(), 0);
        assert_eq!(reg.reused(), 1);
        assert_eq!(store.count_flows_named("Fly ash"), 1);
    }

    #[test]
    fn description_carries_stamp() {
        let mut store = MemoryStore::with_reference_data();
        FlowRegistrar::new("2026-01-01 10:00:00")
            .ensure_flow(&mut store, "Water", "Mass")
            .unwrap();
        assert!(store.flows()[0].description.contains("2026-01-01 10:00:00"));
    }

    #[test]
    fn empty_name_rejected() {
        let mut store = MemoryStore::with_reference_data();
        let err = FlowRegistrar::new("t")
            .ensure_flow(&mut store, "  ", "Mass")
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyName { what: "flow" }));
    }

    #[test]
    fn flow_from_other_registrar_is_not_registered() {
        let mut store = MemoryStore::with_reference_data();
        let foreign = FlowRegistrar::new("a")
            .ensure_flow(&mut store, "Gravel", "Mass")
            .unwrap();
        let reg = FlowRegistrar::new("b");
        assert!(!reg.is_registered(&foreign));
    }
}

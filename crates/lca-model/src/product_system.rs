//! Product system builder.

use lca_core::{LinkingOptions, ProcessId, ProviderLinking};
use lca_graph::{Direction, GraphBuilder, ModelGraph, resolve_providers};
use lca_store::ModelStore;
use tracing::{debug, info, warn};

use crate::error::{ModelError, ModelResult};
use crate::processes::{ProcessRef, ProcessRegistrar};

/// `provider` supplies `flow` to `recipient`, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub provider: String,
    pub flow: String,
    pub recipient: String,
}

/// An input left without a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub process: String,
    pub flow: String,
}

/// A product system created in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSystem {
    pub id: String,
    pub name: String,
    pub root: ProcessRef,
    /// Included processes, root first, each exactly once.
    pub processes: Vec<ProcessRef>,
    pub links: Vec<ResolvedLink>,
    pub dangling: Vec<DanglingRef>,
    /// Registered processes the root does not reach.
    pub excluded: Vec<ProcessRef>,
    pub options: LinkingOptions,
}

/// Graph view of everything registered so far.
fn model_graph(processes: &ProcessRegistrar) -> ModelResult<ModelGraph> {
    let mut builder = GraphBuilder::new();
    for entry in processes.processes() {
        let pid = builder.add_process(entry.reference.name.clone(), entry.reference.kind);
        for (specs, direction) in [
            (&entry.inputs, Direction::Input),
            (&entry.outputs, Direction::Output),
        ] {
            for spec in specs {
                let fid = builder.add_flow(spec.flow.name.clone());
                builder.add_exchange(pid, fid, direction, spec.amount);
            }
        }
    }
    Ok(builder.build()?)
}

/// Resolve providers upstream of `root` and create the product system.
///
/// Under [`ProviderLinking::Always`] an input without a provider fails with
/// [`ModelError::UnresolvedProvider`] before anything is created.
pub fn build_product_system<S: ModelStore + ?Sized>(
    store: &mut S,
    processes: &ProcessRegistrar,
    root: &ProcessRef,
    options: LinkingOptions,
) -> ModelResult<ProductSystem> {
    let root_index = processes
        .processes()
        .iter()
        .position(|p| p.reference.id == root.id)
        .ok_or_else(|| ModelError::UnregisteredProcess {
            process: root.name.clone(),
        })?;

    let graph = model_graph(processes)?;
    let resolution = resolve_providers(&graph, ProcessId::from_index(root_index as u32), options)?;

    let process_ref = |id: ProcessId| processes.processes()[id.index() as usize].reference.clone();
    let links: Vec<ResolvedLink> = resolution
        .links
        .iter()
        .map(|l| ResolvedLink {
            provider: graph.process_name(l.provider).to_string(),
            flow: graph.flow_name(l.flow).to_string(),
            recipient: graph.process_name(l.recipient).to_string(),
        })
        .collect();
    let dangling: Vec<DanglingRef> = resolution
        .dangling
        .iter()
        .map(|d| DanglingRef {
            process: graph.process_name(d.process).to_string(),
            flow: graph.flow_name(d.flow).to_string(),
        })
        .collect();

    match options.default_providers {
        ProviderLinking::Ignore => {
            info!(inputs = dangling.len(), "provider linking disabled")
        }
        _ => {
            for d in &dangling {
                warn!(process = %d.process, flow = %d.flow, "input left without provider");
            }
        }
    }

    let excluded: Vec<ProcessRef> = (0..processes.processes().len())
        .map(|i| ProcessId::from_index(i as u32))
        .filter(|&id| !resolution.contains(id))
        .map(process_ref)
        .collect();
    for p in &excluded {
        debug!(process = %p.name, "process not reached from root");
    }

    let stored = store
        .create_product_system(&root.id, &options)
        .map_err(|source| ModelError::RegistrationFailure {
            entity: format!("product system for {}", root.name),
            source,
        })?;
    info!(
        root = %root.name,
        processes = resolution.processes.len(),
        links = links.len(),
        linking = %options.default_providers,
        "product system created"
    );

    Ok(ProductSystem {
        id: stored.id,
        name: stored.name,
        root: root.clone(),
        processes: resolution.processes.iter().map(|&p| process_ref(p)).collect(),
        links,
        dangling,
        excluded,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::FlowRegistrar;
    use crate::processes::ExchangeSpec;
    use lca_core::ProcessType;
    use lca_store::MemoryStore;

    /// Root consumes a and b; only a has a provider.
    fn half_linked() -> (MemoryStore, ProcessRegistrar, ProcessRef) {
        let mut store = MemoryStore::with_reference_data();
        let mut flows = FlowRegistrar::new("t");
        let mut procs = ProcessRegistrar::new("t");
        let a = flows.ensure_flow(&mut store, "a", "Mass").unwrap();
        let b = flows.ensure_flow(&mut store, "b", "Mass").unwrap();
        let out = flows.ensure_flow(&mut store, "out", "Volume").unwrap();

        let pa = procs
            .ensure_process(&mut store, "make a", ProcessType::UnitProcess)
            .unwrap();
        procs
            .link_flows(&mut store, &flows, &pa, &[], &[ExchangeSpec::new(a.clone(), 1.0)])
            .unwrap();
        let root = procs
            .ensure_process(&mut store, "mix", ProcessType::UnitProcess)
            .unwrap();
        procs
            .link_flows(
                &mut store,
                &flows,
                &root,
                &[ExchangeSpec::new(a, 2.0), ExchangeSpec::new(b, 3.0)],
                &[ExchangeSpec::new(out, 1.0)],
            )
            .unwrap();
        (store, procs, root)
    }

    fn options(linking: ProviderLinking) -> LinkingOptions {
        LinkingOptions {
            default_providers: linking,
            ..LinkingOptions::default()
        }
    }

    #[test]
    fn prefer_leaves_missing_provider_dangling() {
        let (mut store, procs, root) = half_linked();
        let ps = build_product_system(&mut store, &procs, &root, options(ProviderLinking::Prefer))
            .unwrap();
        assert_eq!(ps.processes.len(), 2);
        assert_eq!(ps.processes[0], root);
        assert!(ps.excluded.is_empty());
        assert_eq!(ps.links.len(), 1);
        assert_eq!(ps.links[0].provider, "make a");
        assert_eq!(
            ps.dangling,
            vec![DanglingRef {
                process: "mix".into(),
                flow: "b".into()
            }]
        );
        assert_eq!(store.product_systems().len(), 1);
        assert_eq!(store.product_systems()[0].root_process_id, root.id);
    }

    #[test]
    fn always_fails_without_creating() {
        let (mut store, procs, root) = half_linked();
        let err = build_product_system(&mut store, &procs, &root, options(ProviderLinking::Always))
            .unwrap_err();
        match err {
            ModelError::UnresolvedProvider { process, flow } => {
                assert_eq!(process, "mix");
                assert_eq!(flow, "b");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.product_systems().is_empty());
    }

    #[test]
    fn ignore_links_nothing() {
        let (mut store, procs, root) = half_linked();
        let ps = build_product_system(&mut store, &procs, &root, options(ProviderLinking::Ignore))
            .unwrap();
        assert_eq!(ps.processes, vec![root]);
        assert!(ps.links.is_empty());
        assert_eq!(ps.dangling.len(), 2);
        let excluded: Vec<&str> = ps.excluded.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(excluded, ["make a"]);
    }
}

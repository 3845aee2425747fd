//! Provider resolution: which processes a product system rooted at a given
//! process pulls in.

use std::collections::{HashSet, VecDeque};

use lca_core::{FlowId, LinkingOptions, ProcessId, ProcessType, ProviderLinking};

use crate::error::{GraphError, GraphResult};
use crate::graph::ModelGraph;

/// `provider` supplies `flow` to `recipient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderLink {
    pub provider: ProcessId,
    pub flow: FlowId,
    pub recipient: ProcessId,
}

/// An input left without a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DanglingInput {
    pub process: ProcessId,
    pub flow: FlowId,
}

/// Result of resolving providers from a root process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub root: ProcessId,
    /// Included processes in discovery order, root first, each exactly once.
    pub processes: Vec<ProcessId>,
    pub links: Vec<ProviderLink>,
    pub dangling: Vec<DanglingInput>,
}

impl Resolution {
    pub fn contains(&self, process: ProcessId) -> bool {
        self.processes.contains(&process)
    }
}

/// Pick the provider for `flow` consumed by `recipient`: processes of the
/// preferred type first, then registration order.
fn pick_provider(
    graph: &ModelGraph,
    flow: FlowId,
    recipient: ProcessId,
    preferred: ProcessType,
) -> Option<ProcessId> {
    let candidates = || {
        graph
            .providers(flow)
            .iter()
            .copied()
            .filter(move |&p| p != recipient)
    };
    candidates()
        .find(|&p| graph.process(p).is_some_and(|node| node.kind == preferred))
        .or_else(|| candidates().next())
}

/// Walk upstream from `root`, linking each input to a provider according to
/// `options`.
///
/// Every reachable process is included once regardless of how many paths
/// lead to it. Under [`ProviderLinking::Always`] an input without a provider
/// is an error; under `Prefer` it is reported as dangling; under `Ignore`
/// nothing is linked and all root inputs are dangling.
pub fn resolve_providers(
    graph: &ModelGraph,
    root: ProcessId,
    options: LinkingOptions,
) -> GraphResult<Resolution> {
    if graph.process(root).is_none() {
        return Err(GraphError::UnknownRoot { root });
    }

    let mut included = vec![false; graph.processes().len()];
    included[root.index() as usize] = true;

    let mut processes = vec![root];
    let mut links = Vec::new();
    let mut dangling = Vec::new();
    let mut seen_inputs: HashSet<(ProcessId, FlowId)> = HashSet::new();
    let mut queue = VecDeque::from([root]);

    while let Some(recipient) = queue.pop_front() {
        for input in graph.inputs(recipient) {
            if !seen_inputs.insert((recipient, input.flow)) {
                continue;
            }

            if options.default_providers == ProviderLinking::Ignore {
                dangling.push(DanglingInput {
                    process: recipient,
                    flow: input.flow,
                });
                continue;
            }

            match pick_provider(graph, input.flow, recipient, options.preferred_type) {
                Some(provider) => {
                    links.push(ProviderLink {
                        provider,
                        flow: input.flow,
                        recipient,
                    });
                    let slot = &mut included[provider.index() as usize];
                    if !*slot {
                        *slot = true;
                        processes.push(provider);
                        queue.push_back(provider);
                    }
                }
                None if options.default_providers == ProviderLinking::Always => {
                    return Err(GraphError::UnresolvedProvider {
                        process: graph.process_name(recipient).to_string(),
                        flow: graph.flow_name(input.flow).to_string(),
                    });
                }
                None => dangling.push(DanglingInput {
                    process: recipient,
                    flow: input.flow,
                }),
            }
        }
    }

    Ok(Resolution {
        root,
        processes,
        links,
        dangling,
    })
}

//! Integration tests for lca-graph.

use lca_core::{LinkingOptions, ProcessType, ProviderLinking};
use lca_graph::{Direction, GraphBuilder, GraphError, resolve_providers};

fn prefer() -> LinkingOptions {
    LinkingOptions::default()
}

#[test]
fn diamond_includes_shared_provider_once() {
    // Water feeds both the activator and the mix; the mix also takes the
    // activator. Water must appear once in the product system.
    let mut b = GraphBuilder::new();
    let water = b.add_flow("Water");
    let activator = b.add_flow("Activator");
    let concrete = b.add_flow("Geopolymer concrete");

    let tap = b.add_process("Tap water", ProcessType::UnitProcess);
    let act = b.add_process("Activator", ProcessType::UnitProcess);
    let mix = b.add_process("Geopolymer concrete", ProcessType::UnitProcess);

    b.add_exchange(tap, water, Direction::Output, 1.0);
    b.add_exchange(act, water, Direction::Input, 0.5);
    b.add_exchange(act, activator, Direction::Output, 1.0);
    b.add_exchange(mix, water, Direction::Input, 20.0);
    b.add_exchange(mix, activator, Direction::Input, 140.0);
    b.add_exchange(mix, concrete, Direction::Output, 1.0);
    let graph = b.build().unwrap();

    let r = resolve_providers(&graph, mix, prefer()).unwrap();

    assert_eq!(r.root, mix);
    assert_eq!(r.processes.len(), 3);
    assert_eq!(r.processes.iter().filter(|&&p| p == tap).count(), 1);
    assert_eq!(r.links.len(), 3);
    assert!(r.dangling.is_empty());
}

#[test]
fn prefer_leaves_unresolved_inputs_dangling() {
    let mut b = GraphBuilder::new();
    let sand = b.add_flow("Sand");
    let slag = b.add_flow("GGBFS");
    let pit = b.add_process("Sand", ProcessType::UnitProcess);
    let mix = b.add_process("Mix", ProcessType::UnitProcess);
    b.add_exchange(pit, sand, Direction::Output, 1.0);
    b.add_exchange(mix, sand, Direction::Input, 650.0);
    b.add_exchange(mix, slag, Direction::Input, 100.0);
    let graph = b.build().unwrap();

    let r = resolve_providers(&graph, mix, prefer()).unwrap();
    assert_eq!(r.processes, vec![mix, pit]);
    assert_eq!(r.dangling.len(), 1);
    assert_eq!(graph.flow_name(r.dangling[0].flow), "GGBFS");
}

#[test]
fn always_fails_on_unresolved_input() {
    let mut b = GraphBuilder::new();
    let slag = b.add_flow("GGBFS");
    let mix = b.add_process("Mix", ProcessType::UnitProcess);
    b.add_exchange(mix, slag, Direction::Input, 100.0);
    let graph = b.build().unwrap();

    let strict = LinkingOptions {
        default_providers: ProviderLinking::Always,
        preferred_type: ProcessType::UnitProcess,
    };
    let err = resolve_providers(&graph, mix, strict).unwrap_err();
    assert_eq!(
        err,
        GraphError::UnresolvedProvider {
            process: "Mix".into(),
            flow: "GGBFS".into(),
        }
    );
}

#[test]
fn cycles_terminate() {
    let mut b = GraphBuilder::new();
    let steam = b.add_flow("Steam");
    let power = b.add_flow("Power");
    let boiler = b.add_process("Boiler", ProcessType::UnitProcess);
    let turbine = b.add_process("Turbine", ProcessType::UnitProcess);
    b.add_exchange(boiler, power, Direction::Input, 1.0);
    b.add_exchange(boiler, steam, Direction::Output, 1.0);
    b.add_exchange(turbine, steam, Direction::Input, 1.0);
    b.add_exchange(turbine, power, Direction::Output, 1.0);
    let graph = b.build().unwrap();

    let r = resolve_providers(&graph, turbine, prefer()).unwrap();
    assert_eq!(r.processes, vec![turbine, boiler]);
    assert_eq!(r.links.len(), 2);
}

#[test]
fn unreachable_processes_are_excluded() {
    let mut b = GraphBuilder::new();
    let sand = b.add_flow("Sand");
    let lime = b.add_flow("Lime");
    let pit = b.add_process("Sand", ProcessType::UnitProcess);
    let kiln = b.add_process("Lime", ProcessType::UnitProcess);
    let mix = b.add_process("Mix", ProcessType::UnitProcess);
    b.add_exchange(pit, sand, Direction::Output, 1.0);
    b.add_exchange(kiln, lime, Direction::Output, 1.0);
    b.add_exchange(mix, sand, Direction::Input, 1.0);
    let graph = b.build().unwrap();

    let r = resolve_providers(&graph, mix, prefer()).unwrap();
    assert!(r.contains(pit));
    assert!(!r.contains(kiln));
}

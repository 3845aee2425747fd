use std::path::PathBuf;

use lca_core::Tolerances;
use lca_project::CandidateDef;
use lca_results::{
    CandidateSet, CriticalRule, CriticalSummary, OutputStore, RunManifest, coalesced_diagram,
    critical_diagram, critical_processes, load_contributions, load_damage, load_impacts,
    reconcile,
};

fn demo(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/geopolymer")
        .join(file)
}

fn demo_candidates() -> Vec<CandidateDef> {
    vec![
        CandidateDef {
            label: "Activator".into(),
            members: vec!["Sodium Silicate".into(), "Sodium Hydroxide".into()],
        },
        CandidateDef {
            label: "Fly Ash".into(),
            members: vec!["Fly ash".into()],
        },
        CandidateDef {
            label: "GGBFS".into(),
            members: vec![],
        },
    ]
}

#[test]
fn demo_tables_reconcile() {
    let impacts = load_impacts(&demo("LCIA.csv")).unwrap();
    let contributions = load_contributions(&demo("process_contribution.csv")).unwrap();
    assert_eq!(impacts.midpoints().count(), 4);
    assert_eq!(impacts.endpoints().count(), 3);
    assert_eq!(contributions.processes.len(), 7);
    assert!(reconcile(&impacts, &contributions, Tolerances::relative(1e-9)).is_empty());
}

#[test]
fn demo_critical_processes() {
    let contributions = load_contributions(&demo("process_contribution.csv")).unwrap();
    let set = CandidateSet::from_defs(&demo_candidates(), &contributions);
    let rule = CriticalRule::default();
    let results = critical_processes(&contributions, &set, rule);
    let summary = CriticalSummary::new(&results, &set, rule);

    let per_category: Vec<(&str, Vec<&str>)> = summary
        .categories
        .iter()
        .map(|c| (c.category.as_str(), c.critical.iter().map(String::as_str).collect()))
        .collect();
    assert_eq!(
        per_category,
        vec![
            ("Climate Change", vec!["Activator"]),
            ("Ozone Depletion", vec!["Activator"]),
            ("Particulate Matter Formation", vec!["Fly Ash"]),
            ("Acidification", vec!["Fly Ash"]),
        ]
    );
    assert_eq!(summary.count("GGBFS"), Some(0));
    assert_eq!(summary.most_critical, ["Activator", "Fly Ash"]);

    let diagram = critical_diagram(&results, &set).unwrap();
    assert_eq!(diagram.nonzero_links().count(), 4 + 2);
}

#[test]
fn demo_value_diagram_conserves_totals() {
    let contributions = load_contributions(&demo("process_contribution.csv")).unwrap();
    let damage = load_damage(&demo("damage.csv")).unwrap();
    let d = coalesced_diagram(&contributions, Some(&damage)).unwrap();

    assert_eq!(d.tiers.len(), 3);
    for category in &contributions.categories {
        let node = d.node_index(1, category).unwrap();
        let total = contributions.category_total(category);
        assert!((d.inflow(node) - total).abs() < 1e-9);
    }
    let hh = d.node_index(2, "Human Health").unwrap();
    assert_eq!(d.inflow(hh), 102.0);
}

#[test]
fn outputs_round_trip_through_store() {
    let dir = std::env::temp_dir().join(format!("geolca-results-{}", std::process::id()));
    let store = OutputStore::new(dir.clone()).unwrap();

    let contributions = load_contributions(&demo("process_contribution.csv")).unwrap();
    let set = CandidateSet::from_defs(&demo_candidates(), &contributions);
    let rule = CriticalRule::default();
    let results = critical_processes(&contributions, &set, rule);
    let summary = CriticalSummary::new(&results, &set, rule);
    let critical = critical_diagram(&results, &set).unwrap();
    let coalesced = coalesced_diagram(&contributions, None).unwrap();

    let manifest = RunManifest {
        run_id: "abc123".into(),
        project: "demo".into(),
        timestamp: "2026-01-01T00:00:00Z".into(),
        tool_version: "test".into(),
        rule: rule.describe(),
        categories: contributions.categories.clone(),
        product_system: None,
        mismatches: vec![],
    };
    store
        .save_run(&manifest, &critical, &coalesced, &summary)
        .unwrap();

    assert!(store.has_run("abc123"));
    assert_eq!(store.load_manifest("abc123").unwrap(), manifest);
    assert_eq!(store.load_critical("abc123").unwrap(), critical);
    assert_eq!(store.load_summary("abc123").unwrap(), summary);
    assert_eq!(store.list_runs("demo").unwrap().len(), 1);
    assert!(store.load_coalesced("missing").is_err());

    let _ = std::fs::remove_dir_all(dir);
}

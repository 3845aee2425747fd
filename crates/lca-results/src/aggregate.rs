//! The two diagrams produced per run.

use crate::ResultsResult;
use crate::critical::{CandidateSet, CategoryCritical};
use crate::sankey::{ColorGroup, SankeyBuilder, SankeyDiagram};
use crate::types::{ContributionTable, DamageTable};

pub const CATEGORY_TIER: usize = 0;
pub const CRITICAL_TIER: usize = 1;
pub const CANDIDATE_TIER: usize = 2;

/// Indicator diagram: impact categories, then critical candidates, then the
/// candidate set.
///
/// Every (category, candidate) pair gets a link valued 1 when the candidate
/// is critical for that category and 0 otherwise. Each candidate then links
/// to its own node in the last tier with the number of categories it is
/// critical for, so inflow equals outflow on the middle tier.
pub fn critical_diagram(
    results: &[CategoryCritical],
    candidates: &CandidateSet,
) -> ResultsResult<SankeyDiagram> {
    let mut b = SankeyBuilder::new(&["Impact category", "Critical process", "Candidate set"]);
    let labels = candidates.labels();

    for r in results {
        b.node(CATEGORY_TIER, &r.category)?;
    }
    for label in &labels {
        b.node(CRITICAL_TIER, label)?;
    }
    for label in &labels {
        b.node(CANDIDATE_TIER, label)?;
    }

    for r in results {
        for (i, label) in labels.iter().enumerate() {
            let value = if r.is_critical(i) { 1.0 } else { 0.0 };
            b.link(
                (CATEGORY_TIER, r.category.as_str()),
                (CRITICAL_TIER, *label),
                value,
                ColorGroup::Candidate(i),
            )?;
        }
    }
    for (i, label) in labels.iter().enumerate() {
        let count = results.iter().filter(|r| r.is_critical(i)).count();
        b.link(
            (CRITICAL_TIER, *label),
            (CANDIDATE_TIER, *label),
            count as f64,
            ColorGroup::Candidate(i),
        )?;
    }
    Ok(b.build())
}

pub const MATERIAL_TIER: usize = 0;
pub const MIDPOINT_TIER: usize = 1;
pub const ENDPOINT_TIER: usize = 2;

/// Value diagram: source materials, then midpoint categories, then (with a
/// damage table) endpoint categories.
///
/// Material links carry raw contribution values summed per (material,
/// category), so a midpoint node's inflow equals its category total.
pub fn coalesced_diagram(
    contributions: &ContributionTable,
    damage: Option<&DamageTable>,
) -> ResultsResult<SankeyDiagram> {
    let mut tiers = vec!["Material", "Midpoint"];
    if damage.is_some() {
        tiers.push("Endpoint");
    }
    let mut b = SankeyBuilder::new(tiers.as_slice());

    for p in &contributions.processes {
        b.node(MATERIAL_TIER, p)?;
    }
    for c in &contributions.categories {
        b.node(MIDPOINT_TIER, c)?;
    }
    for p in &contributions.processes {
        for c in &contributions.categories {
            b.link(
                (MATERIAL_TIER, p.as_str()),
                (MIDPOINT_TIER, c.as_str()),
                contributions.value(p, c),
                ColorGroup::Neutral,
            )?;
        }
    }

    if let Some(damage) = damage {
        for e in damage.endpoints() {
            b.node(ENDPOINT_TIER, e)?;
        }
        for f in &damage.factors {
            b.node(MIDPOINT_TIER, &f.midpoint)?;
            b.link(
                (MIDPOINT_TIER, f.midpoint.as_str()),
                (ENDPOINT_TIER, f.endpoint.as_str()),
                f.value,
                ColorGroup::Neutral,
            )?;
        }
    }
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critical::{CriticalRule, critical_processes};
    use crate::types::DamageFactor;
    use proptest::prelude::*;

    fn table(rows: &[(&str, &str, f64)]) -> ContributionTable {
        let mut t = ContributionTable::default();
        for &(p, c, v) in rows {
            t.add(p, c, v);
        }
        t
    }

    #[test]
    fn critical_links_are_indicators() {
        let t = table(&[
            ("A", "c1", 0.5),
            ("B", "c1", 0.5),
            ("C", "c1", 0.0),
            ("A", "c2", 0.1),
            ("B", "c2", 0.2),
            ("C", "c2", 0.7),
        ]);
        let set = CandidateSet::every_process(&t);
        let res = critical_processes(&t, &set, CriticalRule::default());
        let d = critical_diagram(&res, &set).unwrap();

        assert_eq!(d.nodes.len(), 2 + 3 + 3);
        assert_eq!(d.links.len(), 2 * 3 + 3);
        let c1 = d.node_index(CATEGORY_TIER, "c1").unwrap();
        assert_eq!(d.outflow(c1), 2.0);

        for label in ["A", "B", "C"] {
            let mid = d.node_index(CRITICAL_TIER, label).unwrap();
            assert_eq!(d.inflow(mid), d.outflow(mid));
        }
        let a = d.node_index(CANDIDATE_TIER, "A").unwrap();
        assert_eq!(d.inflow(a), 1.0);
        assert!(d.links.iter().all(|l| l.value == 0.0 || l.value >= 1.0));
    }

    #[test]
    fn damage_adds_endpoint_tier() {
        let t = table(&[("Sand", "CC", 3.0), ("Gravel", "CC", 6.0)]);
        let damage = DamageTable {
            factors: vec![
                DamageFactor {
                    midpoint: "CC".into(),
                    endpoint: "Human Health".into(),
                    value: 35.0,
                },
                DamageFactor {
                    midpoint: "CC".into(),
                    endpoint: "Resources".into(),
                    value: 23.0,
                },
            ],
        };
        let d = coalesced_diagram(&t, Some(&damage)).unwrap();
        assert_eq!(d.tiers.len(), 3);
        let cc = d.node_index(MIDPOINT_TIER, "CC").unwrap();
        assert_eq!(d.inflow(cc), 9.0);
        assert_eq!(d.outflow(cc), 58.0);

        let plain = coalesced_diagram(&t, None).unwrap();
        assert_eq!(plain.tiers.len(), 2);
    }

    proptest! {
        #[test]
        fn midpoint_inflow_equals_category_total(
            values in prop::collection::vec(prop::collection::vec(0.0f64..1e6, 3), 1..8)
        ) {
            let cats = ["c1", "c2", "c3"];
            let mut t = ContributionTable::default();
            for (i, row) in values.iter().enumerate() {
                for (c, v) in cats.iter().zip(row) {
                    t.add(&format!("p{i}"), c, *v);
                }
            }
            let d = coalesced_diagram(&t, None).unwrap();
            for c in cats {
                let node = d.node_index(MIDPOINT_TIER, c).unwrap();
                let total = t.category_total(c);
                prop_assert!((d.inflow(node) - total).abs() <= 1e-9 * total.max(1.0));
            }
        }
    }
}

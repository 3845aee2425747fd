//! Critical-process identification.
//!
//! Per impact category each candidate gets its share of the category total;
//! a [`CriticalRule`] then flags the critical candidates. Ties are kept:
//! several candidates may be critical for the same category.

use lca_project::{CandidateDef, CriticalRuleDef};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::ContributionTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CriticalRule {
    /// Critical when the share is within `tolerance` (relative) of the
    /// largest share.
    TiedMax { tolerance: f64 },
    /// Critical when the share is at least `share`.
    MinShare { share: f64 },
}

impl Default for CriticalRule {
    fn default() -> Self {
        CriticalRule::TiedMax { tolerance: 1e-9 }
    }
}

impl From<&CriticalRuleDef> for CriticalRule {
    fn from(def: &CriticalRuleDef) -> Self {
        match *def {
            CriticalRuleDef::TiedMax { tolerance } => CriticalRule::TiedMax { tolerance },
            CriticalRuleDef::MinShare { share } => CriticalRule::MinShare { share },
        }
    }
}

impl CriticalRule {
    /// Indices of the critical entries of `shares`. Nothing is critical when
    /// every share is zero.
    pub fn select(&self, shares: &[f64]) -> Vec<usize> {
        let max = shares.iter().copied().fold(0.0_f64, f64::max);
        if max <= 0.0 {
            return Vec::new();
        }
        let keep = |s: f64| match *self {
            CriticalRule::TiedMax { tolerance } => s > 0.0 && max - s <= tolerance * max,
            CriticalRule::MinShare { share } => s > 0.0 && s >= share,
        };
        shares
            .iter()
            .enumerate()
            .filter(|&(_, &s)| keep(s))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn describe(&self) -> String {
        match self {
            CriticalRule::TiedMax { tolerance } => format!("largest share (tolerance {tolerance})"),
            CriticalRule::MinShare { share } => format!("share >= {share}"),
        }
    }
}

/// A labelled group of processes whose contributions are summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub members: Vec<String>,
}

/// Ordered set of critical-process candidates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Every process of `table` as its own candidate.
    pub fn every_process(table: &ContributionTable) -> Self {
        Self {
            candidates: table
                .processes
                .iter()
                .map(|p| Candidate {
                    label: p.clone(),
                    members: vec![p.clone()],
                })
                .collect(),
        }
    }

    /// Candidates from configuration; falls back to every process when none
    /// are configured.
    pub fn from_defs(defs: &[CandidateDef], table: &ContributionTable) -> Self {
        if defs.is_empty() {
            return Self::every_process(table);
        }
        let candidates: Vec<Candidate> = defs
            .iter()
            .map(|d| Candidate {
                label: d.label.clone(),
                members: if d.members.is_empty() {
                    vec![d.label.clone()]
                } else {
                    d.members.clone()
                },
            })
            .collect();
        for c in &candidates {
            for m in &c.members {
                if !table.processes.contains(m) {
                    warn!(candidate = %c.label, process = %m, "candidate member not in contribution table");
                }
            }
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn labels(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c.label == label)
    }

    /// Summed member contributions per candidate for `category`.
    pub fn values(&self, table: &ContributionTable, category: &str) -> Vec<f64> {
        self.candidates
            .iter()
            .map(|c| c.members.iter().map(|m| table.value(m, category)).sum())
            .collect()
    }
}

/// Critical candidates for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCritical {
    pub category: String,
    pub total: f64,
    /// Per candidate, fraction of the category total over all processes.
    pub shares: Vec<f64>,
    /// Indices into the candidate set.
    pub critical: Vec<usize>,
}

impl CategoryCritical {
    pub fn is_critical(&self, candidate: usize) -> bool {
        self.critical.contains(&candidate)
    }
}

/// Apply `rule` to every category of `table`, in table order.
pub fn critical_processes(
    table: &ContributionTable,
    candidates: &CandidateSet,
    rule: CriticalRule,
) -> Vec<CategoryCritical> {
    table
        .categories
        .iter()
        .map(|category| {
            let total = table.category_total(category);
            let shares: Vec<f64> = if total > 0.0 {
                candidates
                    .values(table, category)
                    .into_iter()
                    .map(|v| v / total)
                    .collect()
            } else {
                vec![0.0; candidates.len()]
            };
            let critical = rule.select(&shares);
            CategoryCritical {
                category: category.clone(),
                total,
                shares,
                critical,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub critical: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCount {
    pub label: String,
    pub count: usize,
}

/// Which candidates are critical where, and which are critical most often.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalSummary {
    pub rule: CriticalRule,
    pub categories: Vec<CategorySummary>,
    pub counts: Vec<CandidateCount>,
    /// Candidates with the highest non-zero count; ties kept.
    pub most_critical: Vec<String>,
}

impl CriticalSummary {
    pub fn new(results: &[CategoryCritical], candidates: &CandidateSet, rule: CriticalRule) -> Self {
        let labels = candidates.labels();
        let categories = results
            .iter()
            .map(|r| CategorySummary {
                category: r.category.clone(),
                critical: r.critical.iter().map(|&i| labels[i].to_string()).collect(),
            })
            .collect();
        let counts: Vec<CandidateCount> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| CandidateCount {
                label: label.to_string(),
                count: results.iter().filter(|r| r.is_critical(i)).count(),
            })
            .collect();
        let top = counts.iter().map(|c| c.count).max().unwrap_or(0);
        let most_critical = if top == 0 {
            Vec::new()
        } else {
            counts
                .iter()
                .filter(|c| c.count == top)
                .map(|c| c.label.clone())
                .collect()
        };
        Self {
            rule,
            categories,
            counts,
            most_critical,
        }
    }

    pub fn count(&self, label: &str) -> Option<usize> {
        self.counts.iter().find(|c| c.label == label).map(|c| c.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str, f64)]) -> ContributionTable {
        let mut t = ContributionTable::default();
        for &(p, c, v) in rows {
            t.add(p, c, v);
        }
        t
    }

    #[test]
    fn ties_are_preserved() {
        let rule = CriticalRule::default();
        assert_eq!(rule.select(&[0.5, 0.5, 0.0]), vec![0, 1]);
        assert_eq!(rule.select(&[0.2, 0.7, 0.1]), vec![1]);
        assert!(rule.select(&[0.0, 0.0]).is_empty());
    }

    #[test]
    fn min_share_rule() {
        let rule = CriticalRule::MinShare { share: 0.3 };
        assert_eq!(rule.select(&[0.35, 0.3, 0.2, 0.15]), vec![0, 1]);
    }

    #[test]
    fn acidification_scenario_flags_both_leaders() {
        let t = table(&[
            ("Fly ash", "Acidification", 40.0),
            ("GGBFS", "Acidification", 40.0),
            ("Gravel", "Acidification", 20.0),
        ]);
        let set = CandidateSet::every_process(&t);
        let res = critical_processes(&t, &set, CriticalRule::default());
        assert_eq!(res.len(), 1);
        let labels: Vec<&str> = res[0].critical.iter().map(|&i| set.labels()[i]).collect();
        assert_eq!(labels, ["Fly ash", "GGBFS"]);
        assert!((res[0].shares[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn grouped_candidates_sum_members() {
        let t = table(&[
            ("Sodium Silicate", "CC", 26.0),
            ("Sodium Hydroxide", "CC", 38.0),
            ("GGBFS", "CC", 15.0),
            ("Gravel", "CC", 21.0),
        ]);
        let defs = vec![
            CandidateDef {
                label: "Activator".into(),
                members: vec!["Sodium Silicate".into(), "Sodium Hydroxide".into()],
            },
            CandidateDef {
                label: "GGBFS".into(),
                members: vec![],
            },
        ];
        let set = CandidateSet::from_defs(&defs, &t);
        assert_eq!(set.values(&t, "CC"), vec![64.0, 15.0]);
        let res = critical_processes(&t, &set, CriticalRule::default());
        assert_eq!(res[0].critical, vec![0]);
        assert!((res[0].shares[0] - 0.64).abs() < 1e-12);
    }

    #[test]
    fn zero_category_has_no_critical_candidate() {
        let t = table(&[("Water", "CC", 0.0), ("Sand", "CC", 0.0)]);
        let set = CandidateSet::every_process(&t);
        let res = critical_processes(&t, &set, CriticalRule::default());
        assert!(res[0].critical.is_empty());
        assert_eq!(res[0].total, 0.0);
    }

    #[test]
    fn summary_counts_and_ties() {
        let t = table(&[
            ("A", "c1", 5.0),
            ("B", "c1", 1.0),
            ("A", "c2", 1.0),
            ("B", "c2", 5.0),
            ("A", "c3", 0.0),
        ]);
        let set = CandidateSet::every_process(&t);
        let rule = CriticalRule::default();
        let res = critical_processes(&t, &set, rule);
        let summary = CriticalSummary::new(&res, &set, rule);
        assert_eq!(summary.count("A"), Some(1));
        assert_eq!(summary.count("B"), Some(1));
        assert_eq!(summary.most_critical, ["A", "B"]);
        assert!(summary.categories[2].critical.is_empty());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_largest_share_is_critical(raw in prop::collection::vec(0u32..20, 1..12)) {
            let shares: Vec<f64> = raw.iter().map(|&v| f64::from(v)).collect();
            let max = shares.iter().copied().fold(0.0_f64, f64::max);
            let expected: Vec<usize> = shares
                .iter()
                .enumerate()
                .filter(|&(_, &s)| max > 0.0 && s == max)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(CriticalRule::default().select(&shares), expected);
        }
    }
}

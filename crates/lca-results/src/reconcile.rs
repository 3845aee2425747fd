//! Cross-check contribution totals against the impact table.

use lca_core::{Tolerances, nearly_equal};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{ContributionTable, ImpactTable};

/// A category whose contributions do not add up to its impact result, or
/// that appears in only one of the two tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub category: String,
    pub impact: Option<f64>,
    pub contributions: Option<f64>,
}

/// Compare per-category contribution sums with midpoint impact results.
///
/// Mismatches are logged and returned; they never abort a run.
pub fn reconcile(
    impacts: &ImpactTable,
    contributions: &ContributionTable,
    tol: Tolerances,
) -> Vec<Mismatch> {
    let mut out = Vec::new();

    for category in &contributions.categories {
        let total = contributions.category_total(category);
        match impacts.get(category) {
            Some(result) if nearly_equal(result.value, total, tol) => {}
            Some(result) => out.push(Mismatch {
                category: category.clone(),
                impact: Some(result.value),
                contributions: Some(total),
            }),
            None => out.push(Mismatch {
                category: category.clone(),
                impact: None,
                contributions: Some(total),
            }),
        }
    }
    for result in impacts.midpoints() {
        if !contributions.categories.contains(&result.category) {
            out.push(Mismatch {
                category: result.category.clone(),
                impact: Some(result.value),
                contributions: None,
            });
        }
    }

    for m in &out {
        warn!(
            category = %m.category,
            impact = ?m.impact,
            contributions = ?m.contributions,
            "impact and contribution tables disagree"
        );
    }
    out
}

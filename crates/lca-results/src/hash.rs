//! Content-based hashing for run IDs.

use lca_project::AggregationDef;
use sha2::{Digest, Sha256};

/// Hash the raw input tables together with the aggregation settings, so the
/// same inputs always land in the same run directory.
pub fn compute_run_id(inputs: &[&[u8]], aggregation: &AggregationDef, tool_version: &str) -> String {
    let mut hasher = Sha256::new();

    for input in inputs {
        hasher.update((input.len() as u64).to_le_bytes());
        hasher.update(input);
    }

    let aggregation_json = serde_json::to_string(aggregation).unwrap_or_default();
    hasher.update(aggregation_json.as_bytes());

    hasher.update(tool_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lca_project::{CandidateDef, CriticalRuleDef};

    #[test]
    fn hash_stability() {
        let agg = AggregationDef::default();
        let a = compute_run_id(&["flow\nSand\n".as_bytes()], &agg, "v1");
        let b = compute_run_id(&["flow\nSand\n".as_bytes()], &agg, "v1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let agg = AggregationDef::default();
        let base = compute_run_id(&["ab".as_bytes(), "c".as_bytes()], &agg, "v1");

        assert_ne!(base, compute_run_id(&["a".as_bytes(), "bc".as_bytes()], &agg, "v1"));
        assert_ne!(base, compute_run_id(&["ab".as_bytes(), "c".as_bytes()], &agg, "v2"));

        let other = AggregationDef {
            rule: CriticalRuleDef::MinShare { share: 0.3 },
            candidates: vec![CandidateDef {
                label: "Fly Ash".into(),
                members: vec![],
            }],
        };
        assert_ne!(base, compute_run_id(&["ab".as_bytes(), "c".as_bytes()], &other, "v1"));
    }
}

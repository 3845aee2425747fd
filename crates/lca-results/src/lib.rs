//! lca-results: impact result import, critical-process aggregation and
//! diagram-ready link structures.

pub mod aggregate;
pub mod critical;
pub mod hash;
pub mod import;
pub mod reconcile;
pub mod sankey;
pub mod store;
pub mod types;

pub use aggregate::{coalesced_diagram, critical_diagram};
pub use critical::{
    Candidate, CandidateCount, CandidateSet, CategoryCritical, CategorySummary, CriticalRule,
    CriticalSummary, critical_processes,
};
pub use hash::compute_run_id;
pub use import::{
    import_contributions, import_damage, import_impacts, load_contributions, load_damage,
    load_impacts,
};
pub use reconcile::{Mismatch, reconcile};
pub use sankey::{ColorGroup, SankeyBuilder, SankeyDiagram, SankeyLink, SankeyNode, SankeyTier};
pub use store::OutputStore;
pub use types::*;

use lca_core::DataFormatError;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Unknown diagram tier {tier}")]
    UnknownTier { tier: usize },

    #[error("No node '{label}' in diagram tier {tier}")]
    UnknownNode { tier: usize, label: String },
}

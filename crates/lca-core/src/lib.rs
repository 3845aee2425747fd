//! lca-core: stable foundation for geolca.
//!
//! Contains:
//! - ids (compact IDs for in-memory model graph objects)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types + amount normalisation to reference units)
//! - linking (provider linking policy and process granularity)
//! - table (tabular input reader + `DataFormatError`)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod linking;
pub mod numeric;
pub mod table;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use linking::{LinkingOptions, ProcessType, ProviderLinking};
pub use numeric::*;
pub use table::{DataFormatError, Table, TableRow};
pub use units::*;

//! lca-graph: in-memory model graph for geolca.
//!
//! Provides:
//! - Flow/process/exchange data structures (`ModelGraph`)
//! - Incremental builder with validation
//! - Provider resolution from a root process (product-system linking)
//!
//! # Example
//!
//! ```
//! use lca_core::{LinkingOptions, ProcessType};
//! use lca_graph::{Direction, GraphBuilder, resolve_providers};
//!
//! let mut builder = GraphBuilder::new();
//! let sand = builder.add_flow("Sand");
//! let concrete = builder.add_flow("Concrete");
//! let quarry = builder.add_process("Sand", ProcessType::UnitProcess);
//! let mixer = builder.add_process("Concrete", ProcessType::UnitProcess);
//! builder.add_exchange(quarry, sand, Direction::Output, 1.0);
//! builder.add_exchange(mixer, sand, Direction::Input, 650.0);
//! builder.add_exchange(mixer, concrete, Direction::Output, 1.0);
//! let graph = builder.build().unwrap();
//!
//! let resolution = resolve_providers(&graph, mixer, LinkingOptions::default()).unwrap();
//! assert_eq!(resolution.processes.len(), 2);
//! assert_eq!(resolution.links.len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod resolve;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Direction, Exchange, FlowNode, ModelGraph, ProcessNode};
pub use resolve::{DanglingInput, ProviderLink, Resolution, resolve_providers};

//! lca-model: builds the LCA model in the external store.
//!
//! Flows are registered first, then processes and their exchanges, then one
//! product system rooted at the reference process. Every create is preceded
//! by a lookup by name, so re-running against a populated store does not
//! duplicate objects.

pub mod error;
pub mod flows;
pub mod plan;
pub mod processes;
pub mod product_system;
pub mod session;

pub use error::{ModelError, ModelResult};
pub use flows::{FlowRef, FlowRegistrar};
pub use plan::{FlowPlan, ModelPlan, ProcessPlan};
pub use processes::{ExchangeSpec, ProcessRef, ProcessRegistrar, RegisteredProcess};
pub use product_system::{DanglingRef, ProductSystem, ResolvedLink, build_product_system};
pub use session::{ModelReport, ModelSession};

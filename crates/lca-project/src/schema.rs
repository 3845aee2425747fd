//! Project schema definitions.

use std::path::PathBuf;

use lca_core::LinkingOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    /// Reference quantity all impacts are expressed per, e.g. "1 m3 geopolymer concrete".
    #[serde(default)]
    pub functional_unit: String,
    #[serde(default)]
    pub store: StoreDef,
    pub inventory: InventoryDef,
    #[serde(default)]
    pub linking: LinkingOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsDef>,
    #[serde(default)]
    pub aggregation: AggregationDef,
    #[serde(default)]
    pub output: OutputDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StoreDef {
    Ipc {
        #[serde(default = "default_host")]
        host: String,
        #[serde(default = "default_port")]
        port: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_s: Option<f64>,
    },
    Memory,
}

impl Default for StoreDef {
    fn default() -> Self {
        StoreDef::Ipc {
            host: default_host(),
            port: default_port(),
            timeout_s: None,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryDef {
    pub path: PathBuf,
    /// Flow property for input rows without a `property` cell.
    #[serde(default = "default_input_property")]
    pub input_property: String,
    /// Flow property for the reference output without a `property` cell.
    #[serde(default = "default_output_property")]
    pub output_property: String,
}

fn default_input_property() -> String {
    "Mass".to_string()
}

fn default_output_property() -> String {
    "Volume".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultsDef {
    /// Midpoint/endpoint impact totals per category.
    pub impacts: PathBuf,
    /// Per-process contributions per category.
    pub contributions: PathBuf,
    /// Midpoint to endpoint damage values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AggregationDef {
    #[serde(default)]
    pub rule: CriticalRuleDef,
    /// Candidate processes for the critical-process diagram. Empty means
    /// every process in the contribution table.
    #[serde(default)]
    pub candidates: Vec<CandidateDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CriticalRuleDef {
    /// Critical when within `tolerance` (relative) of the largest share.
    TiedMax {
        #[serde(default = "default_tie_tolerance")]
        tolerance: f64,
    },
    /// Critical when the share is at least `share` (0..=1).
    MinShare { share: f64 },
}

impl Default for CriticalRuleDef {
    fn default() -> Self {
        CriticalRuleDef::TiedMax {
            tolerance: default_tie_tolerance(),
        }
    }
}

fn default_tie_tolerance() -> f64 {
    1e-9
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateDef {
    pub label: String,
    /// Process names whose contributions are summed under `label`.
    /// Empty means the process named `label` itself.
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputDef {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputDef {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

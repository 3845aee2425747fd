//! Store-side data model (subset of the openLCA JSON-LD schema).

use core::fmt;

use lca_core::ProcessType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    Flow,
    FlowProperty,
    Process,
    ProductSystem,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelType::Flow => "Flow",
            ModelType::FlowProperty => "FlowProperty",
            ModelType::Process => "Process",
            ModelType::ProductSystem => "ProductSystem",
        };
        f.write_str(s)
    }
}

/// Reference to (or descriptor of) a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "@type")]
    pub model_type: ModelType,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    #[default]
    ProductFlow,
    ElementaryFlow,
    WasteFlow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPropertyFactor {
    pub flow_property: Ref,
    pub conversion_factor: f64,
    pub reference_flow_property: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    #[serde(rename = "@type")]
    pub model_type: ModelType,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flow_type: FlowType,
    #[serde(default)]
    pub flow_properties: Vec<FlowPropertyFactor>,
}

impl Flow {
    /// A product flow with a single reference flow property and a fresh id.
    pub fn product(name: impl Into<String>, property: Ref, description: impl Into<String>) -> Self {
        Self {
            model_type: ModelType::Flow,
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            flow_type: FlowType::ProductFlow,
            flow_properties: vec![FlowPropertyFactor {
                flow_property: property,
                conversion_factor: 1.0,
                reference_flow_property: true,
            }],
        }
    }

    pub fn reference(&self) -> Ref {
        Ref {
            model_type: ModelType::Flow,
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// The flow property marked as reference, if any.
    pub fn reference_property(&self) -> Option<&Ref> {
        self.flow_properties
            .iter()
            .find(|f| f.reference_flow_property)
            .map(|f| &f.flow_property)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub internal_id: u32,
    pub input: bool,
    #[serde(default)]
    pub quantitative_reference: bool,
    pub amount: f64,
    pub flow: Ref,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(rename = "@type")]
    pub model_type: ModelType,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub process_type: ProcessType,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
}

impl Process {
    /// An empty process with a fresh id.
    pub fn new(name: impl Into<String>, kind: ProcessType, description: impl Into<String>) -> Self {
        Self {
            model_type: ModelType::Process,
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            process_type: kind,
            exchanges: Vec::new(),
        }
    }

    pub fn reference(&self) -> Ref {
        Ref {
            model_type: ModelType::Process,
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

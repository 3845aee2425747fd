//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    #[default]
    Midpoint,
    Endpoint,
}

/// One row of the impact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub category: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub level: ImpactLevel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactTable {
    pub results: Vec<ImpactResult>,
}

impl ImpactTable {
    pub fn get(&self, category: &str) -> Option<&ImpactResult> {
        self.results.iter().find(|r| r.category == category)
    }

    pub fn midpoints(&self) -> impl Iterator<Item = &ImpactResult> + '_ {
        self.results.iter().filter(|r| r.level == ImpactLevel::Midpoint)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &ImpactResult> + '_ {
        self.results.iter().filter(|r| r.level == ImpactLevel::Endpoint)
    }
}

/// Contribution of one process to one impact category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionLink {
    pub process: String,
    pub category: String,
    pub value: f64,
}

/// Process x category contribution matrix, stored sparsely.
///
/// `processes` and `categories` keep first-seen order; missing pairs count
/// as zero. Repeated pairs are summed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionTable {
    pub processes: Vec<String>,
    pub categories: Vec<String>,
    pub links: Vec<ContributionLink>,
}

impl ContributionTable {
    pub fn add(&mut self, process: &str, category: &str, value: f64) {
        if !self.processes.iter().any(|p| p == process) {
            self.processes.push(process.to_string());
        }
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
        match self
            .links
            .iter_mut()
            .find(|l| l.process == process && l.category == category)
        {
            Some(link) => link.value += value,
            None => self.links.push(ContributionLink {
                process: process.to_string(),
                category: category.to_string(),
                value,
            }),
        }
    }

    pub fn value(&self, process: &str, category: &str) -> f64 {
        self.links
            .iter()
            .find(|l| l.process == process && l.category == category)
            .map_or(0.0, |l| l.value)
    }

    pub fn category_total(&self, category: &str) -> f64 {
        self.links
            .iter()
            .filter(|l| l.category == category)
            .map(|l| l.value)
            .sum()
    }
}

/// Midpoint to endpoint damage value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageFactor {
    pub midpoint: String,
    pub endpoint: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageTable {
    pub factors: Vec<DamageFactor>,
}

impl DamageTable {
    /// Endpoint names in first-seen order.
    pub fn endpoints(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for f in &self.factors {
            if !out.contains(&f.endpoint.as_str()) {
                out.push(&f.endpoint);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project: String,
    pub timestamp: String,
    pub tool_version: String,
    pub rule: String,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_system: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<crate::reconcile::Mismatch>,
}

//! Tiered link structures ready for a Sankey renderer.
//!
//! Nodes live in named tiers laid out left to right. Links connect nodes by
//! `(tier, label)`; both ends must have been added first.

use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Neutral,
    /// Colour of the candidate with this index.
    Candidate(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyTier {
    pub name: String,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub label: String,
    pub tier: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub color_group: ColorGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyDiagram {
    pub tiers: Vec<SankeyTier>,
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl SankeyDiagram {
    pub fn node_index(&self, tier: usize, label: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.tier == tier && n.label == label)
    }

    pub fn inflow(&self, node: usize) -> f64 {
        self.links
            .iter()
            .filter(|l| l.target == node)
            .map(|l| l.value)
            .sum()
    }

    pub fn outflow(&self, node: usize) -> f64 {
        self.links
            .iter()
            .filter(|l| l.source == node)
            .map(|l| l.value)
            .sum()
    }

    pub fn nonzero_links(&self) -> impl Iterator<Item = &SankeyLink> + '_ {
        self.links.iter().filter(|l| l.value != 0.0)
    }

    /// Nodes of one tier in order.
    pub fn tier_nodes(&self, tier: usize) -> impl Iterator<Item = &SankeyNode> + '_ {
        self.nodes.iter().filter(move |n| n.tier == tier)
    }
}

fn spread(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.5
    } else {
        0.1 + 0.8 * i as f64 / (n - 1) as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct SankeyBuilder {
    tiers: Vec<String>,
    nodes: Vec<(usize, String)>,
    links: Vec<SankeyLink>,
}

impl SankeyBuilder {
    pub fn new<S: AsRef<str>>(tiers: &[S]) -> Self {
        Self {
            tiers: tiers.iter().map(|t| t.as_ref().to_string()).collect(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Add a node, or return the existing one with this label in `tier`.
    pub fn node(&mut self, tier: usize, label: &str) -> ResultsResult<usize> {
        if tier >= self.tiers.len() {
            return Err(ResultsError::UnknownTier { tier });
        }
        if let Some(i) = self.find(tier, label) {
            return Ok(i);
        }
        self.nodes.push((tier, label.to_string()));
        Ok(self.nodes.len() - 1)
    }

    fn find(&self, tier: usize, label: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|(t, l)| *t == tier && l == label)
    }

    fn require(&self, tier: usize, label: &str) -> ResultsResult<usize> {
        if tier >= self.tiers.len() {
            return Err(ResultsError::UnknownTier { tier });
        }
        self.find(tier, label).ok_or_else(|| ResultsError::UnknownNode {
            tier,
            label: label.to_string(),
        })
    }

    pub fn link(
        &mut self,
        from: (usize, &str),
        to: (usize, &str),
        value: f64,
        color_group: ColorGroup,
    ) -> ResultsResult<()> {
        let source = self.require(from.0, from.1)?;
        let target = self.require(to.0, to.1)?;
        self.links.push(SankeyLink {
            source,
            target,
            value,
            color_group,
        });
        Ok(())
    }

    pub fn build(self) -> SankeyDiagram {
        let n_tiers = self.tiers.len();
        let tiers: Vec<SankeyTier> = self
            .tiers
            .into_iter()
            .enumerate()
            .map(|(i, name)| SankeyTier {
                name,
                x: spread(i, n_tiers),
            })
            .collect();

        let mut per_tier = vec![0usize; n_tiers];
        for (tier, _) in &self.nodes {
            per_tier[*tier] += 1;
        }
        let mut seen = vec![0usize; n_tiers];
        let nodes = self
            .nodes
            .into_iter()
            .map(|(tier, label)| {
                let y = spread(seen[tier], per_tier[tier]);
                seen[tier] += 1;
                SankeyNode {
                    label,
                    tier,
                    x: tiers[tier].x,
                    y,
                }
            })
            .collect();

        SankeyDiagram {
            tiers,
            nodes,
            links: self.links,
        }
    }
}

//! Domain co-occurrence network
//!
//! Nodes are domains sized by how many experiences mention them. An edge joins
//! two domains that appear together in one experience, weighted by the number
//! of experiences in which they co-occur.

use std::collections::BTreeMap;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::index::ExperienceIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainNode {
    pub id: String,
    /// Number of experiences tagged with this domain
    pub size: usize,
}

/// Undirected edge; `source` sorts before `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEdge {
    pub source: String,
    pub target: String,
    pub weight: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainNetwork {
    /// First-appearance order
    pub nodes: Vec<DomainNode>,
    /// Sorted by (source, target)
    pub edges: Vec<DomainEdge>,
}

impl DomainNetwork {
    pub fn node(&self, domain: &str) -> Option<&DomainNode> {
        self.nodes.iter().find(|n| n.id == domain)
    }

    /// Weight of the edge between two domains, in either order
    pub fn weight(&self, a: &str, b: &str) -> Option<usize> {
        let (source, target) = edge_key(a, b);
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
            .map(|e| e.weight)
    }

    /// Domains that co-occur with `domain`, strongest first
    pub fn neighbors(&self, domain: &str) -> Vec<(&str, usize)> {
        let mut found: Vec<(&str, usize)> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.source == domain {
                    Some((e.target.as_str(), e.weight))
                } else if e.target == domain {
                    Some((e.source.as_str(), e.weight))
                } else {
                    None
                }
            })
            .collect();
        found.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        found
    }

    /// Build a petgraph graph with node weights `DomainNode` and edge weights = co-occurrence counts
    pub fn to_graph(&self) -> UnGraph<DomainNode, usize> {
        let mut graph = UnGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut lookup: BTreeMap<&str, NodeIndex> = BTreeMap::new();
        for node in &self.nodes {
            lookup.insert(node.id.as_str(), graph.add_node(node.clone()));
        }
        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (
                lookup.get(edge.source.as_str()),
                lookup.get(edge.target.as_str()),
            ) {
                graph.add_edge(a, b, edge.weight);
            }
        }
        graph
    }
}

fn edge_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Build the co-occurrence network over every indexed experience
pub fn generate_domain_network(index: &ExperienceIndex) -> DomainNetwork {
    let nodes = index
        .domains()
        .iter()
        .map(|(domain, ids)| DomainNode {
            id: domain.to_string(),
            size: ids.len(),
        })
        .collect();

    let mut weights: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in index.records() {
        let domains = record.distinct_domains();
        for (i, a) in domains.iter().enumerate() {
            for b in &domains[i + 1..] {
                let (source, target) = edge_key(a, b);
                *weights
                    .entry((source.to_string(), target.to_string()))
                    .or_insert(0) += 1;
            }
        }
    }

    let edges = weights
        .into_iter()
        .map(|((source, target), weight)| DomainEdge {
            source,
            target,
            weight,
        })
        .collect();

    DomainNetwork { nodes, edges }
}

//! Graphviz rendering of the domain network

use petgraph::dot::{Config, Dot};

use crate::analysis::DomainNetwork;

/// Undirected DOT graph; node width grows with domain size, pen width with edge weight
pub fn to_dot(network: &DomainNetwork) -> String {
    let graph = network.to_graph();
    let dot = Dot::with_attr_getters(
        &graph,
        &[Config::NodeNoLabel, Config::EdgeNoLabel],
        &|_, edge| format!("weight={} penwidth={} ", edge.weight(), edge.weight()),
        &|_, (_, node)| {
            format!(
                "label={:?} width={:.2} ",
                node.id,
                0.75 + 0.25 * node.size as f64
            )
        },
    );
    format!("{:?}", dot)
}

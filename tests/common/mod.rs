//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};

use graphscope::graph::{Graph, NodeId};
use proptest::prelude::*;

/// Builds a graph from named edges.
pub fn build(directed: bool, edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new(directed);
    for (source, target) in edges {
        graph.add_edge_by_name(source, target);
    }
    graph
}

/// Looks up a set of nodes by name.
pub fn named(graph: &Graph, names: &[&str]) -> HashSet<NodeId> {
    names
        .iter()
        .map(|name| graph.node_id(name).unwrap())
        .collect()
}

/// Node count and edge list of a generated graph. Node `i` is named `n{i}`.
#[derive(Debug, Clone)]
pub struct GraphShape {
    pub directed: bool,
    pub nodes: usize,
    pub edges: Vec<(usize, usize)>,
}

impl GraphShape {
    /// Builds the graph, skipping self-loops and repeated pairs.
    pub fn build(&self) -> Graph {
        let mut graph = Graph::new(self.directed);
        let ids: Vec<NodeId> = (0..self.nodes)
            .map(|i| graph.add_node(&format!("n{i}")))
            .collect();
        for &(a, b) in &self.edges {
            if a != b {
                graph.add_edge(ids[a], ids[b]).unwrap();
            }
        }
        graph
    }

    /// The same graph with node `i` renamed to `permutation[i]` and edges in a new order.
    pub fn relabel(&self, permutation: &[usize], edges: &[(usize, usize)]) -> GraphShape {
        GraphShape {
            directed: self.directed,
            nodes: self.nodes,
            edges: edges
                .iter()
                .map(|&(a, b)| (permutation[a], permutation[b]))
                .collect(),
        }
    }
}

/// Graphs with exactly `nodes` nodes and up to twice as many edges.
pub fn arb_shape(directed: bool, nodes: usize) -> impl Strategy<Value = GraphShape> {
    prop::collection::vec((0..nodes, 0..nodes), 0..=nodes * 2).prop_map(move |edges| {
        GraphShape {
            directed,
            nodes,
            edges,
        }
    })
}

/// Graphs with between one and `max_nodes` nodes.
pub fn arb_graph(directed: bool, max_nodes: usize) -> impl Strategy<Value = GraphShape> {
    (1..=max_nodes).prop_flat_map(move |nodes| arb_shape(directed, nodes))
}

/// Relabelled copies of `shape` with node names and edge order shuffled.
pub fn arb_relabelled(shape: GraphShape) -> impl Strategy<Value = GraphShape> {
    let permutation = Just((0..shape.nodes).collect::<Vec<_>>()).prop_shuffle();
    let edges = Just(shape.edges.clone()).prop_shuffle();
    (permutation, edges).prop_map(move |(permutation, edges)| shape.relabel(&permutation, &edges))
}

/// A graph together with a relabelled copy of itself.
pub fn arb_shuffled_pair(
    directed: bool,
    max_nodes: usize,
) -> impl Strategy<Value = (GraphShape, GraphShape)> {
    arb_graph(directed, max_nodes)
        .prop_flat_map(|shape| (Just(shape.clone()), arb_relabelled(shape)))
}

/// Nodes reachable from `start` over successor edges, never entering `avoid`.
pub fn reachable_avoiding(graph: &Graph, start: NodeId, avoid: Option<NodeId>) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    if Some(start) == avoid {
        return seen;
    }
    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(node) = queue.pop_front() {
        for next in graph.successors(node) {
            if Some(next) != avoid && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

//! Structural predicates over whole graphs.
//!
//! Every predicate walks the graph through [`Traversal`], so its cost is that of one or a
//! few complete walks.

use std::collections::HashSet;

use crate::{
    graph::{Graph, NodeId},
    traversal::{Decision, Traversal},
};

/// Returns `true` if the graph contains at least one cycle.
///
/// For directed graphs a cycle is a directed cycle, self-loops included. For undirected
/// graphs a single edge is not a cycle, but a self-loop is.
///
/// # Examples
///
/// ```rust
/// use graphscope::analysis::is_cyclic;
/// use graphscope::graph::Graph;
///
/// let mut graph = Graph::directed();
/// graph.add_edge_by_name("A", "B");
/// graph.add_edge_by_name("B", "C");
/// assert!(!is_cyclic(&graph));
///
/// graph.add_edge_by_name("C", "A");
/// assert!(is_cyclic(&graph));
/// ```
pub fn is_cyclic(graph: &Graph) -> bool {
    if graph.is_directed() {
        // A start node is on a cycle iff the walk from it arrives back at it.
        graph.node_ids().any(|start| returns_to_start(graph, start))
    } else {
        let components = component_count(graph);
        graph.edge_count() + components > graph.node_count()
    }
}

fn returns_to_start(graph: &Graph, start: NodeId) -> bool {
    let Ok(mut walk) = Traversal::depth_first().walk(graph, start) else {
        return false;
    };
    while let Some(visit) = walk.next_visit() {
        if visit.node == start && !visit.is_root() {
            walk.decide(Decision::Abort);
            return true;
        }
    }
    false
}

/// Number of connected components of an undirected graph.
fn component_count(graph: &Graph) -> usize {
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());
    let mut components = 0;
    for node in graph.node_ids() {
        if seen.contains(&node) {
            continue;
        }
        components += 1;
        if let Ok(walk) = Traversal::breadth_first().walk(graph, node) {
            seen.extend(walk.filter(|visit| visit.first).map(|visit| visit.node));
        }
    }
    components
}

/// Returns `true` if every node can reach every other node, ignoring edge direction.
///
/// For directed graphs this is weak connectivity. The empty graph is connected.
pub fn is_connected(graph: &Graph) -> bool {
    let undirected;
    let graph = if graph.is_directed() {
        undirected = graph.to_undirected();
        &undirected
    } else {
        graph
    };

    let Some(first) = graph.node_ids().next() else {
        return true;
    };
    match Traversal::breadth_first().walk(graph, first) {
        Ok(walk) => walk.filter(|visit| visit.first).count() == graph.node_count(),
        Err(_) => false,
    }
}

/// Returns `true` if the graph is a tree.
///
/// An undirected graph is a tree if it is connected and has one edge fewer than it has
/// nodes. A directed graph is a tree if it has exactly one node without incoming edges,
/// every other node has exactly one incoming edge, and every node is reachable from the
/// root. The empty graph is not a tree.
///
/// # Examples
///
/// ```rust
/// use graphscope::analysis::is_tree;
/// use graphscope::graph::Graph;
///
/// let mut graph = Graph::directed();
/// graph.add_edge_by_name("root", "left");
/// graph.add_edge_by_name("root", "right");
/// assert!(is_tree(&graph));
///
/// graph.add_edge_by_name("left", "right");
/// assert!(!is_tree(&graph));
/// ```
pub fn is_tree(graph: &Graph) -> bool {
    if graph.is_empty() {
        return false;
    }

    if !graph.is_directed() {
        return graph.edge_count() + 1 == graph.node_count() && is_connected(graph);
    }

    let mut roots = graph.node_ids().filter(|&n| graph.in_degree(n) == 0);
    let (Some(root), None) = (roots.next(), roots.next()) else {
        return false;
    };
    if graph
        .node_ids()
        .any(|n| n != root && graph.in_degree(n) != 1)
    {
        return false;
    }

    match Traversal::breadth_first().walk(graph, root) {
        Ok(walk) => walk.filter(|visit| visit.first).count() == graph.node_count(),
        Err(_) => false,
    }
}

/// Returns `true` if all nodes have the same degree.
///
/// Directed graphs must agree on both out-degree and in-degree. The empty graph is regular.
pub fn is_regular(graph: &Graph) -> bool {
    let mut degrees = graph.node_ids().map(|n| {
        let in_degree = if graph.is_directed() {
            graph.in_degree(n)
        } else {
            0
        };
        (graph.out_degree(n), in_degree)
    });
    let Some(first) = degrees.next() else {
        return true;
    };
    degrees.all(|degree| degree == first)
}

/// Returns `true` if every pair of distinct nodes is joined by an edge.
///
/// Directed graphs need an edge in each direction. Self-loops are irrelevant.
pub fn is_complete(graph: &Graph) -> bool {
    let nodes: Vec<NodeId> = graph.node_ids().collect();
    nodes.iter().enumerate().all(|(i, &a)| {
        nodes[i + 1..].iter().all(|&b| {
            graph.has_edge(a, b) && (!graph.is_directed() || graph.has_edge(b, a))
        })
    })
}

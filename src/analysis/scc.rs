//! Strongly Connected Components (SCC) using Kosaraju's algorithm.
//!
//! A strongly connected component is a maximal set of vertices such that there is a path
//! from every vertex to every other vertex in the set.
//!
//! # Algorithm
//!
//! 1. Depth-first walk over the whole graph, re-seeded from every node not yet reached,
//!    recording finish order with a [`PostOrderRecorder`]
//! 2. Transpose the graph
//! 3. In reverse finish order, start a depth-first walk over the transpose from every node
//!    not yet assigned; the walk expands only unassigned nodes, and everything it assigns
//!    forms one component
//!
//! Components are returned in order of discovery in step 3, which is a topological order
//! of the condensation: a component only has edges into components listed after it.
//!
//! # Complexity
//!
//! - Time: O(V + E)
//! - Space: O(V + E) for the transpose

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{
    graph::{Graph, NodeId},
    traversal::{Decision, PostOrderRecorder, Traversal},
    Result,
};

/// Computes the strongly connected components of a graph.
///
/// Every live node appears in exactly one component. For undirected graphs the components
/// are the connected components.
///
/// # Examples
///
/// ```rust
/// use graphscope::analysis::strongly_connected_components;
/// use graphscope::graph::Graph;
///
/// // Simple cycle: A -> B -> C -> A, plus C -> D
/// let mut graph = Graph::directed();
/// graph.add_edge_by_name("A", "B");
/// graph.add_edge_by_name("B", "C");
/// graph.add_edge_by_name("C", "A");
/// graph.add_edge_by_name("C", "D");
///
/// let sccs = strongly_connected_components(&graph);
/// assert_eq!(sccs.len(), 2);
/// assert_eq!(sccs[0].len(), 3);
/// ```
#[instrument(skip(graph))]
pub fn strongly_connected_components(graph: &Graph) -> Vec<HashSet<NodeId>> {
    let roots: Vec<NodeId> = graph.node_ids().collect();
    let finish_order = finish_order(graph, &roots);
    let components = collect_components(graph, &finish_order);

    debug!(
        components = components.len(),
        nodes = graph.node_count(),
        "strongly connected components found"
    );
    components
}

/// Computes the strongly connected components among the nodes reachable from `entry`.
///
/// # Errors
///
/// Fails if `entry` does not resolve to a live node of `graph`.
pub fn strongly_connected_components_from(
    graph: &Graph,
    entry: NodeId,
) -> Result<Vec<HashSet<NodeId>>> {
    graph.ensure_node(entry)?;
    let finish_order = finish_order(graph, &[entry]);
    Ok(collect_components(graph, &finish_order))
}

/// Postorder of a depth-first forest seeded from `roots` in order.
fn finish_order(graph: &Graph, roots: &[NodeId]) -> Vec<NodeId> {
    let Some((&first, rest)) = roots.split_first() else {
        return Vec::new();
    };
    let Ok(mut walk) = Traversal::depth_first().walk(graph, first) else {
        return Vec::new();
    };

    let mut recorder = PostOrderRecorder::new();
    walk.drive(&mut [&mut recorder], |_| None);
    for &root in rest {
        if walk.is_visited(root) {
            continue;
        }
        if walk.continue_from(root).is_ok() {
            walk.drive(&mut [&mut recorder], |_| None);
        }
    }
    recorder.into_order()
}

fn collect_components(graph: &Graph, finish_order: &[NodeId]) -> Vec<HashSet<NodeId>> {
    let transpose = graph.transpose();
    let mut assigned = vec![false; graph.node_bound()];
    let mut components = Vec::new();

    for &node in finish_order.iter().rev() {
        if assigned[node.index()] {
            continue;
        }
        let Ok(start) = transpose.node_at(node.index()) else {
            continue;
        };
        let Ok(mut walk) = Traversal::depth_first().walk(&transpose, start) else {
            continue;
        };

        let mut component = HashSet::new();
        while let Some(visit) = walk.next_visit() {
            let slot = &mut assigned[visit.node.index()];
            if *slot {
                walk.decide(Decision::SkipChildren);
                continue;
            }
            *slot = true;
            if let Ok(original) = graph.node_at(visit.node.index()) {
                component.insert(original);
            }
        }
        components.push(component);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::directed();
        for (source, target) in edges {
            graph.add_edge_by_name(source, target);
        }
        graph
    }

    fn named(graph: &Graph, names: &[&str]) -> HashSet<NodeId> {
        names.iter().map(|n| graph.node_id(n).unwrap()).collect()
    }

    fn assert_partition(graph: &Graph, sccs: &[HashSet<NodeId>]) {
        let total: usize = sccs.iter().map(HashSet::len).sum();
        assert_eq!(total, graph.node_count());
        let union: HashSet<NodeId> = sccs.iter().flatten().copied().collect();
        assert_eq!(union.len(), graph.node_count());
    }

    #[test]
    fn test_scc_empty_graph() {
        let graph = Graph::directed();
        assert!(strongly_connected_components(&graph).is_empty());
    }

    #[test]
    fn test_scc_single_node_self_loop() {
        let graph = build(&[("A", "A")]);
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs, vec![named(&graph, &["A"])]);
    }

    #[test]
    fn test_scc_linear_chain() {
        let graph = build(&[("A", "B"), ("B", "C")]);
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs.len(), 3);
        assert!(sccs.iter().all(|c| c.len() == 1));
        // Topological order of the condensation
        assert_eq!(sccs[0], named(&graph, &["A"]));
        assert_eq!(sccs[2], named(&graph, &["C"]));
    }

    #[test]
    fn test_scc_simple() {
        let graph = build(&[("0", "2"), ("2", "1"), ("1", "0"), ("0", "3"), ("3", "4")]);
        let sccs = strongly_connected_components(&graph);

        assert_eq!(sccs.len(), 3);
        assert!(sccs.contains(&named(&graph, &["0", "1", "2"])));
        assert!(sccs.contains(&named(&graph, &["3"])));
        assert!(sccs.contains(&named(&graph, &["4"])));
        assert_partition(&graph, &sccs);
    }

    #[test]
    fn test_scc_connected_cycles() {
        // Two cycles joined by a one-way edge
        let graph = build(&[
            ("A", "B"),
            ("B", "A"),
            ("B", "C"),
            ("C", "D"),
            ("D", "C"),
        ]);
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs, vec![named(&graph, &["A", "B"]), named(&graph, &["C", "D"])]);
    }

    #[test]
    fn test_scc_figure_eight() {
        let graph = build(&[("A", "B"), ("B", "A"), ("B", "C"), ("C", "B")]);
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs, vec![named(&graph, &["A", "B", "C"])]);
    }

    #[test]
    fn test_scc_disconnected_graph() {
        let mut graph = build(&[("A", "B"), ("B", "A"), ("C", "D")]);
        graph.add_node("E");
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs.len(), 4);
        assert_partition(&graph, &sccs);
    }

    #[test]
    fn test_scc_skips_removed_nodes() {
        let mut graph = build(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let b = graph.node_id("B").unwrap();
        graph.remove_node(b).unwrap();
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs.len(), 2);
        assert_partition(&graph, &sccs);
    }

    #[test]
    fn test_scc_from_entry() {
        let graph = build(&[("A", "B"), ("B", "A"), ("C", "A")]);
        let a = graph.node_id("A").unwrap();
        let sccs = strongly_connected_components_from(&graph, a).unwrap();
        assert_eq!(sccs, vec![named(&graph, &["A", "B"])]);
    }

    #[test]
    fn test_scc_undirected() {
        let mut graph = Graph::undirected();
        graph.add_edge_by_name("A", "B");
        graph.add_edge_by_name("C", "D");
        graph.add_edge_by_name("D", "E");
        let sccs = strongly_connected_components(&graph);
        assert_eq!(sccs.len(), 2);
        assert!(sccs.contains(&named(&graph, &["C", "D", "E"])));
    }
}

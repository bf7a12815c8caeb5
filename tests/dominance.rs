//! Integration tests for dominance analysis.

mod common;

use std::collections::HashSet;

use common::{arb_graph, build, named, reachable_avoiding};
use graphscope::{graph::Graph, prelude::*};
use proptest::prelude::*;

fn if_statement() -> Graph {
    build(true, &[("1", "2"), ("1", "3"), ("2", "4"), ("3", "4")])
}

fn loop_graph() -> Graph {
    build(true, &[("1", "2"), ("2", "3"), ("3", "2"), ("2", "4")])
}

#[test]
fn test_if_statement_dominators() -> Result<()> {
    let graph = if_statement();
    let one = graph.node_id("1")?;
    let info = DominatorInfo::new(&graph, one)?;

    for name in ["1", "2", "3", "4"] {
        assert_eq!(info.immediate_dominator(graph.node_id(name)?), Some(one));
    }
    Ok(())
}

#[test]
fn test_if_statement_frontiers() -> Result<()> {
    let graph = if_statement();
    let info = DominatorInfo::new(&graph, graph.node_id("1")?)?;

    let expected = named(&graph, &["4"]);
    assert_eq!(info.frontier(graph.node_id("2")?), Some(&expected));
    assert_eq!(info.frontier(graph.node_id("3")?), Some(&expected));
    assert!(info.frontier(graph.node_id("1")?).unwrap().is_empty());
    Ok(())
}

#[test]
fn test_if_statement_dominated() -> Result<()> {
    let graph = if_statement();
    let info = DominatorInfo::new(&graph, graph.node_id("1")?)?;

    let all: HashSet<NodeId> = graph.node_ids().collect();
    assert_eq!(info.dominated_by(graph.node_id("1")?), all);
    for name in ["2", "3", "4"] {
        assert_eq!(info.dominated_by(graph.node_id(name)?), named(&graph, &[name]));
    }
    Ok(())
}

#[test]
fn test_loop_dominators_and_frontiers() -> Result<()> {
    let graph = loop_graph();
    let info = DominatorInfo::new(&graph, graph.node_id("1")?)?;
    let two = graph.node_id("2")?;

    assert_eq!(info.immediate_dominator(graph.node_id("3")?), Some(two));
    assert_eq!(info.immediate_dominator(graph.node_id("4")?), Some(two));

    let expected = named(&graph, &["2"]);
    assert_eq!(info.frontier(two), Some(&expected));
    assert_eq!(info.frontier(graph.node_id("3")?), Some(&expected));

    assert_eq!(info.dominated_by(two), named(&graph, &["2", "3", "4"]));
    assert!(info.is_loop_header(two));
    assert!(!info.is_loop_header(graph.node_id("1")?));
    assert_eq!(info.loop_headers(), vec![two]);

    let back = graph.edge_between(graph.node_id("3")?, two).unwrap();
    assert_eq!(info.back_edges(), vec![back]);
    Ok(())
}

#[test]
fn test_chain_dominates() -> Result<()> {
    let graph = build(true, &[("1", "2"), ("2", "3"), ("3", "4")]);
    let info = DominatorInfo::new(&graph, graph.node_id("1")?)?;
    let ids: Vec<NodeId> = ["1", "2", "3", "4"]
        .iter()
        .map(|n| graph.node_id(n))
        .collect::<Result<_>>()?;

    for (i, &a) in ids.iter().enumerate() {
        for (j, &b) in ids.iter().enumerate() {
            assert_eq!(info.dominates(a, b), i <= j, "{i} dom {j}");
        }
    }
    assert_eq!(info.depth(ids[3]), Some(3));
    assert_eq!(info.dominators(ids[2]).collect::<Vec<_>>(), vec![ids[2], ids[1], ids[0]]);
    Ok(())
}

#[test]
fn test_dominator_tree_graph() -> Result<()> {
    let graph = loop_graph();
    let info = DominatorInfo::new(&graph, graph.node_id("1")?)?;
    let tree = info.to_tree();

    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.edge_count(), 3);
    assert!(is_tree(&tree));
    let two = tree.node_id("2")?;
    assert_eq!(tree.out_degree(two), 2);

    let expected = build(true, &[("1", "2"), ("2", "3"), ("2", "4")]);
    assert_eq!(tree, expected);
    assert!(!tree.structurally_eq(&graph));
    Ok(())
}

#[test]
fn test_if_statement_tree_is_flat() -> Result<()> {
    let graph = if_statement();
    let tree = DominatorInfo::new(&graph, graph.node_id("1")?)?.to_tree();
    let expected = build(true, &[("1", "2"), ("1", "3"), ("1", "4")]);
    assert!(tree.structurally_eq(&expected));
    Ok(())
}

#[test]
fn test_undirected_graph_is_rejected() {
    let graph = build(false, &[("1", "2"), ("2", "3")]);
    let entry = graph.node_id("1").unwrap();
    assert!(matches!(
        DominatorInfo::new(&graph, entry),
        Err(Error::InvalidArgument(_))
    ));
}

/// Checks every dominance relation and frontier against their definitions.
fn assert_matches_definition(graph: &Graph, entry: NodeId) -> Result<()> {
    let info = DominatorInfo::new(graph, entry)?;
    let reachable = reachable_avoiding(graph, entry, None);
    assert_eq!(info.reachable_nodes().len(), reachable.len());

    for &d in &reachable {
        let without_d = reachable_avoiding(graph, entry, Some(d));
        for &n in &reachable {
            // d dominates n iff removing d cuts n off from the entry
            let expected = d == n || !without_d.contains(&n);
            assert_eq!(info.dominates(d, n), expected);
        }
    }

    for &d in &reachable {
        let expected: HashSet<NodeId> = reachable
            .iter()
            .copied()
            .filter(|&n| {
                graph
                    .predecessors(n)
                    .any(|p| reachable.contains(&p) && info.dominates(d, p))
                    && !info.strictly_dominates(d, n)
            })
            .collect();
        assert_eq!(info.frontier(d), Some(&expected));
    }

    for &n in &reachable {
        let idom = info.immediate_dominator(n).unwrap();
        if n == entry {
            assert_eq!(idom, entry);
        } else {
            assert!(info.strictly_dominates(idom, n));
            // Every other strict dominator also dominates the immediate one
            for &d in &reachable {
                if info.strictly_dominates(d, n) {
                    assert!(info.dominates(d, idom));
                }
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_random_graphs_match_definition(shape in arb_graph(true, 12)) {
        let graph = shape.build();
        let entry = graph.node_id("n0").unwrap();
        assert_matches_definition(&graph, entry).unwrap();
    }
}

#[test]
fn test_irreducible_loop() -> Result<()> {
    // Two entries into the 2 <-> 3 cycle
    let graph = build(true, &[("1", "2"), ("1", "3"), ("2", "3"), ("3", "2"), ("3", "4")]);
    let one = graph.node_id("1")?;
    let info = DominatorInfo::new(&graph, one)?;

    assert_eq!(info.immediate_dominator(graph.node_id("2")?), Some(one));
    assert_eq!(info.immediate_dominator(graph.node_id("3")?), Some(one));
    assert!(info.loop_headers().is_empty());
    assert_matches_definition(&graph, one)
}

#[test]
fn test_unreachable_nodes_are_ignored() -> Result<()> {
    let graph = build(true, &[("1", "2"), ("3", "2")]);
    let info = DominatorInfo::new(&graph, graph.node_id("1")?)?;
    let three = graph.node_id("3")?;

    assert!(!info.is_reachable(three));
    assert_eq!(info.immediate_dominator(three), None);
    assert_eq!(info.frontier(three), None);
    assert!(info.dominated_by(three).is_empty());
    assert_eq!(
        info.immediate_dominator(graph.node_id("2")?),
        Some(graph.node_id("1")?)
    );
    Ok(())
}

#[test]
fn test_foreign_entry() {
    let graph = if_statement();
    let other = if_statement();
    let foreign = other.node_id("1").unwrap();
    assert!(matches!(
        DominatorInfo::new(&graph, foreign),
        Err(Error::InvalidArgument(_))
    ));
}

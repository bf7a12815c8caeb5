//! Searches built on top of a walk.

use std::collections::HashSet;

use crate::{
    graph::{Graph, NodeId},
    traversal::{Decision, Traversal},
    Result,
};

/// Collects every node reachable from `start`, including `start` itself.
///
/// # Errors
///
/// Fails if `start` does not resolve to a live node of `graph`.
pub fn reachable_nodes(
    graph: &Graph,
    start: NodeId,
    traversal: &Traversal,
) -> Result<HashSet<NodeId>> {
    Ok(traversal
        .walk(graph, start)?
        .filter(|visit| visit.first)
        .map(|visit| visit.node)
        .collect())
}

/// Returns the first node, in the traversal's discovery order, that satisfies `predicate`.
///
/// The walk is aborted as soon as a match is found.
///
/// # Errors
///
/// Fails if `start` does not resolve to a live node of `graph`.
pub fn search<P>(
    graph: &Graph,
    start: NodeId,
    traversal: &Traversal,
    mut predicate: P,
) -> Result<Option<NodeId>>
where
    P: FnMut(NodeId) -> bool,
{
    let mut walk = traversal.walk(graph, start)?;
    while let Some(visit) = walk.next_visit() {
        if visit.first && predicate(visit.node) {
            walk.decide(Decision::Abort);
            return Ok(Some(visit.node));
        }
    }
    Ok(None)
}

/// [`search`] with a breadth-first traversal: finds a matching node closest to `start`.
///
/// # Errors
///
/// Fails if `start` does not resolve to a live node of `graph`.
pub fn breadth_first_search<P>(graph: &Graph, start: NodeId, predicate: P) -> Result<Option<NodeId>>
where
    P: FnMut(NodeId) -> bool,
{
    search(graph, start, &Traversal::breadth_first(), predicate)
}

/// [`search`] with a depth-first traversal.
///
/// # Errors
///
/// Fails if `start` does not resolve to a live node of `graph`.
pub fn depth_first_search<P>(graph: &Graph, start: NodeId, predicate: P) -> Result<Option<NodeId>>
where
    P: FnMut(NodeId) -> bool,
{
    search(graph, start, &Traversal::depth_first(), predicate)
}

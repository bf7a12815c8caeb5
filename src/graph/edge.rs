//! Edge identifier.
//!
//! This module provides the [`EdgeId`] type, a strongly-typed identifier for edges within
//! a [`Graph`](crate::graph::Graph). Like [`NodeId`](crate::graph::NodeId) it carries the
//! identity of its owning graph next to a dense slot index.

use std::fmt;

use crate::graph::GraphId;

/// A strongly-typed identifier for edges within a graph.
///
/// Edge IDs are assigned sequentially starting from 0 when edges are added. A removed edge
/// leaves its slot empty, so the ids of the remaining edges stay valid.
///
/// # Examples
///
/// ```rust
/// use graphscope::graph::Graph;
///
/// let mut graph = Graph::directed();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let edge = graph.add_edge(a, b).unwrap();
///
/// assert_eq!(graph.endpoints(edge).unwrap(), (a, b));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    pub(crate) graph: GraphId,
    pub(crate) index: usize,
}

impl EdgeId {
    #[must_use]
    #[inline]
    pub(crate) const fn new(graph: GraphId, index: usize) -> Self {
        EdgeId { graph, index }
    }

    /// Returns the raw slot index of this edge identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns the identity of the graph this edge was created in.
    #[must_use]
    #[inline]
    pub const fn graph(self) -> GraphId {
        self.graph
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.index)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.index)
    }
}

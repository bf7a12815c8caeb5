//! Node and graph identifiers.
//!
//! This module provides [`NodeId`], a strongly-typed identifier for nodes within a
//! [`Graph`](crate::graph::Graph), and [`GraphId`], the process-unique identity of the graph
//! arena a node lives in. A node id is a pair of both: the owning graph and a dense slot
//! index. Resolving an id against a graph is therefore enough to decide whether the node
//! belongs to that graph.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a graph arena.
///
/// Every [`Graph`](crate::graph::Graph), including graphs derived through
/// [`transpose`](crate::graph::Graph::transpose) or
/// [`to_undirected`](crate::graph::Graph::to_undirected), receives a fresh `GraphId`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphId(u64);

impl GraphId {
    /// Allocates the next unused graph identity.
    pub(crate) fn fresh() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value of this identity.
    #[must_use]
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphId({})", self.0)
    }
}

/// A strongly-typed identifier for nodes within a graph.
///
/// `NodeId` pairs the [`GraphId`] of its owning arena with a 0-based slot index. Slot
/// indices are assigned sequentially when nodes are added and are never reused, so the
/// index can be used to address dense per-node vectors sized by
/// [`Graph::node_bound`](crate::graph::Graph::node_bound).
///
/// # Usage
///
/// Node IDs are created by [`Graph::add_node`](crate::graph::Graph::add_node) and cannot be
/// constructed outside the crate. They are used to:
///
/// - Reference nodes when adding edges
/// - Look up names and annotations
/// - Query adjacency relationships
/// - Key analysis results
///
/// # Examples
///
/// ```rust
/// use graphscope::graph::Graph;
/// use std::collections::HashMap;
///
/// let mut graph = Graph::directed();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// assert_ne!(a, b);
///
/// let mut data = HashMap::new();
/// data.insert(a, 42);
/// ```
///
/// # Thread Safety
///
/// `NodeId` is [`Copy`], [`Send`], and [`Sync`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) graph: GraphId,
    pub(crate) index: usize,
}

impl NodeId {
    /// Creates a new `NodeId` for slot `index` of the graph identified by `graph`.
    #[must_use]
    #[inline]
    pub(crate) const fn new(graph: GraphId, index: usize) -> Self {
        NodeId { graph, index }
    }

    /// Returns the raw slot index of this node identifier.
    ///
    /// The index is a 0-based position that can be used to index into vectors that store
    /// per-node data.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns the identity of the graph this node was created in.
    #[must_use]
    #[inline]
    pub const fn graph(self) -> GraphId {
        self.graph
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index)
    }
}

impl From<NodeId> for usize {
    /// Extracts the raw slot index from a `NodeId`.
    #[inline]
    fn from(node: NodeId) -> Self {
        node.index
    }
}

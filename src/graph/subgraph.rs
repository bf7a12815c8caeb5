//! Named groupings of nodes.
//!
//! A [`SubGraph`] is a labelled set of nodes of one graph with its own annotations. It does
//! not own nodes or edges; removing a node from the graph removes it from every sub-graph.

use std::{collections::BTreeSet, fmt};

use crate::graph::{Annotations, GraphId, NodeId};

/// Identifier of a [`SubGraph`] within its owning graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubGraphId {
    pub(crate) graph: GraphId,
    pub(crate) index: usize,
}

impl SubGraphId {
    pub(crate) const fn new(graph: GraphId, index: usize) -> Self {
        SubGraphId { graph, index }
    }

    /// Returns the raw slot index of this sub-graph.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl fmt::Debug for SubGraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubGraphId({})", self.index)
    }
}

/// A named set of nodes belonging to one graph.
#[derive(Debug, Clone)]
pub struct SubGraph {
    name: String,
    members: BTreeSet<NodeId>,
    annotations: Annotations,
}

impl SubGraph {
    pub(crate) fn new(name: String) -> Self {
        SubGraph {
            name,
            members: BTreeSet::new(),
            annotations: Annotations::new(),
        }
    }

    /// The unique name of this sub-graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member nodes in slot order.
    pub fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }

    /// Returns `true` if `node` is a member.
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the sub-graph has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Annotations attached to the sub-graph itself.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Mutable access to the sub-graph annotations.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    pub(crate) fn insert(&mut self, node: NodeId) -> bool {
        self.members.insert(node)
    }

    pub(crate) fn remove(&mut self, node: NodeId) -> bool {
        self.members.remove(&node)
    }
}

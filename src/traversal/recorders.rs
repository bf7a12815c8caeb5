//! Recorders: fold-style observers of a walk.
//!
//! Each recorder consumes the [`Visit`] stream of a [`Walk`](crate::traversal::Walk) and
//! builds one derived structure from it. Recorders only look at first visits; revisits
//! carry no information they need.
//!
//! - [`ParentRecorder`] - spanning forest of the walk
//! - [`OrderRecorder`] - discovery order and discovery indices
//! - [`PostOrderRecorder`] - recursive depth-first postorder, rebuilt without recursion

use std::collections::HashMap;

use crate::{
    error::invalid_operation,
    graph::{EdgeId, NodeId},
    traversal::{Recorder, Visit},
    Result,
};

/// Remembers, for every discovered node, the edge it was first reached through.
///
/// The recorded edges form a spanning forest of the walked part of the graph.
#[derive(Debug, Clone, Default)]
pub struct ParentRecorder {
    parents: HashMap<NodeId, Option<(EdgeId, NodeId)>>,
}

impl ParentRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The edge `node` was first reached through.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`](crate::Error::InvalidOperation) if `node` is a
    /// root of the walk or was never reached.
    pub fn parent_edge(&self, node: NodeId) -> Result<EdgeId> {
        self.entry(node).map(|(edge, _)| edge)
    }

    /// The node `node` was first reached from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`](crate::Error::InvalidOperation) if `node` is a
    /// root of the walk or was never reached.
    pub fn parent(&self, node: NodeId) -> Result<NodeId> {
        self.entry(node).map(|(_, parent)| parent)
    }

    fn entry(&self, node: NodeId) -> Result<(EdgeId, NodeId)> {
        match self.parents.get(&node) {
            Some(Some(entry)) => Ok(*entry),
            Some(None) => Err(invalid_operation!(
                "node {} is a root of the traversal and has no parent",
                node
            )),
            None => Err(invalid_operation!(
                "node {} was not reached by the traversal",
                node
            )),
        }
    }

    /// Returns `true` if the walk reached `node`.
    pub fn contains(&self, node: NodeId) -> bool {
        self.parents.contains_key(&node)
    }
}

impl Recorder for ParentRecorder {
    fn observe(&mut self, visit: &Visit) {
        if !visit.first {
            return;
        }
        let entry = visit.origin.zip(visit.parent);
        self.parents.entry(visit.node).or_insert(entry);
    }
}

/// Assigns each discovered node a monotonically increasing index.
#[derive(Debug, Clone, Default)]
pub struct OrderRecorder {
    indices: HashMap<NodeId, usize>,
    order: Vec<NodeId>,
}

impl OrderRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovery index of `node`, or `None` if the walk never reached it.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.indices.get(&node).copied()
    }

    /// All discovered nodes in discovery order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Number of discovered nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing has been discovered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the recorder, returning the discovery order.
    pub fn into_order(self) -> Vec<NodeId> {
        self.order
    }
}

impl Recorder for OrderRecorder {
    fn observe(&mut self, visit: &Visit) {
        if self.indices.contains_key(&visit.node) {
            return;
        }
        self.indices.insert(visit.node, self.order.len());
        self.order.push(visit.node);
    }
}

/// Rebuilds recursive depth-first postorder from the visits of an iterative walk.
///
/// Open nodes are kept on a shadow stack. When a node is discovered through an edge, every
/// node above the edge's source on the stack has no unexplored children left and is
/// finished. Roots and walk completion flush the whole stack.
///
/// Meant for depth-first walks; fed a breadth-first walk it still yields every node once,
/// but not in postorder.
///
/// # Examples
///
/// ```rust
/// use graphscope::graph::Graph;
/// use graphscope::traversal::{PostOrderRecorder, Traversal};
///
/// let mut graph = Graph::directed();
/// graph.add_edge_by_name("A", "B");
/// graph.add_edge_by_name("B", "C");
/// let a = graph.node_id("A").unwrap();
///
/// let mut recorder = PostOrderRecorder::new();
/// Traversal::depth_first().run(&graph, a, &mut [&mut recorder]).unwrap();
///
/// let names: Vec<&str> = recorder.order().iter().map(|&n| graph.name(n).unwrap()).collect();
/// assert_eq!(names, vec!["C", "B", "A"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostOrderRecorder {
    stack: Vec<NodeId>,
    order: Vec<NodeId>,
}

impl PostOrderRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished nodes in postorder.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Consumes the recorder, returning the postorder.
    pub fn into_order(self) -> Vec<NodeId> {
        self.order
    }

    fn flush(&mut self) {
        while let Some(node) = self.stack.pop() {
            self.order.push(node);
        }
    }
}

impl Recorder for PostOrderRecorder {
    fn observe(&mut self, visit: &Visit) {
        if !visit.first {
            return;
        }

        match visit.parent {
            None => self.flush(),
            Some(parent) => {
                while let Some(&top) = self.stack.last() {
                    if top == parent {
                        break;
                    }
                    self.stack.pop();
                    self.order.push(top);
                }
            }
        }

        self.stack.push(visit.node);
    }

    fn complete(&mut self) {
        self.flush();
    }
}

//! Core graph implementation.
//!
//! This module provides [`Graph`], the arena every analysis in the crate operates on. Nodes
//! and edges live in dense slot vectors owned by the graph and are referenced through
//! [`NodeId`] and [`EdgeId`]. Both ids carry the [`GraphId`] of the arena that created them,
//! so an id handed to the wrong graph is detected instead of silently aliasing another node.
//!
//! Directedness is fixed at construction. A directed node keeps separate outgoing and
//! incoming edge lists; an undirected node keeps one list of incident edges which serves as
//! both.

use std::collections::{BTreeSet, HashMap};

use crate::{
    error::{invalid_argument, invalid_operation, not_found},
    graph::{Annotations, EdgeId, GraphId, NodeId, SubGraph, SubGraphId},
    Result,
};

/// Adjacency storage of a single node.
#[derive(Debug, Clone)]
enum Adjacency {
    Directed {
        outgoing: Vec<EdgeId>,
        incoming: Vec<EdgeId>,
    },
    Undirected {
        incident: Vec<EdgeId>,
    },
}

impl Adjacency {
    fn new(directed: bool) -> Self {
        if directed {
            Adjacency::Directed {
                outgoing: Vec::new(),
                incoming: Vec::new(),
            }
        } else {
            Adjacency::Undirected {
                incident: Vec::new(),
            }
        }
    }

    fn outgoing(&self) -> &[EdgeId] {
        match self {
            Adjacency::Directed { outgoing, .. } => outgoing,
            Adjacency::Undirected { incident } => incident,
        }
    }

    fn incoming(&self) -> &[EdgeId] {
        match self {
            Adjacency::Directed { incoming, .. } => incoming,
            Adjacency::Undirected { incident } => incident,
        }
    }

    fn attach_outgoing(&mut self, edge: EdgeId) {
        match self {
            Adjacency::Directed { outgoing, .. } => outgoing.push(edge),
            Adjacency::Undirected { incident } => incident.push(edge),
        }
    }

    fn attach_incoming(&mut self, edge: EdgeId) {
        match self {
            Adjacency::Directed { incoming, .. } => incoming.push(edge),
            Adjacency::Undirected { incident } => incident.push(edge),
        }
    }

    fn detach(&mut self, edge: EdgeId) {
        match self {
            Adjacency::Directed { outgoing, incoming } => {
                outgoing.retain(|&e| e != edge);
                incoming.retain(|&e| e != edge);
            }
            Adjacency::Undirected { incident } => incident.retain(|&e| e != edge),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    annotations: Annotations,
    adjacency: Adjacency,
    /// Slot indices of the sub-graphs this node is a member of
    subgraphs: BTreeSet<usize>,
}

impl NodeData {
    fn new(name: String, annotations: Annotations, directed: bool) -> Self {
        NodeData {
            name,
            annotations,
            adjacency: Adjacency::new(directed),
            subgraphs: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum NodeSlot {
    Live(NodeData),
    /// Tombstone left behind by [`Graph::remove_node`]
    Detached,
}

#[derive(Debug, Clone)]
struct EdgeData {
    source: NodeId,
    target: NodeId,
    annotations: Annotations,
}

/// What is left of a node after it has been removed from its graph.
///
/// The stale [`NodeId`] keeps pointing at an empty slot; inserting an edge on it fails with
/// [`Error::InvalidOperation`](crate::Error::InvalidOperation).
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedNode {
    /// The name the node had in the graph
    pub name: String,
    /// The annotations the node carried
    pub annotations: Annotations,
}

/// A directed or undirected graph of uniquely named nodes.
///
/// `Graph` supports:
///
/// - Unique node names with create-or-get insertion
/// - At most one edge per (source, target) pair; for undirected graphs per unordered pair
/// - Self-loops
/// - Annotations on the graph, its nodes, its edges and its sub-graphs
/// - Node removal, leaving a tombstone so that all other ids stay valid
///
/// # Cloning
///
/// A clone keeps the [`GraphId`] of its source, so ids issued by the source resolve in the
/// clone as well. Derived graphs ([`transpose`](Graph::transpose),
/// [`to_undirected`](Graph::to_undirected)) get a fresh identity instead.
///
/// # Examples
///
/// ```rust
/// use graphscope::graph::Graph;
///
/// let mut graph = Graph::directed();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
///
/// graph.add_edge(a, b).unwrap();
/// graph.add_edge(a, c).unwrap();
///
/// let successors: Vec<_> = graph.successors(a).collect();
/// assert_eq!(successors, vec![b, c]);
///
/// // Inserting the same pair again returns the existing edge
/// let first = graph.edge_between(a, b).unwrap();
/// assert_eq!(graph.add_edge(a, b).unwrap(), first);
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    id: GraphId,
    directed: bool,
    nodes: Vec<NodeSlot>,
    edges: Vec<Option<EdgeData>>,
    names: HashMap<String, usize>,
    /// Edge slot per endpoint pair, ordered for undirected graphs
    pairs: HashMap<(usize, usize), usize>,
    subgraphs: Vec<SubGraph>,
    subgraph_names: HashMap<String, usize>,
    annotations: Annotations,
    node_count: usize,
    edge_count: usize,
}

/// Name-based equality: [`Graph::structurally_eq`] plus equal annotations on the graph, its
/// nodes, its edges and its sub-graphs. Sub-graphs are matched by name and member names.
///
/// Node-valued annotations are compared as stored, so they only match within one graph
/// identity.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other, true)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::directed()
    }
}

impl Graph {
    /// Creates an empty graph with the given directedness.
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Graph {
            id: GraphId::fresh(),
            directed,
            nodes: Vec::new(),
            edges: Vec::new(),
            names: HashMap::new(),
            pairs: HashMap::new(),
            subgraphs: Vec::new(),
            subgraph_names: HashMap::new(),
            annotations: Annotations::new(),
            node_count: 0,
            edge_count: 0,
        }
    }

    /// Creates an empty directed graph.
    #[must_use]
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Creates an empty undirected graph.
    #[must_use]
    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// The identity of this graph arena.
    #[inline]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Returns `true` if edges of this graph have a direction.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Annotations attached to the graph itself.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Mutable access to the graph annotations.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    fn live(&self, node: NodeId) -> Result<&NodeData> {
        if node.graph != self.id {
            return Err(invalid_argument!("node {} belongs to another graph", node));
        }
        match self.nodes.get(node.index) {
            Some(NodeSlot::Live(data)) => Ok(data),
            Some(NodeSlot::Detached) => Err(invalid_operation!(
                "node {} has been removed from the graph",
                node
            )),
            None => Err(not_found!(
                "node {} does not exist in graph with {} slots",
                node,
                self.nodes.len()
            )),
        }
    }

    fn live_mut(&mut self, node: NodeId) -> Result<&mut NodeData> {
        if node.graph != self.id {
            return Err(invalid_argument!("node {} belongs to another graph", node));
        }
        let slots = self.nodes.len();
        match self.nodes.get_mut(node.index) {
            Some(NodeSlot::Live(data)) => Ok(data),
            Some(NodeSlot::Detached) => Err(invalid_operation!(
                "node {} has been removed from the graph",
                node
            )),
            None => Err(not_found!(
                "node {} does not exist in graph with {} slots",
                node,
                slots
            )),
        }
    }

    fn adjacency(&self, node: NodeId) -> Option<&Adjacency> {
        self.live(node).ok().map(|data| &data.adjacency)
    }

    fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| match slot {
                NodeSlot::Live(data) => Some((NodeId::new(self.id, index), data)),
                NodeSlot::Detached => None,
            })
    }

    /// Adds a node named `name`, or returns the existing node with that name.
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&index) = self.names.get(name) {
            return NodeId::new(self.id, index);
        }
        self.push_node(name.to_string(), Annotations::new())
    }

    fn push_node(&mut self, name: String, annotations: Annotations) -> NodeId {
        let index = self.nodes.len();
        self.names.insert(name.clone(), index);
        self.nodes
            .push(NodeSlot::Live(NodeData::new(name, annotations, self.directed)));
        self.node_count += 1;
        NodeId::new(self.id, index)
    }

    /// Looks up a node by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if no node has that name.
    pub fn node_id(&self, name: &str) -> Result<NodeId> {
        self.names
            .get(name)
            .map(|&index| NodeId::new(self.id, index))
            .ok_or_else(|| not_found!("no node named '{}'", name))
    }

    /// Returns the node occupying slot `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the slot is out of range or
    /// its node has been removed.
    pub fn node_at(&self, index: usize) -> Result<NodeId> {
        match self.nodes.get(index) {
            Some(NodeSlot::Live(_)) => Ok(NodeId::new(self.id, index)),
            _ => Err(not_found!("no live node in slot {}", index)),
        }
    }

    /// Returns `true` if `node` resolves to a live node of this graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.live(node).is_ok()
    }

    /// Fails with the same error a lookup of `node` would produce.
    pub(crate) fn ensure_node(&self, node: NodeId) -> Result<()> {
        self.live(node).map(|_| ())
    }

    /// Returns the name of a node.
    ///
    /// # Errors
    ///
    /// Fails if `node` does not resolve to a live node of this graph.
    pub fn name(&self, node: NodeId) -> Result<&str> {
        self.live(node).map(|data| data.name.as_str())
    }

    /// Number of live nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of live edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Upper bound (exclusive) on the slot index of any node of this graph.
    ///
    /// Per-node vectors of this length can be indexed with [`NodeId::index`].
    #[inline]
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no live nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Iterates over all live nodes in slot order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.live_nodes().map(|(id, _)| id)
    }

    /// Removes a node together with every incident edge and every sub-graph membership.
    ///
    /// # Errors
    ///
    /// Fails if `node` does not resolve to a live node of this graph.
    pub fn remove_node(&mut self, node: NodeId) -> Result<DetachedNode> {
        let data = self.live(node)?;
        let incident: BTreeSet<usize> = data
            .adjacency
            .outgoing()
            .iter()
            .chain(data.adjacency.incoming())
            .map(|edge| edge.index)
            .collect();
        let memberships: Vec<usize> = data.subgraphs.iter().copied().collect();

        for edge in incident {
            self.unlink(edge);
        }
        for subgraph in memberships {
            if let Some(subgraph) = self.subgraphs.get_mut(subgraph) {
                subgraph.remove(node);
            }
        }

        let slot = std::mem::replace(&mut self.nodes[node.index], NodeSlot::Detached);
        match slot {
            NodeSlot::Live(data) => {
                self.names.remove(&data.name);
                self.node_count -= 1;
                Ok(DetachedNode {
                    name: data.name,
                    annotations: data.annotations,
                })
            }
            NodeSlot::Detached => Err(invalid_operation!(
                "node {} has been removed from the graph",
                node
            )),
        }
    }

    fn pair_key(&self, source: usize, target: usize) -> (usize, usize) {
        if self.directed || source <= target {
            (source, target)
        } else {
            (target, source)
        }
    }

    /// Appends an edge between two live slots that are not yet connected.
    fn connect(&mut self, source: usize, target: usize, annotations: Annotations) -> EdgeId {
        let id = EdgeId::new(self.id, self.edges.len());
        self.edges.push(Some(EdgeData {
            source: NodeId::new(self.id, source),
            target: NodeId::new(self.id, target),
            annotations,
        }));
        let key = self.pair_key(source, target);
        self.pairs.insert(key, id.index);

        if let Some(NodeSlot::Live(data)) = self.nodes.get_mut(source) {
            data.adjacency.attach_outgoing(id);
        }
        // An undirected self-loop is listed once
        if self.directed || source != target {
            if let Some(NodeSlot::Live(data)) = self.nodes.get_mut(target) {
                data.adjacency.attach_incoming(id);
            }
        }

        self.edge_count += 1;
        id
    }

    fn unlink(&mut self, index: usize) -> Option<EdgeData> {
        let edge = self.edges.get_mut(index)?.take()?;
        let key = self.pair_key(edge.source.index, edge.target.index);
        self.pairs.remove(&key);

        let id = EdgeId::new(self.id, index);
        for endpoint in [edge.source.index, edge.target.index] {
            if let Some(NodeSlot::Live(data)) = self.nodes.get_mut(endpoint) {
                data.adjacency.detach(id);
            }
        }

        self.edge_count -= 1;
        Some(edge)
    }

    /// Adds an edge from `source` to `target`.
    ///
    /// If the pair is already connected (in either orientation for undirected graphs) the
    /// existing edge is returned and the graph is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) if an endpoint belongs to
    ///   another graph
    /// - [`Error::InvalidOperation`](crate::Error::InvalidOperation) if an endpoint has been
    ///   removed
    /// - [`Error::NotFound`](crate::Error::NotFound) if an endpoint slot does not exist
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId> {
        self.live(source)?;
        self.live(target)?;

        if let Some(existing) = self.edge_between(source, target) {
            return Ok(existing);
        }
        Ok(self.connect(source.index, target.index, Annotations::new()))
    }

    /// Adds an edge between two nodes given by name, creating missing nodes.
    pub fn add_edge_by_name(&mut self, source: &str, target: &str) -> EdgeId {
        let source = self.add_node(source);
        let target = self.add_node(target);
        self.link(source, target)
    }

    /// Create-or-get edge between two live nodes issued by this graph.
    pub(crate) fn link(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        debug_assert!(self.live(source).is_ok() && self.live(target).is_ok());
        let key = self.pair_key(source.index, target.index);
        match self.pairs.get(&key) {
            Some(&index) => EdgeId::new(self.id, index),
            None => self.connect(source.index, target.index, Annotations::new()),
        }
    }

    /// Removes an edge.
    ///
    /// # Errors
    ///
    /// Fails if `edge` belongs to another graph or does not exist.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<()> {
        self.edge_data(edge)?;
        self.unlink(edge.index);
        Ok(())
    }

    fn edge_data(&self, edge: EdgeId) -> Result<&EdgeData> {
        if edge.graph != self.id {
            return Err(invalid_argument!("edge {} belongs to another graph", edge));
        }
        self.edges
            .get(edge.index)
            .and_then(Option::as_ref)
            .ok_or_else(|| not_found!("edge {} does not exist", edge))
    }

    fn edge_data_mut(&mut self, edge: EdgeId) -> Result<&mut EdgeData> {
        if edge.graph != self.id {
            return Err(invalid_argument!("edge {} belongs to another graph", edge));
        }
        self.edges
            .get_mut(edge.index)
            .and_then(Option::as_mut)
            .ok_or_else(|| not_found!("edge {} does not exist", edge))
    }

    /// Returns `true` if `edge` resolves to a live edge of this graph.
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edge_data(edge).is_ok()
    }

    /// Returns the edge connecting `source` to `target`, if any.
    ///
    /// For undirected graphs the orientation is ignored.
    pub fn edge_between(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }
        let key = self.pair_key(source.index, target.index);
        self.pairs
            .get(&key)
            .map(|&index| EdgeId::new(self.id, index))
    }

    /// Returns `true` if `source` and `target` are connected by an edge.
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edge_between(source, target).is_some()
    }

    /// Returns the (source, target) pair of an edge, in insertion orientation.
    ///
    /// # Errors
    ///
    /// Fails if `edge` belongs to another graph or does not exist.
    pub fn endpoints(&self, edge: EdgeId) -> Result<(NodeId, NodeId)> {
        self.edge_data(edge).map(|data| (data.source, data.target))
    }

    /// Returns the endpoint of `edge` opposite to `node`.
    ///
    /// For a self-loop this is `node` itself.
    ///
    /// # Errors
    ///
    /// Fails if `edge` does not resolve, or with
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `node` is not one of its
    /// endpoints.
    pub fn other_endpoint(&self, edge: EdgeId, node: NodeId) -> Result<NodeId> {
        let data = self.edge_data(edge)?;
        if data.source == node {
            Ok(data.target)
        } else if data.target == node {
            Ok(data.source)
        } else {
            Err(invalid_argument!("node {} is not an endpoint of edge {}", node, edge))
        }
    }

    /// Iterates over all live edges in slot order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(move |(index, _)| EdgeId::new(self.id, index))
    }

    /// Edges leaving `node`, in insertion order. For undirected graphs these are all
    /// incident edges. Unknown nodes have no edges.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacency(node)
            .map_or(&[][..], Adjacency::outgoing)
            .iter()
            .copied()
    }

    /// Edges entering `node`, in insertion order. For undirected graphs these are all
    /// incident edges. Unknown nodes have no edges.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacency(node)
            .map_or(&[][..], Adjacency::incoming)
            .iter()
            .copied()
    }

    fn opposite(&self, edge: EdgeId, node: NodeId) -> Option<NodeId> {
        let data = self.edges.get(edge.index)?.as_ref()?;
        Some(if data.source == node {
            data.target
        } else {
            data.source
        })
    }

    /// Nodes reachable from `node` over one outgoing edge, in edge insertion order.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing_edges(node)
            .filter_map(move |edge| self.opposite(edge, node))
    }

    /// Nodes with an edge into `node`, in edge insertion order.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming_edges(node)
            .filter_map(move |edge| self.opposite(edge, node))
    }

    /// Distinct nodes adjacent to `node` in either direction, in order of first appearance.
    pub fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        let mut seen = BTreeSet::new();
        let mut result = Vec::new();
        let incoming = if self.directed {
            Some(self.predecessors(node))
        } else {
            None
        };
        for other in self.successors(node).chain(incoming.into_iter().flatten()) {
            if seen.insert(other) {
                result.push(other);
            }
        }
        result
    }

    /// Number of outgoing edges; for undirected graphs the number of incident edges.
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.adjacency(node).map_or(0, |adj| adj.outgoing().len())
    }

    /// Number of incoming edges; for undirected graphs the number of incident edges.
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.adjacency(node).map_or(0, |adj| adj.incoming().len())
    }

    /// Annotations of a node.
    ///
    /// # Errors
    ///
    /// Fails if `node` does not resolve to a live node of this graph.
    pub fn node_annotations(&self, node: NodeId) -> Result<&Annotations> {
        self.live(node).map(|data| &data.annotations)
    }

    /// Mutable annotations of a node.
    ///
    /// # Errors
    ///
    /// Fails if `node` does not resolve to a live node of this graph.
    pub fn node_annotations_mut(&mut self, node: NodeId) -> Result<&mut Annotations> {
        self.live_mut(node).map(|data| &mut data.annotations)
    }

    /// Annotations of an edge.
    ///
    /// # Errors
    ///
    /// Fails if `edge` does not resolve to a live edge of this graph.
    pub fn edge_annotations(&self, edge: EdgeId) -> Result<&Annotations> {
        self.edge_data(edge).map(|data| &data.annotations)
    }

    /// Mutable annotations of an edge.
    ///
    /// # Errors
    ///
    /// Fails if `edge` does not resolve to a live edge of this graph.
    pub fn edge_annotations_mut(&mut self, edge: EdgeId) -> Result<&mut Annotations> {
        self.edge_data_mut(edge).map(|data| &mut data.annotations)
    }

    /// Adds a sub-graph named `name`, or returns the existing one.
    pub fn add_subgraph(&mut self, name: &str) -> SubGraphId {
        if let Some(&index) = self.subgraph_names.get(name) {
            return SubGraphId::new(self.id, index);
        }
        let index = self.subgraphs.len();
        self.subgraphs.push(SubGraph::new(name.to_string()));
        self.subgraph_names.insert(name.to_string(), index);
        SubGraphId::new(self.id, index)
    }

    /// Looks up a sub-graph by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if no sub-graph has that name.
    pub fn subgraph_id(&self, name: &str) -> Result<SubGraphId> {
        self.subgraph_names
            .get(name)
            .map(|&index| SubGraphId::new(self.id, index))
            .ok_or_else(|| not_found!("no sub-graph named '{}'", name))
    }

    /// Iterates over all sub-graphs in creation order.
    pub fn subgraph_ids(&self) -> impl Iterator<Item = SubGraphId> + '_ {
        (0..self.subgraphs.len()).map(move |index| SubGraphId::new(self.id, index))
    }

    /// Returns a sub-graph.
    ///
    /// # Errors
    ///
    /// Fails if `subgraph` belongs to another graph or does not exist.
    pub fn subgraph(&self, subgraph: SubGraphId) -> Result<&SubGraph> {
        if subgraph.graph != self.id {
            return Err(invalid_argument!("{:?} belongs to another graph", subgraph));
        }
        self.subgraphs
            .get(subgraph.index)
            .ok_or_else(|| not_found!("{:?} does not exist", subgraph))
    }

    /// Returns a sub-graph for mutation of its annotations.
    ///
    /// # Errors
    ///
    /// Fails if `subgraph` belongs to another graph or does not exist.
    pub fn subgraph_mut(&mut self, subgraph: SubGraphId) -> Result<&mut SubGraph> {
        if subgraph.graph != self.id {
            return Err(invalid_argument!("{:?} belongs to another graph", subgraph));
        }
        self.subgraphs
            .get_mut(subgraph.index)
            .ok_or_else(|| not_found!("{:?} does not exist", subgraph))
    }

    /// Adds `node` to a sub-graph. Returns `false` if it already was a member.
    ///
    /// # Errors
    ///
    /// Fails if either id does not resolve in this graph.
    pub fn add_to_subgraph(&mut self, subgraph: SubGraphId, node: NodeId) -> Result<bool> {
        self.subgraph(subgraph)?;
        self.live_mut(node)?.subgraphs.insert(subgraph.index);
        Ok(self.subgraph_mut(subgraph)?.insert(node))
    }

    /// Removes `node` from a sub-graph. Returns `false` if it was not a member.
    ///
    /// # Errors
    ///
    /// Fails if either id does not resolve in this graph.
    pub fn remove_from_subgraph(&mut self, subgraph: SubGraphId, node: NodeId) -> Result<bool> {
        self.subgraph(subgraph)?;
        self.live_mut(node)?.subgraphs.remove(&subgraph.index);
        Ok(self.subgraph_mut(subgraph)?.remove(node))
    }

    /// Sub-graphs `node` is a member of.
    ///
    /// # Errors
    ///
    /// Fails if `node` does not resolve to a live node of this graph.
    pub fn subgraphs_of(&self, node: NodeId) -> Result<Vec<SubGraphId>> {
        Ok(self
            .live(node)?
            .subgraphs
            .iter()
            .map(|&index| SubGraphId::new(self.id, index))
            .collect())
    }

    /// Compares two graphs by node names and edge endpoints alone.
    ///
    /// Graph identities, slot layout, annotations and sub-graphs play no role, so a graph
    /// rebuilt from the same names compares equal. Undirected edges match in either
    /// orientation. Use `==` to compare annotations and sub-graphs as well.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphscope::graph::Graph;
    ///
    /// let mut first = Graph::undirected();
    /// first.add_edge_by_name("a", "b");
    /// let mut second = Graph::undirected();
    /// second.add_edge_by_name("b", "a");
    ///
    /// assert!(first.structurally_eq(&second));
    /// ```
    pub fn structurally_eq(&self, other: &Graph) -> bool {
        self.matches(other, false)
    }

    fn matches(&self, other: &Graph, annotated: bool) -> bool {
        if self.directed != other.directed
            || self.node_count != other.node_count
            || self.edge_count != other.edge_count
        {
            return false;
        }

        // Slot in `other` per slot in `self`; names are unique, so this is a bijection
        let mut counterpart = HashMap::with_capacity(self.node_count);
        for (id, data) in self.live_nodes() {
            let Some(&index) = other.names.get(&data.name) else {
                return false;
            };
            if annotated {
                match other.nodes.get(index) {
                    Some(NodeSlot::Live(theirs)) if theirs.annotations == data.annotations => {}
                    _ => return false,
                }
            }
            counterpart.insert(id.index, index);
        }

        let edges_match = self.edges.iter().flatten().all(|edge| {
            let (Some(&source), Some(&target)) = (
                counterpart.get(&edge.source.index),
                counterpart.get(&edge.target.index),
            ) else {
                return false;
            };
            let theirs = other
                .pairs
                .get(&other.pair_key(source, target))
                .and_then(|&index| other.edges.get(index))
                .and_then(Option::as_ref);
            match theirs {
                Some(theirs) => !annotated || theirs.annotations == edge.annotations,
                None => false,
            }
        });
        if !edges_match {
            return false;
        }

        !annotated || (self.annotations == other.annotations && self.subgraphs_match(other))
    }

    fn subgraphs_match(&self, other: &Graph) -> bool {
        if self.subgraphs.len() != other.subgraphs.len() {
            return false;
        }
        let member_names = |graph: &Graph, subgraph: &SubGraph| -> BTreeSet<String> {
            subgraph
                .members()
                .filter_map(|node| graph.name(node).ok().map(str::to_string))
                .collect()
        };
        self.subgraphs.iter().all(|ours| {
            let Some(theirs) = other
                .subgraph_names
                .get(ours.name())
                .and_then(|&index| other.subgraphs.get(index))
            else {
                return false;
            };
            ours.annotations() == theirs.annotations()
                && member_names(self, ours) == member_names(other, theirs)
        })
    }

    /// Copies nodes (names, annotations, tombstones) slot for slot and re-inserts every edge.
    fn derive(&self, directed: bool, reverse: bool) -> Graph {
        let mut graph = Graph::new(directed);
        graph.annotations = self.annotations.clone();

        for slot in &self.nodes {
            match slot {
                NodeSlot::Live(data) => {
                    graph.push_node(data.name.clone(), data.annotations.clone());
                }
                NodeSlot::Detached => graph.nodes.push(NodeSlot::Detached),
            }
        }

        for slot in &self.edges {
            let Some(edge) = slot else {
                graph.edges.push(None);
                continue;
            };
            let (source, target) = if reverse {
                (edge.target.index, edge.source.index)
            } else {
                (edge.source.index, edge.target.index)
            };
            if graph.pairs.contains_key(&graph.pair_key(source, target)) {
                graph.edges.push(None);
                continue;
            }
            graph.connect(source, target, edge.annotations.clone());
        }

        graph
    }

    /// Returns a copy of this graph with every edge reversed.
    ///
    /// Node slots are preserved: `transposed.node_at(n.index())` is the counterpart of `n`,
    /// and edge slots keep their indices. The result has a fresh [`GraphId`]. Sub-graphs are
    /// not copied. Transposing an undirected graph yields an equivalent undirected copy.
    #[must_use]
    pub fn transpose(&self) -> Graph {
        self.derive(self.directed, self.directed)
    }

    /// Returns the undirected projection of this graph.
    ///
    /// Node slots are preserved; antiparallel edge pairs collapse into a single edge. The
    /// result has a fresh [`GraphId`]. Sub-graphs are not copied.
    #[must_use]
    pub fn to_undirected(&self) -> Graph {
        self.derive(false, false)
    }

    /// Copies every node and edge of `other` into this graph, prefixing node names.
    ///
    /// Returns the mapping from `other`'s node ids to the new ids in this graph. Annotations
    /// are copied; sub-graphs are not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the graphs differ
    /// in directedness or if a prefixed name already exists here. The graph is unchanged on
    /// error.
    pub fn disjoint_union_with(
        &mut self,
        other: &Graph,
        prefix: &str,
    ) -> Result<HashMap<NodeId, NodeId>> {
        if self.directed != other.directed {
            return Err(invalid_argument!(
                "cannot unite a directed and an undirected graph"
            ));
        }
        for (_, data) in other.live_nodes() {
            let name = format!("{prefix}{}", data.name);
            if self.names.contains_key(&name) {
                return Err(invalid_argument!(
                    "node name '{}' already exists in the target graph",
                    name
                ));
            }
        }

        let mut mapping = HashMap::with_capacity(other.node_count);
        for (id, data) in other.live_nodes() {
            let copy = self.push_node(format!("{prefix}{}", data.name), data.annotations.clone());
            mapping.insert(id, copy);
        }
        for edge in other.edges.iter().flatten() {
            if let (Some(source), Some(target)) =
                (mapping.get(&edge.source), mapping.get(&edge.target))
            {
                self.connect(source.index, target.index, edge.annotations.clone());
            }
        }

        Ok(mapping)
    }
}

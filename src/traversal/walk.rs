//! Pull-based breadth-first and depth-first walks.
//!
//! A [`Walk`] hands out one [`Visit`] per arrival at a node. After receiving a visit the
//! consumer may answer it with a [`Decision`]; a visit left unanswered takes its default
//! decision when the next one is requested. Nothing is expanded ahead of the consumer, so
//! aborting or skipping a subtree is free.
//!
//! # Visits and revisits
//!
//! Every edge followed produces a visit, including edges leading back to nodes the walk
//! has already seen. [`Visit::first`] tells the two apart. By default a first visit
//! expands the node and a revisit does not; in revisiting mode every visit expands.
//!
//! # Complexity
//!
//! - Time: O(V + E) for a full non-revisiting walk
//! - Space: O(V + E) for the visited set and frontier

use std::collections::VecDeque;

use crate::{
    error::invalid_operation,
    graph::{EdgeId, Graph, NodeId},
    traversal::{Recorder, TraversalConfig, TraversalOrder},
    Result,
};

/// The consumer's answer to a [`Visit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Enqueue the neighbours of the visited node
    Continue,
    /// Do not enqueue the neighbours of the visited node
    SkipChildren,
    /// Stop the walk; no further visits are produced
    Abort,
}

/// Lifecycle of a [`Walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkStatus {
    /// Visits may still be produced
    Running,
    /// The frontier ran empty
    Completed,
    /// The consumer answered [`Decision::Abort`]
    Aborted,
}

/// A single arrival at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Visit {
    /// The node arrived at
    pub node: NodeId,
    /// The edge followed to get here; `None` for a root
    pub origin: Option<EdgeId>,
    /// The node the edge was followed from; `None` for a root
    pub parent: Option<NodeId>,
    /// Number of edges followed from the root
    pub depth: usize,
    /// `true` if the walk has not arrived at this node before
    pub first: bool,
}

impl Visit {
    /// Returns `true` if this visit starts a new tree of the walk.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.origin.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    node: NodeId,
    origin: Option<EdgeId>,
    parent: Option<NodeId>,
    depth: usize,
}

impl Pending {
    fn root(node: NodeId) -> Self {
        Pending {
            node,
            origin: None,
            parent: None,
            depth: 0,
        }
    }
}

/// Factory for walks with a fixed [`TraversalConfig`].
///
/// # Examples
///
/// ```rust
/// use graphscope::graph::Graph;
/// use graphscope::traversal::Traversal;
///
/// let mut graph = Graph::directed();
/// graph.add_edge_by_name("1", "2");
/// graph.add_edge_by_name("2", "3");
/// let start = graph.node_id("1").unwrap();
///
/// let depths: Vec<usize> = Traversal::breadth_first()
///     .walk(&graph, start)
///     .unwrap()
///     .filter(|visit| visit.first)
///     .map(|visit| visit.depth)
///     .collect();
/// assert_eq!(depths, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Traversal {
    config: TraversalConfig,
}

impl Traversal {
    /// Creates a traversal with the given configuration.
    #[must_use]
    pub fn new(config: TraversalConfig) -> Self {
        Traversal { config }
    }

    /// Breadth-first traversal expanding every node once.
    #[must_use]
    pub fn breadth_first() -> Self {
        Self::new(TraversalConfig::breadth_first())
    }

    /// Depth-first traversal expanding every node once.
    #[must_use]
    pub fn depth_first() -> Self {
        Self::new(TraversalConfig::depth_first())
    }

    /// Depth-first traversal that expands every arrival.
    #[must_use]
    pub fn revisiting() -> Self {
        Self::new(TraversalConfig::revisiting())
    }

    /// The configuration walks are created with.
    pub fn config(&self) -> TraversalConfig {
        self.config
    }

    /// Starts a walk of `graph` rooted at `start`.
    ///
    /// # Errors
    ///
    /// Fails if `start` does not resolve to a live node of `graph`.
    pub fn walk<'g>(&self, graph: &'g Graph, start: NodeId) -> Result<Walk<'g>> {
        graph.ensure_node(start)?;
        Ok(Walk::new(graph, self.config, start))
    }

    /// Walks the whole reachable subgraph of `start`, feeding every visit to `recorders`.
    ///
    /// # Errors
    ///
    /// Fails if `start` does not resolve to a live node of `graph`.
    pub fn run(
        &self,
        graph: &Graph,
        start: NodeId,
        recorders: &mut [&mut dyn Recorder],
    ) -> Result<WalkStatus> {
        let mut walk = self.walk(graph, start)?;
        Ok(walk.drive(recorders, |_| None))
    }
}

/// An in-progress walk over a graph.
///
/// Created by [`Traversal::walk`]. A walk is also an [`Iterator`] over its visits; plain
/// iteration accepts the default decision for every visit.
pub struct Walk<'g> {
    graph: &'g Graph,
    config: TraversalConfig,
    frontier: VecDeque<Pending>,
    visited: Vec<bool>,
    /// The last visit handed out, expanded lazily once the consumer moves on
    current: Option<Visit>,
    decision: Option<Decision>,
    status: WalkStatus,
}

impl<'g> Walk<'g> {
    fn new(graph: &'g Graph, config: TraversalConfig, start: NodeId) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(Pending::root(start));
        Walk {
            graph,
            config,
            frontier,
            visited: vec![false; graph.node_bound()],
            current: None,
            decision: None,
            status: WalkStatus::Running,
        }
    }

    /// The graph being walked.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Current lifecycle state.
    pub fn status(&self) -> WalkStatus {
        self.status
    }

    /// Returns `true` if the walk has arrived at `node` at least once.
    pub fn is_visited(&self, node: NodeId) -> bool {
        node.graph() == self.graph.id()
            && self.visited.get(node.index()).copied().unwrap_or(false)
    }

    /// Answers the most recent visit. Later answers to the same visit replace earlier ones;
    /// an answer without an outstanding visit is ignored.
    pub fn decide(&mut self, decision: Decision) {
        if self.current.is_some() {
            self.decision = Some(decision);
        }
    }

    /// Produces the next visit, or `None` once the walk has completed or been aborted.
    pub fn next_visit(&mut self) -> Option<Visit> {
        self.settle();
        if self.status != WalkStatus::Running {
            return None;
        }

        let next = match self.config.order {
            TraversalOrder::BreadthFirst => self.frontier.pop_front(),
            TraversalOrder::DepthFirst => self.frontier.pop_back(),
        };
        let Some(pending) = next else {
            self.status = WalkStatus::Completed;
            return None;
        };

        let slot = &mut self.visited[pending.node.index()];
        let first = !*slot;
        *slot = true;

        let visit = Visit {
            node: pending.node,
            origin: pending.origin,
            parent: pending.parent,
            depth: pending.depth,
            first,
        };
        self.current = Some(visit);
        Some(visit)
    }

    fn default_decision(&self, visit: &Visit) -> Decision {
        if visit.first || self.config.revisit {
            Decision::Continue
        } else {
            Decision::SkipChildren
        }
    }

    /// Applies the decision for the outstanding visit, if any.
    fn settle(&mut self) {
        let Some(visit) = self.current.take() else {
            return;
        };
        let decision = self
            .decision
            .take()
            .unwrap_or_else(|| self.default_decision(&visit));

        match decision {
            Decision::Continue => self.expand(&visit),
            Decision::SkipChildren => {}
            Decision::Abort => {
                self.frontier.clear();
                self.status = WalkStatus::Aborted;
            }
        }
    }

    fn expand(&mut self, visit: &Visit) {
        let graph = self.graph;
        let node = visit.node;
        let children = graph.outgoing_edges(node).filter_map(|edge| {
            graph.other_endpoint(edge, node).ok().map(|child| Pending {
                node: child,
                origin: Some(edge),
                parent: Some(node),
                depth: visit.depth + 1,
            })
        });

        match self.config.order {
            TraversalOrder::BreadthFirst => self.frontier.extend(children),
            TraversalOrder::DepthFirst => {
                // Pushed in reverse so the first edge is explored first
                let children: Vec<Pending> = children.collect();
                self.frontier.extend(children.into_iter().rev());
            }
        }
    }

    /// Seeds an exhausted walk with a new root, keeping the visited set.
    ///
    /// Repeated calls turn a walk into a walk over a forest.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOperation`](crate::Error::InvalidOperation) if the walk is still
    ///   running or has been aborted
    /// - Any lookup error for `root`
    pub fn continue_from(&mut self, root: NodeId) -> Result<()> {
        self.settle();
        match self.status {
            WalkStatus::Completed => {}
            WalkStatus::Running if self.frontier.is_empty() => {}
            status => {
                return Err(invalid_operation!(
                    "cannot re-seed a walk in state {:?}",
                    status
                ))
            }
        }
        self.graph.ensure_node(root)?;

        self.frontier.push_back(Pending::root(root));
        self.status = WalkStatus::Running;
        Ok(())
    }

    /// Runs the walk to its end.
    ///
    /// Every visit is shown to each recorder, then to `visitor`, whose answer (if any)
    /// becomes the decision for the visit. Recorders are notified of completion only if the
    /// walk ran out of nodes, not if it was aborted.
    pub fn drive<F>(&mut self, recorders: &mut [&mut dyn Recorder], mut visitor: F) -> WalkStatus
    where
        F: FnMut(&Visit) -> Option<Decision>,
    {
        while let Some(visit) = self.next_visit() {
            for recorder in recorders.iter_mut() {
                recorder.observe(&visit);
            }
            if let Some(decision) = visitor(&visit) {
                self.decide(decision);
            }
        }

        if self.status == WalkStatus::Completed {
            for recorder in recorders.iter_mut() {
                recorder.complete();
            }
        }
        self.status
    }
}

impl Iterator for Walk<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_visit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn create_tree() -> Graph {
        //       A
        //      / \
        //     B   C
        //    / \   \
        //   D   E   F
        let mut graph = Graph::directed();
        graph.add_edge_by_name("A", "B");
        graph.add_edge_by_name("A", "C");
        graph.add_edge_by_name("B", "D");
        graph.add_edge_by_name("B", "E");
        graph.add_edge_by_name("C", "F");
        graph
    }

    fn create_cycle() -> Graph {
        let mut graph = Graph::directed();
        graph.add_edge_by_name("A", "B");
        graph.add_edge_by_name("B", "C");
        graph.add_edge_by_name("C", "A");
        graph
    }

    fn names(graph: &Graph, visits: &[Visit]) -> Vec<String> {
        visits
            .iter()
            .map(|v| graph.name(v.node).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_bfs_order_and_depth() {
        let graph = create_tree();
        let start = graph.node_id("A").unwrap();
        let visits: Vec<Visit> = Traversal::breadth_first()
            .walk(&graph, start)
            .unwrap()
            .collect();

        assert_eq!(names(&graph, &visits), vec!["A", "B", "C", "D", "E", "F"]);
        assert_eq!(
            visits.iter().map(|v| v.depth).collect::<Vec<_>>(),
            vec![0, 1, 1, 2, 2, 2]
        );
        assert!(visits.iter().all(|v| v.first));
        assert!(visits[0].is_root());
        assert_eq!(visits[3].parent, graph.node_id("B").ok());
    }

    #[test]
    fn test_dfs_explores_edges_in_insertion_order() {
        let graph = create_tree();
        let start = graph.node_id("A").unwrap();
        let visits: Vec<Visit> = Traversal::depth_first()
            .walk(&graph, start)
            .unwrap()
            .collect();

        assert_eq!(names(&graph, &visits), vec!["A", "B", "D", "E", "C", "F"]);
        assert_eq!(
            visits.iter().map(|v| v.depth).collect::<Vec<_>>(),
            vec![0, 1, 2, 2, 1, 2]
        );
    }

    #[test]
    fn test_revisits_are_reported_but_not_expanded() {
        let graph = create_cycle();
        let start = graph.node_id("A").unwrap();
        let mut walk = Traversal::depth_first().walk(&graph, start).unwrap();
        let visits: Vec<Visit> = walk.by_ref().collect();

        assert_eq!(names(&graph, &visits), vec!["A", "B", "C", "A"]);
        assert!(!visits[3].first);
        assert_eq!(visits[3].depth, 3);
        assert_eq!(walk.status(), WalkStatus::Completed);
    }

    #[test]
    fn test_skip_children() {
        let graph = create_tree();
        let start = graph.node_id("A").unwrap();
        let b = graph.node_id("B").unwrap();
        let mut walk = Traversal::breadth_first().walk(&graph, start).unwrap();

        let mut seen = Vec::new();
        while let Some(visit) = walk.next_visit() {
            seen.push(visit);
            if visit.node == b {
                walk.decide(Decision::SkipChildren);
            }
        }
        assert_eq!(names(&graph, &seen), vec!["A", "B", "C", "F"]);
        assert_eq!(walk.status(), WalkStatus::Completed);
    }

    #[test]
    fn test_abort_stops_immediately() {
        let graph = create_tree();
        let start = graph.node_id("A").unwrap();
        let mut walk = Traversal::breadth_first().walk(&graph, start).unwrap();

        let mut count = 0;
        while walk.next_visit().is_some() {
            count += 1;
            if count == 2 {
                walk.decide(Decision::Abort);
            }
        }
        assert_eq!(count, 2);
        assert_eq!(walk.status(), WalkStatus::Aborted);
        assert!(walk.next_visit().is_none());
        assert!(matches!(
            walk.continue_from(start),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_revisiting_walk_expands_until_told_otherwise() {
        let graph = create_cycle();
        let start = graph.node_id("A").unwrap();
        let mut walk = Traversal::revisiting().walk(&graph, start).unwrap();

        let mut visits = Vec::new();
        while let Some(visit) = walk.next_visit() {
            visits.push(visit);
            if visits.len() == 7 {
                walk.decide(Decision::SkipChildren);
            }
        }
        // A B C A B C A, then the skipped arrival ends the walk
        assert_eq!(visits.len(), 7);
        assert!(visits[3].node == start && !visits[3].first);
        assert_eq!(walk.status(), WalkStatus::Completed);
    }

    #[test]
    fn test_continue_from_builds_forest() {
        let mut graph = Graph::directed();
        graph.add_edge_by_name("A", "B");
        graph.add_edge_by_name("C", "B");
        let a = graph.node_id("A").unwrap();
        let c = graph.node_id("C").unwrap();

        let mut walk = Traversal::depth_first().walk(&graph, a).unwrap();
        assert_eq!(walk.by_ref().count(), 2);
        assert!(!walk.is_visited(c));

        walk.continue_from(c).unwrap();
        let second: Vec<Visit> = walk.by_ref().collect();
        assert_eq!(second.len(), 2);
        assert!(second[0].is_root());
        assert!(!second[1].first);
        assert!(walk.is_visited(c));
    }

    #[test]
    fn test_undirected_walk_sees_parent_again() {
        let mut graph = Graph::undirected();
        graph.add_edge_by_name("A", "B");
        let a = graph.node_id("A").unwrap();

        let visits: Vec<Visit> = Traversal::breadth_first()
            .walk(&graph, a)
            .unwrap()
            .collect();
        assert_eq!(names(&graph, &visits), vec!["A", "B", "A"]);
        assert_eq!(visits.iter().filter(|v| v.first).count(), 2);
    }

    #[test]
    fn test_invalid_start() {
        let graph = create_tree();
        let other = Graph::directed();
        let start = graph.node_id("A").unwrap();
        assert!(matches!(
            Traversal::breadth_first().walk(&other, start),
            Err(Error::InvalidArgument(_))
        ));
    }
}

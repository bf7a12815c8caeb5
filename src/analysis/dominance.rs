//! Dominance analysis using the Lengauer-Tarjan algorithm.
//!
//! This module computes, for a rooted graph, the dominator tree and everything derived from
//! it: dominance frontiers, dominance queries, back-edges and loop headers.
//!
//! # Theory
//!
//! A node `d` **dominates** a node `n` if every path from the entry node to `n` passes
//! through `d`. The **immediate dominator** of `n` is the unique strict dominator of `n`
//! that every other strict dominator of `n` dominates. Making each node's immediate
//! dominator its parent yields the dominator tree, rooted at the entry.
//!
//! The **dominance frontier** of `d` is the set of nodes `n` such that `d` dominates a
//! predecessor of `n` but does not strictly dominate `n`.
//!
//! # Algorithm
//!
//! Lengauer-Tarjan with path compression and simple linking, O(E log V). Discovery order
//! and the spanning tree come from a depth-first walk through [`OrderRecorder`] and
//! [`ParentRecorder`]; all further work happens in discovery-number space.
//!
//! Nodes not reachable from the entry take no part in dominance and are absent from every
//! result.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::{
    error::invalid_argument,
    graph::{EdgeId, Graph, NodeId},
    traversal::{OrderRecorder, ParentRecorder, Traversal},
    Result,
};

/// Dominator tree, dominance frontiers and loop structure of a rooted graph.
///
/// # Examples
///
/// ```rust
/// use graphscope::analysis::DominatorInfo;
/// use graphscope::graph::Graph;
///
/// // Diamond: entry -> a, entry -> b, a -> exit, b -> exit
/// let mut graph = Graph::directed();
/// graph.add_edge_by_name("entry", "a");
/// graph.add_edge_by_name("entry", "b");
/// graph.add_edge_by_name("a", "exit");
/// graph.add_edge_by_name("b", "exit");
/// let entry = graph.node_id("entry").unwrap();
/// let a = graph.node_id("a").unwrap();
/// let exit = graph.node_id("exit").unwrap();
///
/// let info = DominatorInfo::new(&graph, entry).unwrap();
/// assert_eq!(info.immediate_dominator(exit), Some(entry));
/// assert!(!info.strictly_dominates(a, exit));
/// assert!(info.frontier(a).unwrap().contains(&exit));
/// ```
#[derive(Debug, Clone)]
pub struct DominatorInfo<'g> {
    graph: &'g Graph,
    /// Reachable nodes in discovery order; position 0 is the entry
    nodes: Vec<NodeId>,
    /// Discovery number per reachable node
    numbers: HashMap<NodeId, usize>,
    /// Immediate dominator per discovery number; the entry maps to itself
    idom: Vec<usize>,
    /// Dominator tree children per discovery number
    children: Vec<Vec<usize>>,
    frontiers: Vec<HashSet<NodeId>>,
}

impl<'g> DominatorInfo<'g> {
    /// Runs the analysis for all nodes of `graph` reachable from `entry`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `graph` is undirected
    /// - any lookup error if `entry` does not resolve to a live node of `graph`
    #[instrument(skip(graph))]
    pub fn new(graph: &'g Graph, entry: NodeId) -> Result<Self> {
        if !graph.is_directed() {
            return Err(invalid_argument!(
                "dominance is only defined on directed graphs"
            ));
        }
        let mut order = OrderRecorder::new();
        let mut parents = ParentRecorder::new();
        Traversal::depth_first().run(graph, entry, &mut [&mut order, &mut parents])?;

        let nodes = order.into_order();
        let numbers: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        let spanning_parent: Vec<usize> = nodes
            .iter()
            .map(|&node| {
                parents
                    .parent(node)
                    .ok()
                    .and_then(|p| numbers.get(&p).copied())
                    .unwrap_or(0)
            })
            .collect();
        let predecessors: Vec<Vec<usize>> = nodes
            .iter()
            .map(|&node| {
                graph
                    .predecessors(node)
                    .filter_map(|p| numbers.get(&p).copied())
                    .collect()
            })
            .collect();

        let idom = LengauerTarjan::new(&spanning_parent).compute(&predecessors);

        let mut children = vec![Vec::new(); nodes.len()];
        for (w, &d) in idom.iter().enumerate().skip(1) {
            children[d].push(w);
        }

        let frontiers = dominance_frontiers(&nodes, &idom, &predecessors);

        debug!(
            reachable = nodes.len(),
            nodes = graph.node_count(),
            "dominator tree built"
        );

        Ok(DominatorInfo {
            graph,
            nodes,
            numbers,
            idom,
            children,
            frontiers,
        })
    }

    /// The entry node the analysis was rooted at.
    #[inline]
    pub fn entry(&self) -> NodeId {
        self.nodes[0]
    }

    /// The graph the analysis was computed for.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Returns `true` if `node` is reachable from the entry.
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.numbers.contains_key(&node)
    }

    /// Reachable nodes in depth-first discovery order, starting with the entry.
    pub fn reachable_nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The immediate dominator of `node`.
    ///
    /// The entry is its own immediate dominator. Unreachable nodes have none.
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        let &w = self.numbers.get(&node)?;
        Some(self.nodes[self.idom[w]])
    }

    /// The dominance frontier of `node`, or `None` if `node` is unreachable.
    pub fn frontier(&self, node: NodeId) -> Option<&HashSet<NodeId>> {
        let &w = self.numbers.get(&node)?;
        Some(&self.frontiers[w])
    }

    /// Checks if `a` dominates `b`.
    ///
    /// Every reachable node dominates itself. Unreachable nodes neither dominate nor are
    /// dominated.
    ///
    /// # Complexity
    ///
    /// O(depth) where depth is the depth of `b` in the dominator tree.
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(&a), Some(&b)) = (self.numbers.get(&a), self.numbers.get(&b)) else {
            return false;
        };

        let mut current = b;
        loop {
            if current == a {
                return true;
            }
            if current == 0 {
                return false;
            }
            current = self.idom[current];
        }
    }

    /// Checks if `a` dominates `b` and `a != b`.
    #[inline]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Iterates over the dominators of `node`, from `node` itself up to the entry.
    ///
    /// Empty for unreachable nodes.
    pub fn dominators(&self, node: NodeId) -> DominatorIter<'_, 'g> {
        DominatorIter {
            info: self,
            current: self.numbers.get(&node).copied(),
        }
    }

    /// Depth of `node` in the dominator tree; the entry has depth 0.
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        self.numbers.get(&node)?;
        Some(self.dominators(node).count() - 1)
    }

    /// Nodes whose immediate dominator is `node`, excluding the entry itself.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.numbers
            .get(&node)
            .map(|&w| self.children[w].iter().map(|&c| self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// All nodes dominated by `node`, including `node` itself.
    ///
    /// Empty for unreachable nodes.
    pub fn dominated_by(&self, node: NodeId) -> HashSet<NodeId> {
        let mut result = HashSet::new();
        let Some(&root) = self.numbers.get(&node) else {
            return result;
        };

        let mut agenda = VecDeque::from([root]);
        while let Some(current) = agenda.pop_front() {
            result.insert(self.nodes[current]);
            agenda.extend(self.children[current].iter().copied());
        }
        result
    }

    /// Checks if `edge` is a back-edge, i.e. its target dominates its source.
    ///
    /// # Errors
    ///
    /// Fails if `edge` does not resolve to a live edge of the analysed graph.
    pub fn is_back_edge(&self, edge: EdgeId) -> Result<bool> {
        let (source, target) = self.graph.endpoints(edge)?;
        Ok(self.dominates(target, source))
    }

    /// All back-edges of the analysed graph, in edge order.
    pub fn back_edges(&self) -> Vec<EdgeId> {
        self.graph
            .edge_ids()
            .filter(|&edge| self.is_back_edge(edge).unwrap_or(false))
            .collect()
    }

    /// Checks if `node` is the target of at least one back-edge.
    pub fn is_loop_header(&self, node: NodeId) -> bool {
        self.graph
            .predecessors(node)
            .any(|pred| self.dominates(node, pred))
    }

    /// All loop headers, in discovery order.
    pub fn loop_headers(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .copied()
            .filter(|&node| self.is_loop_header(node))
            .collect()
    }

    /// Materialises the dominator tree as a directed graph.
    ///
    /// The tree contains one node per reachable node, carrying the same name, and an edge
    /// from every immediate dominator to each node it immediately dominates.
    pub fn to_tree(&self) -> Graph {
        let mut tree = Graph::directed();
        let copies: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|&node| tree.add_node(self.graph.name(node).unwrap_or_default()))
            .collect();

        for (w, &d) in self.idom.iter().enumerate().skip(1) {
            tree.link(copies[d], copies[w]);
        }
        tree
    }
}

/// Iterator over the dominators of a node, from the node up to the entry.
pub struct DominatorIter<'a, 'g> {
    info: &'a DominatorInfo<'g>,
    current: Option<usize>,
}

impl Iterator for DominatorIter<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = (current != 0).then(|| self.info.idom[current]);
        Some(self.info.nodes[current])
    }
}

/// Internal state for the Lengauer-Tarjan algorithm.
///
/// Every vertex is identified by its discovery number; vertex 0 is the entry.
struct LengauerTarjan {
    /// Parent in the depth-first spanning tree
    parent: Vec<usize>,
    /// Semidominator
    semi: Vec<usize>,
    /// Ancestor in the link-eval forest
    ancestor: Vec<Option<usize>>,
    /// Vertex with minimal semidominator on the compressed path to the forest root
    best: Vec<usize>,
    /// Vertices whose semidominator is this vertex
    bucket: Vec<Vec<usize>>,
    idom: Vec<usize>,
}

impl LengauerTarjan {
    fn new(parent: &[usize]) -> Self {
        let n = parent.len();
        Self {
            parent: parent.to_vec(),
            semi: (0..n).collect(),
            ancestor: vec![None; n],
            best: (0..n).collect(),
            bucket: vec![Vec::new(); n],
            idom: vec![0; n],
        }
    }

    fn compute(mut self, predecessors: &[Vec<usize>]) -> Vec<usize> {
        let n = self.parent.len();

        for w in (1..n).rev() {
            let parent_w = self.parent[w];

            for &v in &predecessors[w] {
                let u = self.eval(v);
                if self.semi[u] < self.semi[w] {
                    self.semi[w] = self.semi[u];
                }
            }

            let semi_w = self.semi[w];
            self.bucket[semi_w].push(w);
            self.link(parent_w, w);

            let bucket = std::mem::take(&mut self.bucket[parent_w]);
            for v in bucket {
                let u = self.eval(v);
                self.idom[v] = if self.semi[u] < self.semi[v] {
                    u
                } else {
                    parent_w
                };
            }
        }

        for w in 1..n {
            if self.idom[w] != self.semi[w] {
                self.idom[w] = self.idom[self.idom[w]];
            }
        }

        if n > 0 {
            self.idom[0] = 0;
        }
        self.idom
    }

    fn link(&mut self, parent: usize, child: usize) {
        self.ancestor[child] = Some(parent);
    }

    fn eval(&mut self, v: usize) -> usize {
        if self.ancestor[v].is_none() {
            return v;
        }
        self.compress(v);
        self.best[v]
    }

    /// Iterative path compression.
    fn compress(&mut self, v: usize) {
        let mut path = Vec::new();
        let mut current = v;
        while let Some(ancestor) = self.ancestor[current] {
            if self.ancestor[ancestor].is_none() {
                break;
            }
            path.push(current);
            current = ancestor;
        }

        // Topmost first, so every vertex sees its ancestor already compressed
        for &x in path.iter().rev() {
            let Some(ancestor) = self.ancestor[x] else {
                continue;
            };
            if self.semi[self.best[ancestor]] < self.semi[self.best[x]] {
                self.best[x] = self.best[ancestor];
            }
            self.ancestor[x] = self.ancestor[ancestor];
        }
    }
}

/// Computes dominance frontiers in discovery-number space.
///
/// For every join point, each predecessor walks up the dominator tree until it reaches the
/// join point's immediate dominator, adding the join point to the frontier of every vertex
/// passed. The entry is treated as having one extra predecessor outside the graph, so it
/// counts as a join point as soon as it has any predecessor, and walks for it run up to and
/// including the entry.
fn dominance_frontiers(
    nodes: &[NodeId],
    idom: &[usize],
    predecessors: &[Vec<usize>],
) -> Vec<HashSet<NodeId>> {
    let mut frontiers = vec![HashSet::new(); nodes.len()];

    for (w, preds) in predecessors.iter().enumerate() {
        let is_entry = w == 0;
        if preds.len() + usize::from(is_entry) < 2 {
            continue;
        }
        let stop = (!is_entry).then(|| idom[w]);

        for &p in preds {
            let mut runner = p;
            loop {
                if Some(runner) == stop {
                    break;
                }
                frontiers[runner].insert(nodes[w]);
                if runner == 0 {
                    break;
                }
                runner = idom[runner];
            }
        }
    }

    frontiers
}

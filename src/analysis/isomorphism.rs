//! Graph isomorphism by color refinement with individualization.
//!
//! Two graphs G and H are compared through their disjoint union. Color refinement on the
//! union assigns matching nodes of G and H the same color, so a coloring in which some
//! class has more G-nodes than H-nodes rules out any isomorphism. A coloring in which every
//! class holds exactly one node of each graph *is* an isomorphism.
//!
//! Between those two outcomes the search branches: it picks a class of four or more nodes,
//! fixes one of its G-nodes, and tries pairing it with each of the class's H-nodes in turn
//! by individualizing the pair and refining again.
//!
//! # Key Components
//!
//! - [`IsomorphismFinder`] - Interface for isomorphism search strategies
//! - [`ColorIsomorphismFinder`] - Color refinement based search
//! - [`Isomorphisms`] - Lazy iterator over the mappings found
//!
//! # Limitations
//!
//! Refinement can fail to distinguish non-isomorphic regular graphs without branching, so
//! the search is exponential in the worst case. Node names and annotations are ignored.

use std::{collections::HashMap, rc::Rc};

use tracing::{debug, trace};

use crate::{
    analysis::coloring::{ColorRefinement, Coloring},
    error::invalid_argument,
    graph::{Graph, NodeId},
    Result,
};

const FIRST_PREFIX: &str = "A_";
const SECOND_PREFIX: &str = "B_";

/// A strategy for finding isomorphisms between two graphs.
pub trait IsomorphismFinder {
    /// Iterator over the mappings found.
    type Mappings: Iterator<Item = HashMap<NodeId, NodeId>>;

    /// Lazily enumerates the isomorphisms from `first` to `second`.
    ///
    /// Each mapping sends every node of `first` to a distinct node of `second`, and maps
    /// every edge onto an edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the graphs
    /// differ in directedness.
    fn find_isomorphisms(&self, first: &Graph, second: &Graph) -> Result<Self::Mappings>;

    /// Returns `true` if at least one isomorphism exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the graphs
    /// differ in directedness.
    fn are_isomorphic(&self, first: &Graph, second: &Graph) -> Result<bool> {
        Ok(self.find_isomorphisms(first, second)?.next().is_some())
    }
}

/// Isomorphism search driven by color refinement.
///
/// # Examples
///
/// ```rust
/// use graphscope::analysis::{ColorIsomorphismFinder, IsomorphismFinder};
/// use graphscope::graph::Graph;
///
/// let mut g = Graph::undirected();
/// g.add_edge_by_name("1", "2");
/// g.add_edge_by_name("2", "3");
///
/// let mut h = Graph::undirected();
/// h.add_edge_by_name("x", "y");
/// h.add_edge_by_name("z", "x");
///
/// let finder = ColorIsomorphismFinder::new();
/// assert!(finder.are_isomorphic(&g, &h).unwrap());
///
/// // The path can be mapped forwards or backwards
/// assert_eq!(finder.find_isomorphisms(&g, &h).unwrap().count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorIsomorphismFinder;

impl ColorIsomorphismFinder {
    /// Creates a finder.
    pub fn new() -> Self {
        ColorIsomorphismFinder
    }
}

impl IsomorphismFinder for ColorIsomorphismFinder {
    type Mappings = Isomorphisms;

    fn find_isomorphisms(&self, first: &Graph, second: &Graph) -> Result<Isomorphisms> {
        Isomorphisms::new(first, second)
    }
}

/// One pending node of the search tree.
struct Branch {
    /// Stable coloring of the parent node; `None` at the root
    base: Option<Rc<Coloring>>,
    /// Pair individualized on top of `base`
    pair: Option<(NodeId, NodeId)>,
}

/// Lazy depth-first enumeration of isomorphisms.
///
/// Created by [`ColorIsomorphismFinder::find_isomorphisms`]. Each item maps the nodes of
/// the first graph to the nodes of the second.
pub struct Isomorphisms {
    union: Graph,
    /// Union node slot to the node of the first (`true`) or second graph
    origin: HashMap<usize, (bool, NodeId)>,
    stack: Vec<Branch>,
}

impl Isomorphisms {
    fn new(first: &Graph, second: &Graph) -> Result<Self> {
        if first.is_directed() != second.is_directed() {
            return Err(invalid_argument!(
                "cannot compare a directed and an undirected graph"
            ));
        }

        let mut union = Graph::new(first.is_directed());
        let mut origin = HashMap::with_capacity(first.node_count() + second.node_count());
        let parts = [(first, FIRST_PREFIX, true), (second, SECOND_PREFIX, false)];
        for (graph, prefix, is_first) in parts {
            for (own, copy) in union.disjoint_union_with(graph, prefix)? {
                origin.insert(copy.index(), (is_first, own));
            }
        }

        let mut stack = Vec::new();
        if first.node_count() == second.node_count() && first.edge_count() == second.edge_count()
        {
            stack.push(Branch {
                base: None,
                pair: None,
            });
        } else {
            debug!(
                first = first.node_count(),
                second = second.node_count(),
                "graphs differ in size, no isomorphism"
            );
        }

        Ok(Isomorphisms {
            union,
            origin,
            stack,
        })
    }

    fn is_first(&self, node: NodeId) -> bool {
        self.origin
            .get(&node.index())
            .is_some_and(|&(is_first, _)| is_first)
    }

    fn refine(&self, branch: &Branch) -> Option<Coloring> {
        let mut refinement = match &branch.base {
            Some(base) => ColorRefinement::resume(&self.union, base),
            None => ColorRefinement::new(&self.union),
        };
        if let Some((a, b)) = branch.pair {
            refinement.individualize(a, b).ok()?;
        }
        Some(refinement.refine())
    }

    /// Every class splits evenly between the two graphs.
    fn is_balanced(&self, coloring: &Coloring) -> bool {
        coloring.classes().all(|class| {
            let firsts = class.iter().filter(|&&n| self.is_first(n)).count();
            firsts * 2 == class.len()
        })
    }

    fn mapping(&self, coloring: &Coloring) -> HashMap<NodeId, NodeId> {
        let mut mapping = HashMap::with_capacity(coloring.color_count());
        for class in coloring.classes() {
            let mut from = None;
            let mut to = None;
            for node in class {
                match self.origin.get(&node.index()) {
                    Some(&(true, own)) => from = Some(own),
                    Some(&(false, own)) => to = Some(own),
                    None => {}
                }
            }
            if let (Some(from), Some(to)) = (from, to) {
                mapping.insert(from, to);
            }
        }
        mapping
    }
}

impl Iterator for Isomorphisms {
    type Item = HashMap<NodeId, NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(branch) = self.stack.pop() {
            let Some(coloring) = self.refine(&branch) else {
                continue;
            };

            if !self.is_balanced(&coloring) {
                trace!(pair = ?branch.pair, "unbalanced coloring, branch pruned");
                continue;
            }
            if coloring.classes().all(|class| class.len() == 2) {
                trace!(pair = ?branch.pair, "bijective coloring");
                return Some(self.mapping(&coloring));
            }

            let Some(class) = coloring.classes().find(|class| class.len() >= 4) else {
                continue;
            };
            let Some(&pivot) = class.iter().find(|&&n| self.is_first(n)) else {
                continue;
            };
            let candidates: Vec<NodeId> = class
                .iter()
                .copied()
                .filter(|&n| !self.is_first(n))
                .collect();
            trace!(%pivot, candidates = candidates.len(), "branching");

            let base = Rc::new(coloring);
            for &candidate in candidates.iter().rev() {
                self.stack.push(Branch {
                    base: Some(Rc::clone(&base)),
                    pair: Some((pivot, candidate)),
                });
            }
        }
        None
    }
}

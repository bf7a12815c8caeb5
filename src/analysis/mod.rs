//! Graph analyses built on the traversal engine.
//!
//! Every analysis here consumes a [`Graph`](crate::graph::Graph) through
//! [`Walk`](crate::traversal::Walk)s and recorders rather than touching adjacency
//! directly where a walk will do.
//!
//! # Architecture
//!
//! - [`dominance`] - Dominator tree, dominance frontiers, back-edges and loop headers
//! - [`scc`] - Strongly connected components (Kosaraju)
//! - [`coloring`] - Color refinement (1-WL) with individualization
//! - [`isomorphism`] - Isomorphism search on top of color refinement
//! - [`categorize`] - Whole-graph predicates: cyclic, connected, tree, regular, complete
//!
//! # Usage
//!
//! ```rust
//! use graphscope::analysis::{is_cyclic, strongly_connected_components, DominatorInfo};
//! use graphscope::graph::Graph;
//!
//! let mut graph = Graph::directed();
//! graph.add_edge_by_name("entry", "loop");
//! graph.add_edge_by_name("loop", "body");
//! graph.add_edge_by_name("body", "loop");
//! graph.add_edge_by_name("loop", "exit");
//!
//! let entry = graph.node_id("entry")?;
//! let head = graph.node_id("loop")?;
//!
//! let dominators = DominatorInfo::new(&graph, entry)?;
//! assert!(dominators.is_loop_header(head));
//! assert!(is_cyclic(&graph));
//! assert_eq!(strongly_connected_components(&graph).len(), 3);
//! # Ok::<(), graphscope::Error>(())
//! ```

pub mod categorize;
pub mod coloring;
pub mod dominance;
pub mod isomorphism;
pub mod scc;

pub use categorize::{is_complete, is_connected, is_cyclic, is_regular, is_tree};
pub use coloring::{find_coloring, find_union_coloring, ColorRefinement, Coloring};
pub use dominance::{DominatorInfo, DominatorIter};
pub use isomorphism::{ColorIsomorphismFinder, IsomorphismFinder, Isomorphisms};
pub use scc::{strongly_connected_components, strongly_connected_components_from};

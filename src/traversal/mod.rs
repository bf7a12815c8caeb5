//! Graph traversal.
//!
//! This module provides the pull-based walk every analysis of the crate is built on, the
//! recorders that fold a walk into derived structures, and simple searches.
//!
//! # Key Components
//!
//! - [`Traversal`] / [`TraversalConfig`] - Breadth-first or depth-first, optionally revisiting
//! - [`Walk`] - The in-progress walk, yielding [`Visit`]s answered with [`Decision`]s
//! - [`Recorder`] - Observer trait implemented by [`ParentRecorder`], [`OrderRecorder`] and
//!   [`PostOrderRecorder`]
//! - [`reachable_nodes`] / [`search`] - Convenience consumers of a walk
//!
//! # Examples
//!
//! ```rust
//! use graphscope::graph::Graph;
//! use graphscope::traversal::{Decision, Traversal};
//!
//! let mut graph = Graph::directed();
//! graph.add_edge_by_name("a", "b");
//! graph.add_edge_by_name("b", "c");
//! let a = graph.node_id("a").unwrap();
//! let b = graph.node_id("b").unwrap();
//!
//! let mut walk = Traversal::depth_first().walk(&graph, a).unwrap();
//! let mut seen = Vec::new();
//! while let Some(visit) = walk.next_visit() {
//!     seen.push(visit.node);
//!     if visit.node == b {
//!         walk.decide(Decision::SkipChildren);
//!     }
//! }
//! assert_eq!(seen, vec![a, b]);
//! ```

mod config;
mod recorders;
mod search;
mod walk;

pub use config::{TraversalConfig, TraversalOrder};
pub use recorders::{OrderRecorder, ParentRecorder, PostOrderRecorder};
pub use search::{breadth_first_search, depth_first_search, reachable_nodes, search};
pub use walk::{Decision, Traversal, Visit, Walk, WalkStatus};

/// An observer folding the visits of a walk into some result.
///
/// Recorders are fed through [`Walk::drive`] or [`Traversal::run`].
pub trait Recorder {
    /// Called once per visit, before the visit is answered.
    fn observe(&mut self, visit: &Visit);

    /// Called when the walk ran out of nodes. Not called on abort.
    fn complete(&mut self) {}
}

//! Graph model.
//!
//! This module provides the arena-backed [`Graph`] every traversal and analysis in the crate
//! works on, together with its identifier types and annotation maps.
//!
//! # Key Components
//!
//! - [`Graph`] - Directed or undirected graph of uniquely named nodes
//! - [`NodeId`] / [`EdgeId`] - Ids carrying the [`GraphId`] of their owning arena
//! - [`Annotations`] / [`AnnotationValue`] - Dynamically typed key/value data
//! - [`SubGraph`] - Named grouping of nodes
//!
//! # Examples
//!
//! ```rust
//! use graphscope::graph::Graph;
//!
//! let mut graph = Graph::undirected();
//! graph.add_edge_by_name("a", "b");
//! graph.add_edge_by_name("b", "c");
//!
//! let b = graph.node_id("b").unwrap();
//! assert_eq!(graph.out_degree(b), 2);
//! ```

mod annotations;
mod edge;
#[allow(clippy::module_inception)]
mod graph;
mod node;
mod subgraph;

pub use annotations::{AnnotationValue, Annotations};
pub use edge::EdgeId;
pub use graph::{DetachedNode, Graph};
pub use node::{GraphId, NodeId};
pub use subgraph::{SubGraph, SubGraphId};

//! # graphscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! of the graphscope library. Import it to get quick access to graphs, walks and analyses.
//!
//! ```rust
//! use graphscope::prelude::*;
//!
//! let mut graph = Graph::undirected();
//! graph.add_edge_by_name("a", "b");
//! assert!(is_connected(&graph));
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all graphscope operations
pub use crate::Error;

/// The result type used throughout graphscope
pub use crate::Result;

// ================================================================================================
// Graph Model
// ================================================================================================

/// The graph arena and its identifiers
pub use crate::graph::{EdgeId, Graph, GraphId, NodeId, SubGraphId};

/// Annotations attached to graphs, nodes, edges and sub-graphs
pub use crate::graph::{AnnotationValue, Annotations};

// ================================================================================================
// Traversal
// ================================================================================================

/// Walk configuration and control
pub use crate::traversal::{
    Decision, Traversal, TraversalConfig, TraversalOrder, Visit, Walk, WalkStatus,
};

/// Recorders folding walks into derived structures
pub use crate::traversal::{OrderRecorder, ParentRecorder, PostOrderRecorder, Recorder};

/// Searches
pub use crate::traversal::{breadth_first_search, depth_first_search, reachable_nodes};

// ================================================================================================
// Analysis
// ================================================================================================

/// Dominance
pub use crate::analysis::DominatorInfo;

/// Strongly connected components
pub use crate::analysis::strongly_connected_components;

/// Color refinement and isomorphism
pub use crate::analysis::{
    find_coloring, ColorIsomorphismFinder, ColorRefinement, Coloring, IsomorphismFinder,
};

/// Structural predicates
pub use crate::analysis::{is_complete, is_connected, is_cyclic, is_regular, is_tree};

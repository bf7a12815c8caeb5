// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # graphscope
//!
//! A graph library for structural analysis of directed and undirected graphs: a named-node
//! arena with annotations and sub-graphs, a pull-based traversal engine, and the classic
//! analyses built on top of it.
//!
//! ## Features
//!
//! - **Arena graphs** - Named nodes, typed ids, no multi-edges, O(1) structural queries
//! - **Pull-based traversal** - Breadth-first and depth-first walks steered visit by visit
//! - **Recorders** - Spanning forests, discovery order and postorder from any walk
//! - **Dominance** - Lengauer-Tarjan dominator trees, frontiers, back-edges, loop headers
//! - **Strongly connected components** - Kosaraju over the transposed graph
//! - **Color refinement and isomorphism** - 1-WL partitioning with lazy backtracking search
//!
//! ## Quick Start
//!
//! ```rust
//! use graphscope::prelude::*;
//!
//! let mut graph = Graph::directed();
//! graph.add_edge_by_name("1", "2");
//! graph.add_edge_by_name("1", "3");
//! graph.add_edge_by_name("2", "4");
//! graph.add_edge_by_name("3", "4");
//!
//! let entry = graph.node_id("1")?;
//! let join = graph.node_id("4")?;
//!
//! let dominators = DominatorInfo::new(&graph, entry)?;
//! assert_eq!(dominators.immediate_dominator(join), Some(entry));
//! # Ok::<(), graphscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`graph`] - The [`graph::Graph`] arena, ids, annotations and sub-graphs
//! - [`traversal`] - Walks, decisions, recorders and searches
//! - [`analysis`] - Dominance, SCC, coloring, isomorphism and structural predicates
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`](Result). Lookups distinguish a missing
//! node ([`Error::NotFound`]), an id belonging to another graph
//! ([`Error::InvalidArgument`]) and an operation that is not valid in the current state
//! ([`Error::InvalidOperation`]):
//!
//! ```rust
//! use graphscope::{graph::Graph, Error};
//!
//! let graph = Graph::directed();
//! match graph.node_id("missing") {
//!     Ok(_) => unreachable!(),
//!     Err(Error::NotFound(message)) => println!("lookup failed: {message}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```
//!
//! ## Logging
//!
//! Analyses open [`tracing`] spans and report summaries at `debug` level and search steps
//! at `trace` level. Install any `tracing` subscriber to see them.

pub(crate) mod error;

pub mod analysis;
pub mod graph;
pub mod prelude;
pub mod traversal;

/// `graphscope` Result type.
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use graphscope::{graph::Graph, Result};
///
/// fn first_successor(graph: &Graph, name: &str) -> Result<Option<String>> {
///     let node = graph.node_id(name)?;
///     Ok(match graph.successors(node).next() {
///         Some(next) => Some(graph.name(next)?.to_string()),
///         None => None,
///     })
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `graphscope` Error type.
///
/// The main error type for all operations in this crate. See [`Error`] for the variants.
pub use error::Error;

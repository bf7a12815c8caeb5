//! Traversal configuration
//!
//! This module provides the knobs of a [`Traversal`](crate::traversal::Traversal): the
//! frontier discipline and whether already visited nodes are reported again.

use strum::{EnumCount, EnumIter};

/// Frontier discipline of a walk.
#[derive(Debug, Default, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount, strum::Display)]
pub enum TraversalOrder {
    /// FIFO frontier; nodes are discovered in order of increasing distance
    #[default]
    BreadthFirst,
    /// LIFO frontier; successors are explored in edge insertion order
    DepthFirst,
}

/// Configuration of a graph walk
///
/// Every arrival at a node is reported. By default only the first arrival is expanded;
/// with `revisit` enabled every arrival is expanded unless the consumer decides otherwise.
/// Revisiting walks terminate only when the consumer stops expanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Frontier discipline
    pub order: TraversalOrder,

    /// Expand nodes on every arrival instead of only on the first (default: false)
    pub revisit: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            order: TraversalOrder::BreadthFirst,
            revisit: false,
        }
    }
}

impl TraversalConfig {
    /// Breadth-first walk expanding every node once
    #[must_use]
    pub fn breadth_first() -> Self {
        Self::default()
    }

    /// Depth-first walk expanding every node once
    #[must_use]
    pub fn depth_first() -> Self {
        Self {
            order: TraversalOrder::DepthFirst,
            revisit: false,
        }
    }

    /// Depth-first walk expanding every arrival
    ///
    /// **Warning**: on a cyclic graph the walk only ends once the consumer answers
    /// [`Decision::SkipChildren`](crate::traversal::Decision::SkipChildren) or
    /// [`Decision::Abort`](crate::traversal::Decision::Abort).
    #[must_use]
    pub fn revisiting() -> Self {
        Self {
            order: TraversalOrder::DepthFirst,
            revisit: true,
        }
    }
}

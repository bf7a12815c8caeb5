use thiserror::Error;

macro_rules! not_found {
    ($msg:expr) => {
        crate::Error::NotFound($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::NotFound(format!($fmt, $($arg)*))
    };
}

macro_rules! invalid_argument {
    ($msg:expr) => {
        crate::Error::InvalidArgument($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument(format!($fmt, $($arg)*))
    };
}

macro_rules! invalid_operation {
    ($msg:expr) => {
        crate::Error::InvalidOperation($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidOperation(format!($fmt, $($arg)*))
    };
}

pub(crate) use {invalid_argument, invalid_operation, not_found};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is a contract violation by the caller: the graph and the analyses never fail
/// on their own. Aborting a traversal is not an error and is reported through
/// [`WalkStatus::Aborted`](crate::traversal::WalkStatus::Aborted) instead.
///
/// # Error Categories
///
/// - [`Error::NotFound`] - A node, edge or sub-graph lookup found nothing
/// - [`Error::InvalidArgument`] - Arguments that can never be valid together, such as
///   endpoints from two different graphs or graphs of mixed directedness
/// - [`Error::InvalidOperation`] - The operation is not valid in the current state, such as
///   connecting a removed node or asking a recorder about a node it never saw
///
/// # Examples
///
/// ```rust
/// use graphscope::{Error, graph::Graph};
///
/// let graph = Graph::directed();
/// match graph.node_id("missing") {
///     Err(Error::NotFound(message)) => println!("lookup failed: {message}"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A lookup by name or id did not resolve.
    ///
    /// Returned for unknown node names, out-of-range ids and unknown sub-graphs.
    #[error("Not found - {0}")]
    NotFound(String),

    /// An argument can never be valid in this combination.
    ///
    /// Returned when ids from another graph are passed, when a disjoint union would produce
    /// two nodes with the same name, or when graphs of mixed directedness are compared.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// The operation is not valid for the current state of its target.
    ///
    /// Returned for edge insertion on a removed node, and for recorder queries about the
    /// traversal root or about nodes the traversal never reached.
    #[error("Invalid operation - {0}")]
    InvalidOperation(String),
}

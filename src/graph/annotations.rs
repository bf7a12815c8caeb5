//! Open-ended key/value annotations for nodes, edges, sub-graphs and graphs.
//!
//! Annotations are string-keyed and dynamically typed. Analyses never read them; they exist
//! so callers can attach labels, weights or cross-references without wrapping the graph.

use std::{collections::HashMap, fmt};

use crate::graph::NodeId;

/// A single dynamically typed annotation value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// A boolean flag
    Bool(bool),
    /// A signed integer
    Int(i64),
    /// A floating point number, e.g. an edge weight
    Float(f64),
    /// Free text
    Text(String),
    /// A reference to another node
    Node(NodeId),
}

impl AnnotationValue {
    /// Returns the contained boolean, if this is a [`AnnotationValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the contained integer, if this is a [`AnnotationValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AnnotationValue::Float(value) => Some(*value),
            AnnotationValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the contained text, if this is a [`AnnotationValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the referenced node, if this is a [`AnnotationValue::Node`].
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            AnnotationValue::Node(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(value) => write!(f, "{value}"),
            AnnotationValue::Int(value) => write!(f, "{value}"),
            AnnotationValue::Float(value) => write!(f, "{value}"),
            AnnotationValue::Text(value) => write!(f, "\"{value}\""),
            AnnotationValue::Node(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<i32> for AnnotationValue {
    fn from(value: i32) -> Self {
        AnnotationValue::Int(i64::from(value))
    }
}

impl From<f64> for AnnotationValue {
    fn from(value: f64) -> Self {
        AnnotationValue::Float(value)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Text(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::Text(value)
    }
}

impl From<NodeId> for AnnotationValue {
    fn from(value: NodeId) -> Self {
        AnnotationValue::Node(value)
    }
}

/// A string-keyed map of [`AnnotationValue`]s.
///
/// # Examples
///
/// ```rust
/// use graphscope::graph::Graph;
///
/// let mut graph = Graph::directed();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let edge = graph.add_edge(a, b).unwrap();
///
/// graph.edge_annotations_mut(edge).unwrap().set("weight", 2.5);
/// let weight = graph.edge_annotations(edge).unwrap().get("weight").and_then(|v| v.as_float());
/// assert_eq!(weight, Some(2.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    entries: HashMap<String, AnnotationValue>,
}

impl Annotations {
    /// Creates an empty annotation map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AnnotationValue>,
    ) -> Option<AnnotationValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<AnnotationValue> {
        self.entries.remove(key)
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored annotations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no annotation is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all key/value pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Removes every annotation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// Path: crates/types/src/node.rs

//! The decoded, in-memory shape of one block's content.
//!
//! Nodes are pure data. Lookups that miss return `None`; deciding whether a
//! miss is a failed match is left to the selector that asked.

use crate::cid::Cid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// The structural kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A string-keyed mapping.
    Map,
    /// An ordered sequence.
    List,
    /// Any scalar value.
    Scalar,
    /// A reference to another block.
    Link,
}

/// Decoded content of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// The null scalar.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A signed integer scalar.
    Integer(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// A byte string scalar.
    Bytes(Vec<u8>),
    /// An ordered sequence of nodes.
    List(Vec<Node>),
    /// A string-keyed mapping. Keys are kept sorted so encodings are canonical.
    Map(BTreeMap<String, Node>),
    /// A cross-block edge.
    Link(Cid),
}

impl Node {
    /// Returns the structural kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Map(_) => NodeKind::Map,
            Node::List(_) => NodeKind::List,
            Node::Link(_) => NodeKind::Link,
            _ => NodeKind::Scalar,
        }
    }

    /// True for mappings.
    pub fn is_map(&self) -> bool {
        self.kind() == NodeKind::Map
    }

    /// True for sequences.
    pub fn is_list(&self) -> bool {
        self.kind() == NodeKind::List
    }

    /// True for links.
    pub fn is_link(&self) -> bool {
        self.kind() == NodeKind::Link
    }

    /// True for every scalar variant.
    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    /// Looks up `key` if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the element at `index` if this node is a sequence long enough.
    pub fn index(&self, index: usize) -> Option<&Node> {
        self.as_list()?.get(index)
    }

    /// Returns the index range `start..end` with both bounds clamped to the
    /// length.
    ///
    /// `end` defaults to the length of the sequence. Returns `None` only when
    /// this node is not a sequence; an empty range is a valid answer.
    pub fn slice_range(&self, start: usize, end: Option<usize>) -> Option<Range<usize>> {
        let len = self.as_list()?.len();
        let end = end.map_or(len, |end| end.min(len));
        Some(start.min(end)..end)
    }

    /// Borrows the elements of a sequence.
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    /// Borrows the entries of a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the target of a link.
    pub fn as_link(&self) -> Option<&Cid> {
        match self {
            Node::Link(cid) => Some(cid),
            _ => None,
        }
    }
}

impl From<Cid> for Node {
    fn from(cid: Cid) -> Self {
        Node::Link(cid)
    }
}

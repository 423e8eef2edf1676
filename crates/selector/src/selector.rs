// Path: crates/selector/src/selector.rs

//! The selector grammar.
//!
//! Every instruction is a single-key JSON object whose key is the variant tag.
//! Each variant is its own type implementing [`Visit`]; [`Selector`] is the
//! closed union the traversal engine dispatches on.

use dagsel_types::error::SelectorError;
use dagsel_types::Node;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Tag of [`SelectPath`].
pub const SELECT_PATH: &str = "selectPath";
/// Tag of [`SelectArrayAll`].
pub const SELECT_ARRAY_ALL: &str = "selectArrayAll";
/// Tag of [`SelectArrayPosition`].
pub const SELECT_ARRAY_POSITION: &str = "selectArrayPosition";
/// Tag of [`SelectArraySlice`].
pub const SELECT_ARRAY_SLICE: &str = "selectArraySlice";
/// Tag of [`SelectRecursive`].
pub const SELECT_RECURSIVE: &str = "selectRecursive";

/// One move from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The value under a mapping key.
    Field(String),
    /// The element at a sequence index.
    Index(usize),
}

impl Step {
    /// The child this step leads to, if `node` has one.
    pub fn apply<'a>(&self, node: &'a Node) -> Option<&'a Node> {
        match self {
            Self::Field(key) => node.get(key),
            Self::Index(index) => node.index(*index),
        }
    }
}

/// The outcome of a matching visit.
///
/// A match names children by position rather than copying them out of the
/// visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Leads to the node the walk continues with. May be a link.
    pub next: Step,
    /// Further children found at the same step, in order, to be visited later.
    pub siblings: Vec<Step>,
}

impl Match {
    /// A match without siblings.
    pub fn single(next: Step) -> Self {
        Self {
            next,
            siblings: Vec::new(),
        }
    }

    fn spread(indices: Range<usize>) -> Option<Self> {
        let mut indices = indices.map(Step::Index);
        let next = indices.next()?;
        Some(Self {
            next,
            siblings: indices.collect(),
        })
    }
}

/// The match contract of a non-recursive instruction.
pub trait Visit {
    /// Returns `None` when the instruction does not match `node`.
    fn visit(&self, node: &Node) -> Option<Match>;
}

/// Selects the value under a key of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectPath {
    field: String,
}

impl SelectPath {
    /// Selects `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// The selected key.
    pub fn field(&self) -> &str {
        &self.field
    }

    fn from_params(params: &Value) -> Result<Self, SelectorError> {
        params
            .as_str()
            .map(Self::new)
            .ok_or_else(|| SelectorError::invalid(format!("`{SELECT_PATH}` must be a string")))
    }
}

impl Visit for SelectPath {
    fn visit(&self, node: &Node) -> Option<Match> {
        node.get(&self.field)
            .map(|_| Match::single(Step::Field(self.field.clone())))
    }
}

/// Selects every element of a non-empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectArrayAll;

impl SelectArrayAll {
    fn from_params(params: &Value) -> Result<Self, SelectorError> {
        if params.is_null() {
            Ok(Self)
        } else {
            Err(SelectorError::invalid(format!(
                "`{SELECT_ARRAY_ALL}` value must be `null`"
            )))
        }
    }
}

impl Visit for SelectArrayAll {
    fn visit(&self, node: &Node) -> Option<Match> {
        Match::spread(0..node.as_list()?.len())
    }
}

/// Selects one element of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectArrayPosition {
    index: usize,
}

impl SelectArrayPosition {
    /// Selects the element at `index`.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// The selected index.
    pub fn index(&self) -> usize {
        self.index
    }

    fn from_params(params: &Value) -> Result<Self, SelectorError> {
        non_negative(params, SELECT_ARRAY_POSITION).map(Self::new)
    }
}

impl Visit for SelectArrayPosition {
    fn visit(&self, node: &Node) -> Option<Match> {
        node.index(self.index)
            .map(|_| Match::single(Step::Index(self.index)))
    }
}

/// Selects a contiguous range of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectArraySlice {
    start: usize,
    end: Option<usize>,
}

impl SelectArraySlice {
    /// Selects `start..end`; `end` defaults to the end of the sequence.
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    fn from_params(params: &Value) -> Result<Self, SelectorError> {
        let map = params.as_object().ok_or_else(|| {
            SelectorError::invalid(format!("`{SELECT_ARRAY_SLICE}` must be an object"))
        })?;
        reject_unknown(map, SELECT_ARRAY_SLICE, &["start", "end"])?;
        let start = optional_non_negative(map.get("start"), "start")?.unwrap_or(0);
        let end = optional_non_negative(map.get("end"), "end")?;
        Ok(Self::new(start, end))
    }

    fn to_params(self) -> Value {
        let mut map = Map::new();
        map.insert("start".into(), Value::from(self.start));
        if let Some(end) = self.end {
            map.insert("end".into(), Value::from(end));
        }
        Value::Object(map)
    }
}

impl Visit for SelectArraySlice {
    fn visit(&self, node: &Node) -> Option<Match> {
        Match::spread(node.slice_range(self.start, self.end)?)
    }
}

/// Repeatedly applies an inner program, descending until it stops matching
/// or the depth limit is spent.
///
/// The repetition itself is driven by the traversal engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectRecursive {
    follow: Arc<[Selector]>,
    depth_limit: Option<u64>,
}

impl SelectRecursive {
    /// Builds a recursive instruction.
    ///
    /// `follow` must be non-empty and must not itself contain a recursive
    /// instruction.
    pub fn new(follow: Vec<Selector>, depth_limit: Option<u64>) -> Result<Self, SelectorError> {
        if follow.is_empty() {
            return Err(SelectorError::invalid(format!(
                "`{SELECT_RECURSIVE}` needs a non-empty `follow` list"
            )));
        }
        if follow.iter().any(|s| matches!(s, Selector::Recursive(_))) {
            return Err(nested_recursion());
        }
        Ok(Self {
            follow: follow.into(),
            depth_limit,
        })
    }

    /// The inner program, shared and immutable.
    pub fn follow(&self) -> &Arc<[Selector]> {
        &self.follow
    }

    /// The maximum number of passes, if bounded.
    pub fn depth_limit(&self) -> Option<u64> {
        self.depth_limit
    }

    fn from_params(params: &Value) -> Result<Self, SelectorError> {
        let map = params.as_object().ok_or_else(|| {
            SelectorError::invalid(format!("`{SELECT_RECURSIVE}` must be an object"))
        })?;
        reject_unknown(map, SELECT_RECURSIVE, &["follow", "depthLimit"])?;
        let follow = map
            .get("follow")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SelectorError::invalid(format!("`{SELECT_RECURSIVE}` needs a `follow` array"))
            })?
            .iter()
            .map(|inner| Selector::parse(inner, true))
            .collect::<Result<Vec<_>, _>>()?;
        let depth_limit = match map.get("depthLimit") {
            None | Some(Value::Null) => None,
            Some(limit) => Some(limit.as_u64().ok_or_else(|| {
                SelectorError::invalid("`depthLimit` must be a non-negative integer")
            })?),
        };
        Self::new(follow, depth_limit)
    }

    fn to_params(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "follow".into(),
            Value::Array(self.follow.iter().map(Selector::to_json).collect()),
        );
        if let Some(limit) = self.depth_limit {
            map.insert("depthLimit".into(), Value::from(limit));
        }
        Value::Object(map)
    }
}

/// One traversal instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// `selectPath`
    Path(SelectPath),
    /// `selectArrayAll`
    ArrayAll(SelectArrayAll),
    /// `selectArrayPosition`
    ArrayPosition(SelectArrayPosition),
    /// `selectArraySlice`
    ArraySlice(SelectArraySlice),
    /// `selectRecursive`
    Recursive(SelectRecursive),
}

impl Selector {
    /// Parses one instruction from its single-key JSON form.
    pub fn from_json(value: &Value) -> Result<Self, SelectorError> {
        Self::parse(value, false)
    }

    /// Parses a program (a JSON array of instructions).
    pub fn program_from_json(value: &Value) -> Result<Vec<Self>, SelectorError> {
        value
            .as_array()
            .ok_or_else(|| SelectorError::invalid("`selectors` must be an array"))?
            .iter()
            .map(Self::from_json)
            .collect()
    }

    fn parse(value: &Value, in_recursion: bool) -> Result<Self, SelectorError> {
        let (tag, params) = single_key(value, "selector")?;
        match tag {
            SELECT_PATH => SelectPath::from_params(params).map(Self::Path),
            SELECT_ARRAY_ALL => SelectArrayAll::from_params(params).map(Self::ArrayAll),
            SELECT_ARRAY_POSITION => {
                SelectArrayPosition::from_params(params).map(Self::ArrayPosition)
            }
            SELECT_ARRAY_SLICE => SelectArraySlice::from_params(params).map(Self::ArraySlice),
            SELECT_RECURSIVE if in_recursion => Err(nested_recursion()),
            SELECT_RECURSIVE => SelectRecursive::from_params(params).map(Self::Recursive),
            other => Err(SelectorError::invalid(format!("unknown selector `{other}`"))),
        }
    }

    /// The variant tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Path(_) => SELECT_PATH,
            Self::ArrayAll(_) => SELECT_ARRAY_ALL,
            Self::ArrayPosition(_) => SELECT_ARRAY_POSITION,
            Self::ArraySlice(_) => SELECT_ARRAY_SLICE,
            Self::Recursive(_) => SELECT_RECURSIVE,
        }
    }

    /// Applies a non-recursive instruction.
    ///
    /// A recursive instruction never matches a bare visit: the engine expands
    /// it into passes of its `follow` program instead.
    pub fn visit(&self, node: &Node) -> Option<Match> {
        match self {
            Self::Path(s) => s.visit(node),
            Self::ArrayAll(s) => s.visit(node),
            Self::ArrayPosition(s) => s.visit(node),
            Self::ArraySlice(s) => s.visit(node),
            Self::Recursive(_) => None,
        }
    }

    /// Renders the single-key JSON form.
    pub fn to_json(&self) -> Value {
        let params = match self {
            Self::Path(s) => Value::String(s.field.clone()),
            Self::ArrayAll(_) => Value::Null,
            Self::ArrayPosition(s) => Value::from(s.index),
            Self::ArraySlice(s) => s.to_params(),
            Self::Recursive(s) => s.to_params(),
        };
        Value::Object(Map::from_iter([(self.tag().to_string(), params)]))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

/// Splits a single-key object into its key and value.
pub(crate) fn single_key<'a>(
    value: &'a Value,
    what: &str,
) -> Result<(&'a str, &'a Value), SelectorError> {
    let map = value
        .as_object()
        .ok_or_else(|| SelectorError::invalid(format!("{what} must be an object")))?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, params)), None) => Ok((key.as_str(), params)),
        (None, _) => Err(SelectorError::invalid(format!("{what} has no field"))),
        (Some(_), Some(_)) => Err(SelectorError::invalid(format!(
            "{what} must have exactly one field, found {}",
            map.len()
        ))),
    }
}

pub(crate) fn reject_unknown(
    map: &Map<String, Value>,
    what: &str,
    allowed: &[&str],
) -> Result<(), SelectorError> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(SelectorError::invalid(format!(
            "`{what}` has unknown field `{key}`"
        ))),
        None => Ok(()),
    }
}

fn non_negative(value: &Value, what: &str) -> Result<usize, SelectorError> {
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| SelectorError::invalid(format!("`{what}` must be a non-negative integer")))
}

fn optional_non_negative(value: Option<&Value>, what: &str) -> Result<Option<usize>, SelectorError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => non_negative(v, what).map(Some),
    }
}

fn nested_recursion() -> SelectorError {
    SelectorError::invalid(format!(
        "`{SELECT_RECURSIVE}` cannot be nested inside another `{SELECT_RECURSIVE}`"
    ))
}

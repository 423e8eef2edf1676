// Path: crates/codec/src/json.rs

//! The DAG-JSON codec.
//!
//! Plain JSON values map onto [`Node`] directly. Two single-key objects are
//! reserved: `{"/": "<cid>"}` is a link and `{"/": {"bytes": "<base64>"}}` is
//! a byte string.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use dagsel_api::codec::Codec;
use dagsel_types::error::CodecError;
use dagsel_types::{Cid, Multicodec, Node};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// The reserved key marking links and byte strings.
pub const RESERVED_KEY: &str = "/";

/// JSON with reserved link and bytes forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagJson;

impl Codec for DagJson {
    fn code(&self) -> Multicodec {
        Multicodec::DAG_JSON
    }

    fn decode(&self, bytes: &[u8]) -> Result<Node, CodecError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        from_json(&value)
    }

    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError> {
        let value = to_json(node)?;
        serde_json::to_vec(&value).map_err(|e| CodecError::Encode(e.to_string()))
    }
}

/// Converts a JSON value, parsing link targets as CID strings.
pub fn from_json(value: &Value) -> Result<Node, CodecError> {
    from_json_with(value, &mut |target| {
        target
            .parse::<Cid>()
            .map_err(|e| CodecError::Decode(format!("invalid link '{target}': {e}")))
    })
}

/// Converts a JSON value, resolving every link target through `resolve`.
///
/// Importers use this to let links name nodes that are not yet addressed.
pub fn from_json_with(
    value: &Value,
    resolve: &mut dyn FnMut(&str) -> Result<Cid, CodecError>,
) -> Result<Node, CodecError> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(*b),
        Value::Number(n) => number(n)?,
        Value::String(s) => Node::String(s.clone()),
        Value::Array(items) => Node::List(
            items
                .iter()
                .map(|item| from_json_with(item, &mut *resolve))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => match reserved(map) {
            Some(Value::String(target)) => Node::Link(resolve(target)?),
            Some(Value::Object(inner)) => Node::Bytes(bytes(inner)?),
            Some(other) => {
                return Err(CodecError::Decode(format!(
                    "reserved key '/' holds unsupported value {other}"
                )))
            }
            None => Node::Map(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), from_json_with(v, &mut *resolve)?)))
                    .collect::<Result<BTreeMap<_, _>, CodecError>>()?,
            ),
        },
    })
}

/// Returns the link target named by `value` if it is a reserved link object.
pub fn link_target(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => match reserved(map) {
            Some(Value::String(target)) => Some(target.as_str()),
            _ => None,
        },
        _ => None,
    }
}

fn reserved(map: &Map<String, Value>) -> Option<&Value> {
    if map.len() == 1 {
        map.get(RESERVED_KEY)
    } else {
        None
    }
}

fn number(n: &Number) -> Result<Node, CodecError> {
    if let Some(i) = n.as_i64() {
        Ok(Node::Integer(i))
    } else if n.is_u64() {
        Err(CodecError::Decode(format!("integer {n} out of range")))
    } else {
        n.as_f64()
            .map(Node::Float)
            .ok_or_else(|| CodecError::Decode(format!("unrepresentable number {n}")))
    }
}

fn bytes(inner: &Map<String, Value>) -> Result<Vec<u8>, CodecError> {
    match (inner.len(), inner.get("bytes")) {
        (1, Some(Value::String(encoded))) => STANDARD_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| CodecError::Decode(format!("invalid bytes: {e}"))),
        _ => Err(CodecError::Decode(
            "reserved object must be {\"bytes\": <base64>}".into(),
        )),
    }
}

/// Converts a node into its DAG-JSON value.
pub fn to_json(node: &Node) -> Result<Value, CodecError> {
    Ok(match node {
        Node::Null => Value::Null,
        Node::Bool(b) => Value::Bool(*b),
        Node::Integer(i) => Value::from(*i),
        Node::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| CodecError::Encode(format!("non-finite float {f}")))?,
        Node::String(s) => Value::String(s.clone()),
        Node::Bytes(b) => reserved_object(Value::Object(Map::from_iter([(
            "bytes".to_string(),
            Value::String(STANDARD_NO_PAD.encode(b)),
        )]))),
        Node::List(items) => Value::Array(items.iter().map(to_json).collect::<Result<_, _>>()?),
        Node::Map(map) => {
            if map.len() == 1 && map.contains_key(RESERVED_KEY) {
                return Err(CodecError::Encode(
                    "a map whose only key is '/' is reserved".into(),
                ));
            }
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), to_json(v)?);
            }
            Value::Object(out)
        }
        Node::Link(cid) => reserved_object(Value::String(cid.to_string())),
    })
}

fn reserved_object(value: Value) -> Value {
    Value::Object(Map::from_iter([(RESERVED_KEY.to_string(), value)]))
}

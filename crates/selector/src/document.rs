// Path: crates/selector/src/document.rs

//! The root selector document.

use crate::selector::{reject_unknown, single_key, Selector};
use dagsel_types::error::SelectorError;
use dagsel_types::Cid;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;

/// The discriminant key of a root selector document.
pub const CID_ROOTED_SELECTOR: &str = "cidRootedSelector";

/// A root block identifier and the program evaluated from it.
///
/// ```json
/// { "cidRootedSelector": { "root": "<cid>", "selectors": [ ... ] } }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RootedSelector {
    root: Cid,
    selectors: Arc<[Selector]>,
}

impl RootedSelector {
    /// Builds a document.
    pub fn new(root: Cid, selectors: Vec<Selector>) -> Self {
        Self {
            root,
            selectors: selectors.into(),
        }
    }

    /// The root block.
    pub fn root(&self) -> &Cid {
        &self.root
    }

    /// The program.
    pub fn selectors(&self) -> &Arc<[Selector]> {
        &self.selectors
    }

    /// Parses and validates a document. Nothing is fetched.
    ///
    /// `selectors` may be absent or `null`, both meaning the empty program.
    pub fn from_json(value: &Value) -> Result<Self, SelectorError> {
        let (tag, body) = single_key(value, "root selector document")?;
        if tag != CID_ROOTED_SELECTOR {
            return Err(SelectorError::invalid(format!(
                "unknown document type `{tag}`"
            )));
        }
        let body = body.as_object().ok_or_else(|| {
            SelectorError::invalid(format!("`{CID_ROOTED_SELECTOR}` must be an object"))
        })?;
        reject_unknown(body, CID_ROOTED_SELECTOR, &["root", "selectors"])?;

        let root = body
            .get("root")
            .and_then(Value::as_str)
            .ok_or_else(|| SelectorError::invalid("`root` must be a CID string"))?
            .parse::<Cid>()?;
        let selectors = match body.get("selectors") {
            None | Some(Value::Null) => Vec::new(),
            Some(program) => Selector::program_from_json(program)?,
        };
        Ok(Self::new(root, selectors))
    }

    /// Parses a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SelectorError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| SelectorError::invalid(format!("malformed JSON: {e}")))?;
        Self::from_json(&value)
    }

    /// Renders the document.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("root".into(), Value::String(self.root.to_string()));
        body.insert(
            "selectors".into(),
            Value::Array(self.selectors.iter().map(Selector::to_json).collect()),
        );
        Value::Object(Map::from_iter([(
            CID_ROOTED_SELECTOR.to_string(),
            Value::Object(body),
        )]))
    }
}

impl Serialize for RootedSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RootedSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectPath;
    use dagsel_types::Multicodec;
    use serde_json::json;

    fn root() -> Cid {
        Cid::hash(Multicodec::DAG_JSON, b"root")
    }

    #[test]
    fn test_parses_document() {
        let doc = RootedSelector::from_json(&json!({
            "cidRootedSelector": {
                "root": root().to_string(),
                "selectors": [{ "selectPath": "child" }]
            }
        }))
        .unwrap();
        assert_eq!(doc.root(), &root());
        assert_eq!(&doc.selectors()[..], &[Selector::Path(SelectPath::new("child"))]);
        assert_eq!(RootedSelector::from_json(&doc.to_json()).unwrap(), doc);
    }

    #[test]
    fn test_absent_and_empty_selectors_are_the_same() {
        let absent = json!({ "cidRootedSelector": { "root": root().to_string() } });
        let null = json!({ "cidRootedSelector": { "root": root().to_string(), "selectors": null } });
        let empty = json!({ "cidRootedSelector": { "root": root().to_string(), "selectors": [] } });
        for value in [absent, null, empty] {
            assert!(RootedSelector::from_json(&value).unwrap().selectors().is_empty());
        }
    }

    #[test]
    fn test_rejects_malformed_documents() {
        let root = root().to_string();
        let cases = [
            json!({}),
            json!({ "cidRootedSelector": { "root": root }, "extra": 1 }),
            json!({ "rootedSelector": { "root": root } }),
            json!({ "cidRootedSelector": [] }),
            json!({ "cidRootedSelector": { "selectors": [] } }),
            json!({ "cidRootedSelector": { "root": 7 } }),
            json!({ "cidRootedSelector": { "root": root, "limit": 1 } }),
            json!({ "cidRootedSelector": { "root": root, "selectors": {} } }),
            json!({ "cidRootedSelector": { "root": root, "selectors": [{ "selectNothing": 1 }] } }),
        ];
        for case in cases {
            assert!(
                matches!(RootedSelector::from_json(&case), Err(SelectorError::InvalidSelector(_))),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn test_bad_root_is_invalid_root() {
        let err = RootedSelector::from_json(&json!({
            "cidRootedSelector": { "root": "zQmNotBase16" }
        }))
        .unwrap_err();
        assert!(matches!(err, SelectorError::InvalidRoot(_)));
    }

    #[test]
    fn test_from_slice_and_serde() {
        let raw = format!(
            r#"{{"cidRootedSelector":{{"root":"{}","selectors":[{{"selectArrayAll":null}}]}}}}"#,
            root()
        );
        let doc = RootedSelector::from_slice(raw.as_bytes()).unwrap();
        let via_serde: RootedSelector = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc, via_serde);
        assert!(RootedSelector::from_slice(b"{").is_err());
    }
}

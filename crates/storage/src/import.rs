// Path: crates/storage/src/import.rs

//! Builds a store from a JSON description of a DAG.
//!
//! The description is an object mapping node names to DAG-JSON values. A
//! link `{"/": "<target>"}` names another node of the description, or, if no
//! node has that name, must be a CID string pointing outside the description.
//! Nodes are encoded children first, so every link is addressed before the
//! node that holds it.

use dagsel_api::codec::CodecRegistry;
use dagsel_api::storage::BlockStore;
use dagsel_codec::json::{from_json_with, link_target};
use dagsel_types::error::{CodecError, StorageError};
use dagsel_types::{Cid, Multicodec};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised while importing a DAG description.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The description is not a JSON object.
    #[error("DAG description must be a JSON object of named nodes")]
    NotAnObject,
    /// A link names neither a node nor a valid CID.
    #[error("Node '{node}' links to unknown target '{target}'")]
    UnknownTarget {
        /// The node holding the link.
        node: String,
        /// The unresolvable target.
        target: String,
    },
    /// The named nodes reference each other in a cycle.
    #[error("Reference cycle through node '{0}'")]
    Cycle(String),
    /// A node could not be converted or encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The store rejected a block.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Encodes every node of `description` with `codec` and stores the blocks.
///
/// Returns the identifier of every named node.
pub async fn import_dag(
    store: &dyn BlockStore,
    codecs: &CodecRegistry,
    codec: Multicodec,
    description: &Value,
) -> Result<BTreeMap<String, Cid>, ImportError> {
    let nodes = description.as_object().ok_or(ImportError::NotAnObject)?;
    let order = encoding_order(nodes)?;

    let mut cids: BTreeMap<String, Cid> = BTreeMap::new();
    for name in order {
        let Some(value) = nodes.get(name) else {
            continue;
        };
        let node = from_json_with(value, &mut |target| match cids.get(target) {
            Some(cid) => Ok(*cid),
            None => target
                .parse::<Cid>()
                .map_err(|e| CodecError::Decode(format!("invalid link '{target}': {e}"))),
        })?;
        let block = codecs.encode(codec, &node)?;
        let cid = *block.cid();
        store.put(block).await?;
        tracing::debug!(target: "import", node = name, %cid, "imported node");
        cids.insert(name.to_string(), cid);
    }
    Ok(cids)
}

/// Orders node names so that every node comes after the nodes it links to.
fn encoding_order(nodes: &Map<String, Value>) -> Result<Vec<&str>, ImportError> {
    let mut refs: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, value) in nodes {
        let mut targets = Vec::new();
        collect_targets(value, &mut targets);
        let mut internal = Vec::new();
        for target in targets {
            if nodes.contains_key(target) {
                internal.push(target);
            } else if target.parse::<Cid>().is_err() {
                return Err(ImportError::UnknownTarget {
                    node: name.clone(),
                    target: target.to_string(),
                });
            }
        }
        refs.insert(name.as_str(), internal);
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(&str, bool)> = Vec::new();
    for start in nodes.keys() {
        stack.push((start.as_str(), false));
        while let Some((name, expanded)) = stack.pop() {
            if expanded {
                marks.insert(name, Mark::Done);
                order.push(name);
                continue;
            }
            // Nodes marked Visiting are exactly the current DFS path.
            match marks.get(name) {
                Some(Mark::Done) => continue,
                Some(Mark::Visiting) => return Err(ImportError::Cycle(name.to_string())),
                None => {}
            }
            marks.insert(name, Mark::Visiting);
            stack.push((name, true));
            for dep in refs.get(name).into_iter().flatten().rev() {
                match marks.get(dep) {
                    Some(Mark::Done) => {}
                    Some(Mark::Visiting) => return Err(ImportError::Cycle(dep.to_string())),
                    None => stack.push((*dep, false)),
                }
            }
        }
    }
    Ok(order)
}

fn collect_targets<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    if let Some(target) = link_target(value) {
        out.push(target);
        return;
    }
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_targets(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_targets(item, out)),
        _ => {}
    }
}

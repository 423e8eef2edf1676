// Path: crates/selector/tests/traversal.rs

use async_trait::async_trait;
use dagsel_api::storage::BlockStore;
use dagsel_selector::{Resolution, Selector, SelectorEngine};
use dagsel_storage::{import_dag, MemoryBlockStore};
use dagsel_types::error::{CodecError, ErrorCode, SelectorError, StorageError, TraversalError};
use dagsel_types::{Block, Cid, Multicodec};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts fetches so tests can assert how much was read.
#[derive(Default)]
struct CountingStore {
    inner: MemoryBlockStore,
    gets: AtomicUsize,
}

impl CountingStore {
    fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockStore for CountingStore {
    async fn get(&self, cid: &Cid) -> Result<Option<Block>, StorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(cid).await
    }

    async fn put(&self, block: Block) -> Result<(), StorageError> {
        self.inner.put(block).await
    }
}

/// Fails every read.
struct BrokenStore;

#[async_trait]
impl BlockStore for BrokenStore {
    async fn get(&self, _cid: &Cid) -> Result<Option<Block>, StorageError> {
        Err(StorageError::Backend("disk on fire".into()))
    }

    async fn put(&self, _block: Block) -> Result<(), StorageError> {
        Ok(())
    }
}

struct Fixture {
    store: Arc<CountingStore>,
    engine: SelectorEngine,
    cids: BTreeMap<String, Cid>,
}

impl Fixture {
    async fn new(description: Value) -> Self {
        let store = Arc::new(CountingStore::default());
        let codecs = Arc::new(dagsel_codec::registry());
        let cids = import_dag(store.as_ref(), &codecs, Multicodec::DAG_JSON, &description)
            .await
            .unwrap();
        let engine = SelectorEngine::new(store.clone(), codecs);
        Self {
            store,
            engine,
            cids,
        }
    }

    fn cid(&self, name: &str) -> Cid {
        self.cids[name]
    }

    fn cids(&self, names: &[&str]) -> Vec<Cid> {
        names.iter().map(|n| self.cid(n)).collect()
    }

    fn document(&self, root: &str, selectors: Value) -> Value {
        json!({
            "cidRootedSelector": { "root": self.cid(root).to_string(), "selectors": selectors }
        })
    }

    async fn run(&self, root: &str, selectors: Value) -> (Vec<Cid>, Resolution) {
        let selection = self
            .engine
            .select_json(&self.document(root, selectors))
            .unwrap()
            .drain()
            .await;
        let cids = selection.cids();
        (cids, selection.outcome.unwrap())
    }
}

fn program(value: Value) -> Vec<Selector> {
    Selector::program_from_json(&value).unwrap()
}

fn chain() -> Value {
    json!({
        "a": { "name": "a", "next": { "/": "b" } },
        "b": { "name": "b", "next": { "/": "c" } },
        "c": { "name": "c", "data": { "/": "d" } },
        "d": { "payload": [1, 2, 3] },
    })
}

fn tree() -> Value {
    json!({
        "root": { "name": "root", "children": [{ "/": "a" }, { "/": "b" }] },
        "a": { "name": "a", "children": [{ "/": "c" }] },
        "b": { "name": "b", "children": [] },
        "c": { "name": "c", "children": [] },
    })
}

#[tokio::test]
async fn test_root_only_for_empty_program() {
    let fx = Fixture::new(chain()).await;
    for selectors in [json!([]), Value::Null] {
        let (cids, resolution) = fx.run("a", selectors).await;
        assert_eq!(cids, fx.cids(&["a"]));
        assert_eq!(resolution, Resolution::Resolved);
    }
}

#[tokio::test]
async fn test_position_out_of_range_is_unresolved() {
    let fx = Fixture::new(json!({ "a": { "list": [{ "x": 1 }] } })).await;
    let (cids, resolution) = fx
        .run(
            "a",
            json!([
                { "selectPath": "list" },
                { "selectArrayPosition": 5 },
                { "selectPath": "x" }
            ]),
        )
        .await;

    assert_eq!(cids, fx.cids(&["a"]));
    assert_eq!(
        resolution,
        Resolution::Unresolved(program(json!([
            { "selectArrayPosition": 5 },
            { "selectPath": "x" }
        ])))
    );
}

#[tokio::test]
async fn test_siblings_visited_after_branch_in_order() {
    let fx = Fixture::new(json!({
        "root": { "items": [{ "/": "x" }, { "/": "y" }, { "/": "z" }] },
        "x": { "name": "x", "next": { "/": "x2" } },
        "y": { "name": "y" },
        "z": { "name": "z", "next": { "/": "z2" } },
        "x2": { "name": "x2" },
        "z2": { "name": "z2" },
    }))
    .await;
    let (cids, resolution) = fx
        .run(
            "root",
            json!([{ "selectPath": "items" }, { "selectArrayAll": null }, { "selectPath": "next" }]),
        )
        .await;

    // `y` is emitted even though it does not match.
    assert_eq!(cids, fx.cids(&["root", "x", "x2", "y", "z", "z2"]));
    assert_eq!(resolution, Resolution::Resolved);
}

#[tokio::test]
async fn test_last_branch_decides_resolution() {
    let fx = Fixture::new(json!({
        "root": { "items": [{ "/": "x" }, { "/": "y" }] },
        "x": { "name": "x", "next": { "/": "x2" } },
        "y": { "name": "y" },
        "x2": { "name": "x2" },
    }))
    .await;
    let (cids, resolution) = fx
        .run(
            "root",
            json!([{ "selectPath": "items" }, { "selectArrayAll": null }, { "selectPath": "next" }]),
        )
        .await;

    assert_eq!(cids, fx.cids(&["root", "x", "x2", "y"]));
    assert_eq!(
        resolution,
        Resolution::Unresolved(program(json!([{ "selectPath": "next" }])))
    );
}

#[tokio::test]
async fn test_slice_selects_a_window() {
    let fx = Fixture::new(json!({
        "root": { "items": [{ "/": "l0" }, { "/": "l1" }, { "/": "l2" }, { "/": "l3" }] },
        "l0": 0, "l1": 1, "l2": 2, "l3": 3,
    }))
    .await;
    let (cids, _) = fx
        .run(
            "root",
            json!([{ "selectPath": "items" }, { "selectArraySlice": { "start": 1, "end": 3 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["root", "l1", "l2"]));

    let (cids, resolution) = fx
        .run(
            "root",
            json!([{ "selectPath": "items" }, { "selectArraySlice": { "start": 9 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["root"]));
    assert!(!resolution.is_resolved());
}

#[tokio::test]
async fn test_recursion_until_no_match_then_continues() {
    let fx = Fixture::new(chain()).await;
    let (cids, resolution) = fx
        .run(
            "a",
            json!([
                { "selectRecursive": { "follow": [{ "selectPath": "next" }] } },
                { "selectPath": "data" }
            ]),
        )
        .await;

    assert_eq!(cids, fx.cids(&["a", "b", "c", "d"]));
    assert_eq!(resolution, Resolution::Resolved);
}

#[tokio::test]
async fn test_recursion_depth_limit_counts_passes() {
    let fx = Fixture::new(chain()).await;
    let (cids, resolution) = fx
        .run(
            "a",
            json!([
                { "selectRecursive": { "follow": [{ "selectPath": "next" }], "depthLimit": 1 } },
                { "selectPath": "data" }
            ]),
        )
        .await;

    assert_eq!(cids, fx.cids(&["a", "b"]));
    assert_eq!(
        resolution,
        Resolution::Unresolved(program(json!([{ "selectPath": "data" }])))
    );

    let (cids, _) = fx
        .run(
            "a",
            json!([{ "selectRecursive": { "follow": [{ "selectPath": "next" }], "depthLimit": 2 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["a", "b", "c"]));
}

#[tokio::test]
async fn test_zero_depth_limit_performs_no_pass() {
    let fx = Fixture::new(chain()).await;
    let (cids, resolution) = fx
        .run(
            "a",
            json!([{ "selectRecursive": { "follow": [{ "selectPath": "next" }], "depthLimit": 0 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["a"]));
    assert_eq!(resolution, Resolution::Resolved);

    let (_, resolution) = fx
        .run(
            "a",
            json!([
                { "selectRecursive": { "follow": [{ "selectPath": "next" }], "depthLimit": 0 } },
                { "selectPath": "name" }
            ]),
        )
        .await;
    assert_eq!(
        resolution,
        Resolution::Unresolved(program(json!([{ "selectPath": "name" }])))
    );
}

#[tokio::test]
async fn test_recursion_over_tree_backtracks_depth_first() {
    let fx = Fixture::new(tree()).await;
    let follow = json!([{ "selectPath": "children" }, { "selectArrayAll": null }]);

    let (cids, resolution) = fx
        .run("root", json!([{ "selectRecursive": { "follow": follow } }]))
        .await;
    assert_eq!(cids, fx.cids(&["root", "a", "c", "b"]));
    assert_eq!(resolution, Resolution::Resolved);

    let (cids, _) = fx
        .run(
            "root",
            json!([{ "selectRecursive": { "follow": follow, "depthLimit": 1 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["root", "a", "b"]));
}

#[tokio::test]
async fn test_resumed_sibling_keeps_budget_from_discovery() {
    let fx = Fixture::new(json!({
        "root": { "name": "root", "children": [{ "/": "a" }, { "/": "b" }] },
        "a": { "name": "a", "children": [{ "/": "c" }] },
        "b": { "name": "b", "children": [{ "/": "d" }] },
        "c": { "name": "c", "children": [{ "/": "e" }] },
        "d": { "name": "d", "children": [] },
        "e": { "name": "e", "children": [] },
    }))
    .await;
    let follow = json!([{ "selectPath": "children" }, { "selectArrayAll": null }]);

    // `b` is found during the first pass and still has two passes left when
    // resumed, although the `a` branch spent them all.
    let (cids, resolution) = fx
        .run(
            "root",
            json!([{ "selectRecursive": { "follow": follow, "depthLimit": 2 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["root", "a", "c", "b", "d"]));
    assert_eq!(resolution, Resolution::Resolved);

    let (cids, resolution) = fx
        .run(
            "root",
            json!([{ "selectRecursive": { "follow": follow, "depthLimit": 3 } }]),
        )
        .await;
    assert_eq!(cids, fx.cids(&["root", "a", "c", "e", "b", "d"]));
    assert_eq!(resolution, Resolution::Resolved);
}

#[tokio::test]
async fn test_link_at_block_root_is_not_followed() {
    let fx = Fixture::new(json!({
        "alias": { "/": "target" },
        "target": { "name": "target" },
    }))
    .await;
    let (cids, resolution) = fx.run("alias", json!([{ "selectPath": "name" }])).await;
    assert_eq!(cids, fx.cids(&["alias"]));
    assert!(!resolution.is_resolved());
}

#[tokio::test]
async fn test_invalid_documents_fetch_nothing() {
    let fx = Fixture::new(chain()).await;
    let before = fx.store.gets();
    let root = fx.cid("a").to_string();

    let nested = json!({
        "cidRootedSelector": {
            "root": root,
            "selectors": [{
                "selectRecursive": {
                    "follow": [{ "selectRecursive": { "follow": [{ "selectPath": "next" }] } }]
                }
            }]
        }
    });
    let two_keys = json!({
        "cidRootedSelector": { "root": root },
        "otherSelector": {}
    });
    for document in [nested, two_keys] {
        assert!(matches!(
            fx.engine.select_json(&document),
            Err(SelectorError::InvalidSelector(_))
        ));
    }
    assert_eq!(fx.store.gets(), before);
}

#[tokio::test]
async fn test_bad_root_is_rejected_before_any_fetch() {
    let fx = Fixture::new(chain()).await;
    let before = fx.store.gets();
    let mut non_minimal = fx.cid("a").to_string();
    // Re-encode the codec varint `a9 02` with a redundant trailing group.
    non_minimal.replace_range(3..7, "a98200");

    for root in ["zQmNotBase16", "f0171", non_minimal.as_str()] {
        let err = fx
            .engine
            .select_json(&json!({ "cidRootedSelector": { "root": root } }))
            .unwrap_err();
        assert!(matches!(err, SelectorError::InvalidRoot(_)), "accepted {root}");
        assert_eq!(err.code(), "SELECTOR_INVALID_ROOT");
    }
    assert_eq!(fx.store.gets(), before);
}

#[tokio::test]
async fn test_nothing_is_fetched_before_the_first_pull() {
    let fx = Fixture::new(chain()).await;
    let before = fx.store.gets();
    let mut traversal = fx
        .engine
        .select_json(&fx.document("a", json!([{ "selectPath": "next" }])))
        .unwrap();
    assert_eq!(fx.store.gets(), before);

    let root = traversal.next_block().await.unwrap().unwrap();
    assert_eq!(root.cid(), &fx.cid("a"));
    assert_eq!(fx.store.gets(), before + 1);
}

#[tokio::test]
async fn test_missing_block_aborts_after_prefix() {
    let missing = Cid::hash(Multicodec::DAG_JSON, b"never stored");
    let fx = Fixture::new(json!({
        "a": { "next": { "/": "b" } },
        "b": { "next": { "/": missing.to_string() } },
    }))
    .await;
    let mut traversal = fx
        .engine
        .select_json(&fx.document("a", json!([{ "selectPath": "next" }, { "selectPath": "next" }])))
        .unwrap();

    assert_eq!(traversal.next_block().await.unwrap().unwrap().cid(), &fx.cid("a"));
    assert_eq!(traversal.next_block().await.unwrap().unwrap().cid(), &fx.cid("b"));
    assert!(matches!(
        traversal.next_block().await,
        Err(TraversalError::NotFound(cid)) if cid == missing
    ));
    assert!(traversal.next_block().await.unwrap().is_none());
    assert!(traversal.resolution().is_none());

    let selection = fx
        .engine
        .select_json(&fx.document("a", json!([{ "selectPath": "next" }, { "selectPath": "next" }])))
        .unwrap()
        .drain()
        .await;
    assert_eq!(selection.cids(), fx.cids(&["a", "b"]));
    assert!(selection.outcome.is_err());
}

#[tokio::test]
async fn test_undecodable_blocks_are_fatal() {
    let store = Arc::new(MemoryBlockStore::new());
    let garbage = Block::encoded(Multicodec::DAG_JSON, b"{ not json".to_vec());
    let raw = Block::encoded(Multicodec(0x55), b"raw bytes".to_vec());
    store.put(garbage.clone()).await.unwrap();
    store.put(raw.clone()).await.unwrap();
    let engine = SelectorEngine::new(store, Arc::new(dagsel_codec::registry()));

    for (block, unsupported) in [(garbage, false), (raw, true)] {
        let document = json!({ "cidRootedSelector": { "root": block.cid().to_string() } });
        let mut traversal = engine.select_json(&document).unwrap();
        match traversal.next_block().await {
            Err(TraversalError::Decode { cid, source }) => {
                assert_eq!(&cid, block.cid());
                assert_eq!(matches!(source, CodecError::Unsupported(_)), unsupported);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(traversal.next_block().await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_store_failures_are_fatal() {
    let engine = SelectorEngine::new(Arc::new(BrokenStore), Arc::new(dagsel_codec::registry()));
    let root = Cid::hash(Multicodec::DAG_JSON, b"{}");
    let selection = engine
        .select_json(&json!({ "cidRootedSelector": { "root": root.to_string() } }))
        .unwrap()
        .drain()
        .await;
    assert!(selection.blocks.is_empty());
    assert!(matches!(
        selection.outcome,
        Err(TraversalError::Storage(StorageError::Backend(_)))
    ));
}

// Path: crates/selector/src/engine/mod.rs

//! The traversal engine.
//!
//! [`SelectorEngine`] holds the injected block store and codec registry and
//! hands out one [`Traversal`] per document. A traversal is a pull-based
//! state machine: each call to [`Traversal::next_block`] walks until it has
//! fetched one more block, or until the walk is over. Graph depth lives on an
//! explicit stack of frames, never on the call stack.

mod frame;
mod recursion;
mod step;

use crate::document::RootedSelector;
use crate::program::Program;
use crate::selector::Selector;
use dagsel_api::codec::CodecRegistry;
use dagsel_api::storage::BlockStore;
use dagsel_types::error::{SelectorError, TraversalError};
use dagsel_types::{Block, Cid, Node};
use frame::{backtrack, Cursor, Focus, Frame};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use step::{step, Progress};

/// How a finished traversal ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The last branch consumed the whole program.
    Resolved,
    /// No branch was left while these instructions were still unconsumed.
    Unresolved(Vec<Selector>),
}

impl Resolution {
    /// True for [`Resolution::Resolved`].
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// The unconsumed instructions; empty when resolved.
    pub fn remaining(&self) -> &[Selector] {
        match self {
            Self::Resolved => &[],
            Self::Unresolved(rest) => rest,
        }
    }

    /// The unconsumed instructions as a JSON program.
    pub fn remaining_json(&self) -> Value {
        Value::Array(self.remaining().iter().map(Selector::to_json).collect())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => f.write_str("resolved"),
            Self::Unresolved(_) => write!(f, "unresolved {}", self.remaining_json()),
        }
    }
}

/// Evaluates selector documents against a block store.
#[derive(Clone)]
pub struct SelectorEngine {
    store: Arc<dyn BlockStore>,
    codecs: Arc<CodecRegistry>,
}

impl fmt::Debug for SelectorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorEngine")
            .field("codecs", &self.codecs)
            .finish_non_exhaustive()
    }
}

impl SelectorEngine {
    /// Creates an engine over shared, read-only capabilities.
    pub fn new(store: Arc<dyn BlockStore>, codecs: Arc<CodecRegistry>) -> Self {
        Self { store, codecs }
    }

    /// Starts a traversal. Nothing is fetched until the first pull.
    pub fn select(&self, document: &RootedSelector) -> Traversal {
        Traversal {
            store: self.store.clone(),
            codecs: self.codecs.clone(),
            root: *document.root(),
            program: Program::new(document.selectors().clone()),
            state: State::Pending,
            cursor: None,
            stack: Vec::new(),
            leftover: Vec::new(),
            emitted: 0,
        }
    }

    /// Parses a JSON document and starts a traversal.
    ///
    /// A malformed document is rejected before anything is fetched.
    pub fn select_json(&self, document: &Value) -> Result<Traversal, SelectorError> {
        Ok(self.select(&RootedSelector::from_json(document)?))
    }
}

#[derive(Debug)]
enum State {
    Pending,
    Running,
    Done(Resolution),
    Failed,
}

/// One lazy evaluation of a selector document.
///
/// Blocks come out in visit order, the root first. After a fatal error the
/// traversal is fused and every further pull yields `Ok(None)`.
pub struct Traversal {
    store: Arc<dyn BlockStore>,
    codecs: Arc<CodecRegistry>,
    root: Cid,
    program: Program,
    state: State,
    cursor: Option<Cursor>,
    stack: Vec<Frame>,
    leftover: Vec<Selector>,
    emitted: usize,
}

impl fmt::Debug for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("frames", &self.stack.len())
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl Traversal {
    /// The root block of the document.
    pub fn root(&self) -> &Cid {
        &self.root
    }

    /// Number of blocks emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// How the traversal ended, once it has ended without a fatal error.
    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.state {
            State::Done(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Walks until the next block is fetched.
    ///
    /// Returns `Ok(None)` when the walk is over; [`Traversal::resolution`]
    /// then tells how it ended.
    pub async fn next_block(&mut self) -> Result<Option<Block>, TraversalError> {
        match self.state {
            State::Pending => {
                let root = self.root;
                let (block, node) = self.load(&root).await?;
                self.state = State::Running;
                self.cursor = Some(Cursor::top(Focus::block(node), self.program.clone()));
                return Ok(Some(block));
            }
            State::Running => {}
            State::Done(_) | State::Failed => return Ok(None),
        }

        loop {
            let progress = match self.cursor.take() {
                Some(cursor) => step(cursor, &mut self.stack),
                None => match backtrack(&mut self.stack) {
                    Some(progress) => progress,
                    None => {
                        self.finish();
                        return Ok(None);
                    }
                },
            };
            match progress {
                Progress::Moved(cursor) => self.cursor = Some(cursor),
                Progress::Cross {
                    cid,
                    pending,
                    scope,
                } => {
                    let (block, node) = self.load(&cid).await?;
                    self.cursor = Some(Cursor {
                        node: Focus::block(node),
                        pending,
                        scope,
                    });
                    return Ok(Some(block));
                }
                Progress::Exhausted(rest) => self.leftover = rest,
            }
        }
    }

    /// Pulls every remaining block.
    ///
    /// On a fatal error, `blocks` still holds the prefix emitted before it.
    pub async fn drain(mut self) -> Selection {
        let mut blocks = Vec::new();
        loop {
            match self.next_block().await {
                Ok(Some(block)) => blocks.push(block),
                Ok(None) => break,
                Err(e) => {
                    return Selection {
                        blocks,
                        outcome: Err(e),
                    }
                }
            }
        }
        let outcome = match self.state {
            State::Done(resolution) => Ok(resolution),
            _ => Ok(Resolution::Resolved),
        };
        Selection { blocks, outcome }
    }

    async fn load(&mut self, cid: &Cid) -> Result<(Block, Node), TraversalError> {
        match self.fetch(cid).await {
            Ok(loaded) => {
                self.emitted += 1;
                Ok(loaded)
            }
            Err(e) => {
                tracing::warn!(target: "selector", %cid, error = %e, "traversal aborted");
                self.state = State::Failed;
                self.cursor = None;
                self.stack.clear();
                Err(e)
            }
        }
    }

    async fn fetch(&self, cid: &Cid) -> Result<(Block, Node), TraversalError> {
        tracing::debug!(target: "selector", %cid, "loading block");
        let block = self
            .store
            .get(cid)
            .await?
            .ok_or(TraversalError::NotFound(*cid))?;
        let node = self
            .codecs
            .decode(&block)
            .map_err(|source| TraversalError::Decode { cid: *cid, source })?;
        Ok((block, node))
    }

    fn finish(&mut self) {
        let resolution = if self.leftover.is_empty() {
            Resolution::Resolved
        } else {
            Resolution::Unresolved(std::mem::take(&mut self.leftover))
        };
        tracing::info!(
            target: "selector",
            root = %self.root,
            blocks = self.emitted,
            %resolution,
            "traversal finished"
        );
        self.state = State::Done(resolution);
    }
}

/// Everything one traversal produced.
#[derive(Debug)]
pub struct Selection {
    /// Emitted blocks in order.
    pub blocks: Vec<Block>,
    /// How the traversal ended.
    pub outcome: Result<Resolution, TraversalError>,
}

impl Selection {
    /// Identifiers of the emitted blocks, in order.
    pub fn cids(&self) -> Vec<Cid> {
        self.blocks.iter().map(|b| *b.cid()).collect()
    }
}

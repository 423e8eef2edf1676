// Path: crates/selector/src/engine/step.rs

//! The non-recursive step.

use super::frame::{Cursor, Focus, Frame, Scope};
use super::recursion::{end_of_pass, enter_recursion, halt};
use crate::program::Program;
use crate::selector::{Match, Selector};
use dagsel_types::Cid;

/// What one step of the walk produced.
#[derive(Debug)]
pub(crate) enum Progress {
    /// The walk continues in memory.
    Moved(Cursor),
    /// The walk continues inside another block, which must be fetched and
    /// emitted first.
    Cross {
        cid: Cid,
        pending: Program,
        scope: Scope,
    },
    /// The branch ended with these instructions unconsumed.
    Exhausted(Vec<Selector>),
}

impl Progress {
    /// Continues with `node`, crossing into its block if it is a link.
    pub(crate) fn land(node: Focus, pending: Program, scope: Scope) -> Self {
        match node.node().as_link().copied() {
            Some(cid) => Self::Cross {
                cid,
                pending,
                scope,
            },
            None => Self::Moved(Cursor {
                node,
                pending,
                scope,
            }),
        }
    }
}

/// Applies the next pending instruction to the cursor's node.
pub(crate) fn step(cursor: Cursor, stack: &mut Vec<Frame>) -> Progress {
    let Cursor {
        node,
        mut pending,
        scope,
    } = cursor;

    let Some(selector) = pending.next() else {
        return match scope {
            Scope::Top => Progress::Exhausted(Vec::new()),
            Scope::Recursive(recursion) => end_of_pass(node, recursion),
        };
    };

    // `follow` never holds a recursive instruction, so this is always top level.
    if let Selector::Recursive(recursive) = &selector {
        return enter_recursion(node, recursive, pending);
    }

    match selector.visit(node.node()) {
        Some(Match { next, siblings }) => {
            if !siblings.is_empty() {
                stack.push(Frame {
                    parent: node.clone(),
                    siblings: siblings.into(),
                    pending: pending.clone(),
                    scope: scope.for_siblings(),
                });
            }
            Progress::land(node.child(next), pending, scope)
        }
        None => no_match(selector, pending, scope),
    }
}

fn no_match(selector: Selector, pending: Program, scope: Scope) -> Progress {
    match scope {
        Scope::Top => {
            let mut rest = Vec::with_capacity(pending.remaining().len() + 1);
            rest.push(selector);
            rest.extend_from_slice(pending.remaining());
            Progress::Exhausted(rest)
        }
        Scope::Recursive(recursion) => halt(recursion),
    }
}

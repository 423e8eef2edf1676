// Path: crates/selector/src/engine/recursion.rs

//! The recursive sub-machine.
//!
//! A recursive instruction runs its `follow` program in passes. Each pass
//! starts from a fresh cursor over the shared definition, and the depth budget
//! drops by one when a pass completes, however many blocks it crossed.

use super::frame::{Cursor, Focus, RecursionScope, Scope};
use super::step::Progress;
use crate::program::Program;
use crate::selector::SelectRecursive;

/// Starts the first pass at `node`. `after` holds the instructions that
/// follow the recursive one.
pub(crate) fn enter_recursion(node: Focus, recursive: &SelectRecursive, after: Program) -> Progress {
    if recursive.depth_limit() == Some(0) {
        tracing::debug!(target: "selector", "recursion with depth limit 0 performs no pass");
        return Progress::Exhausted(after.remaining().to_vec());
    }
    Progress::Moved(pass(
        node,
        RecursionScope {
            follow: recursive.follow().clone(),
            depth: recursive.depth_limit(),
            after,
            pass_start: None,
        },
    ))
}

/// Completes a pass at `node`: starts the next one, or leaves the recursion
/// once the budget is spent.
pub(crate) fn end_of_pass(node: Focus, scope: RecursionScope) -> Progress {
    let depth = scope.depth.map(|d| d.saturating_sub(1));
    if depth == Some(0) {
        tracing::debug!(target: "selector", "recursion depth limit reached");
        return Progress::Moved(Cursor::top(node, scope.after));
    }
    Progress::Moved(pass(node, RecursionScope { depth, ..scope }))
}

/// Leaves the recursion after a pass failed to match.
///
/// The following instructions continue from where the failed pass started.
/// A sibling resumed mid-pass has no start to fall back to, so its branch
/// ends there.
pub(crate) fn halt(scope: RecursionScope) -> Progress {
    match scope.pass_start {
        Some(start) => {
            tracing::debug!(target: "selector", "recursion halted, continuing from pass start");
            Progress::Moved(Cursor::top(start, scope.after))
        }
        None => {
            tracing::debug!(target: "selector", "recursion halted on a sibling branch");
            Progress::Exhausted(scope.after.remaining().to_vec())
        }
    }
}

fn pass(node: Focus, scope: RecursionScope) -> Cursor {
    Cursor {
        pending: Program::new(scope.follow.clone()),
        scope: Scope::Recursive(RecursionScope {
            pass_start: Some(node.clone()),
            ..scope
        }),
        node,
    }
}

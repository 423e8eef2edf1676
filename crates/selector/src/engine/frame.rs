// Path: crates/selector/src/engine/frame.rs

//! Walk state: the current cursor and the pending-work stack.

use super::step::Progress;
use crate::program::Program;
use crate::selector::{Selector, Step};
use dagsel_types::Node;
use std::collections::VecDeque;
use std::sync::Arc;

static MISSING: Node = Node::Null;

/// A node inside a decoded block: the shared block root plus the steps
/// leading down to it. Cloning never copies the block's contents.
#[derive(Debug, Clone)]
pub(crate) struct Focus {
    root: Arc<Node>,
    path: Vec<Step>,
}

impl Focus {
    pub(crate) fn block(root: Node) -> Self {
        Self {
            root: Arc::new(root),
            path: Vec::new(),
        }
    }

    /// The focused node.
    ///
    /// Paths are only ever built from matches against the same block, so
    /// they always resolve; a broken one reads as null.
    pub(crate) fn node(&self) -> &Node {
        self.path
            .iter()
            .try_fold(self.root.as_ref(), |node, step| step.apply(node))
            .unwrap_or(&MISSING)
    }

    pub(crate) fn child(&self, step: Step) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(step);
        Self {
            root: self.root.clone(),
            path,
        }
    }
}

/// Where the walk currently stands.
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    pub(crate) node: Focus,
    pub(crate) pending: Program,
    pub(crate) scope: Scope,
}

impl Cursor {
    pub(crate) fn top(node: Focus, pending: Program) -> Self {
        Self {
            node,
            pending,
            scope: Scope::Top,
        }
    }
}

/// Which program `Cursor::pending` belongs to.
#[derive(Debug, Clone)]
pub(crate) enum Scope {
    /// The document's own program.
    Top,
    /// A pass of a recursive instruction's `follow` program.
    Recursive(RecursionScope),
}

impl Scope {
    /// The scope recorded with siblings found at the current step.
    ///
    /// Siblings keep the budget in effect when they were found. They resume
    /// mid-pass and have no pass start of their own.
    pub(crate) fn for_siblings(&self) -> Self {
        match self {
            Self::Top => Self::Top,
            Self::Recursive(scope) => Self::Recursive(RecursionScope {
                follow: scope.follow.clone(),
                depth: scope.depth,
                after: scope.after.clone(),
                pass_start: None,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecursionScope {
    /// Definition each pass restarts from.
    pub(crate) follow: Arc<[Selector]>,
    /// Passes left, including the running one. `None` is unbounded.
    pub(crate) depth: Option<u64>,
    /// Top-level instructions following the recursive one.
    pub(crate) after: Program,
    /// Node the running pass started from.
    pub(crate) pass_start: Option<Focus>,
}

/// Siblings deferred until the current branch is exhausted.
#[derive(Debug)]
pub(crate) struct Frame {
    /// The node the siblings were found under.
    pub(crate) parent: Focus,
    pub(crate) siblings: VecDeque<Step>,
    pub(crate) pending: Program,
    pub(crate) scope: Scope,
}

/// Resumes the most recently deferred sibling.
///
/// The frame goes back on the stack while it still holds siblings, so they
/// are visited in discovery order. Returns `None` once the stack is empty.
pub(crate) fn backtrack(stack: &mut Vec<Frame>) -> Option<Progress> {
    while let Some(mut frame) = stack.pop() {
        let Some(sibling) = frame.siblings.pop_front() else {
            continue;
        };
        tracing::debug!(
            target: "selector",
            left = frame.siblings.len(),
            frames = stack.len(),
            "backtracking to sibling"
        );
        let node = frame.parent.child(sibling);
        if frame.siblings.is_empty() {
            return Some(Progress::land(node, frame.pending, frame.scope));
        }
        let progress = Progress::land(node, frame.pending.clone(), frame.scope.clone());
        stack.push(frame);
        return Some(progress);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagsel_types::{Cid, Multicodec};
    use std::collections::BTreeMap;

    fn landed(progress: Option<Progress>) -> Node {
        match progress {
            Some(Progress::Moved(cursor)) => cursor.node.node().clone(),
            Some(Progress::Cross { cid, .. }) => Node::Link(cid),
            other => panic!("unexpected {other:?}"),
        }
    }

    fn frame(parent: &Focus, siblings: &[usize]) -> Frame {
        Frame {
            parent: parent.clone(),
            siblings: siblings.iter().copied().map(Step::Index).collect(),
            pending: Program::empty(),
            scope: Scope::Top,
        }
    }

    #[test]
    fn test_siblings_in_discovery_order_frames_lifo() {
        let link = Cid::hash(Multicodec::DAG_JSON, b"x");
        let block = Focus::block(Node::List(vec![
            Node::Integer(1),
            Node::Integer(2),
            Node::Link(link),
        ]));
        let mut stack = vec![frame(&block, &[0]), frame(&block, &[1, 2])];

        assert_eq!(landed(backtrack(&mut stack)), Node::Integer(2));
        assert_eq!(stack.len(), 2);
        assert_eq!(landed(backtrack(&mut stack)), Node::Link(link));
        assert_eq!(landed(backtrack(&mut stack)), Node::Integer(1));
        assert!(stack.is_empty());
        assert!(backtrack(&mut stack).is_none());
    }

    #[test]
    fn test_focus_shares_the_block() {
        let block = Focus::block(Node::Map(BTreeMap::from([(
            "list".to_string(),
            Node::List(vec![Node::Integer(7), Node::Bytes(vec![0; 1024])]),
        )])));
        let list = block.child(Step::Field("list".into()));
        let first = list.child(Step::Index(0));
        let copy = first.clone();

        assert_eq!(first.node(), &Node::Integer(7));
        assert!(Arc::ptr_eq(&block.root, &copy.root));
        assert_eq!(Arc::strong_count(&block.root), 4);
        assert!(std::ptr::eq(copy.node(), first.node()));
        assert_eq!(block.child(Step::Index(0)).node(), &Node::Null);
    }

    #[test]
    fn test_sibling_scope_drops_pass_start() {
        let scope = Scope::Recursive(RecursionScope {
            follow: Arc::from(Vec::new()),
            depth: Some(3),
            after: Program::empty(),
            pass_start: Some(Focus::block(Node::Null)),
        });
        match scope.for_siblings() {
            Scope::Recursive(s) => {
                assert_eq!(s.depth, Some(3));
                assert!(s.pass_start.is_none());
            }
            Scope::Top => panic!("scope changed"),
        }
    }
}

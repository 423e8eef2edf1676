// Path: crates/selector/src/program.rs

//! A cursor over a shared, immutable selector program.

use crate::selector::Selector;
use std::sync::Arc;

/// An ordered selector program consumed front to back.
///
/// Cloning a program clones the cursor, not the instructions. Restarting a
/// recursive pass builds a new cursor at position zero over the same
/// definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    selectors: Arc<[Selector]>,
    position: usize,
}

impl Program {
    /// A cursor at the start of `selectors`.
    pub fn new(selectors: Arc<[Selector]>) -> Self {
        Self {
            selectors,
            position: 0,
        }
    }

    /// A program with no instructions.
    pub fn empty() -> Self {
        Self::new(Arc::from(Vec::new()))
    }

    /// The instructions not yet consumed.
    pub fn remaining(&self) -> &[Selector] {
        self.selectors.get(self.position..).unwrap_or(&[])
    }

    /// True when every instruction has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }
}

impl Iterator for Program {
    type Item = Selector;

    fn next(&mut self) -> Option<Selector> {
        let selector = self.selectors.get(self.position)?.clone();
        self.position += 1;
        Some(selector)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining().len();
        (n, Some(n))
    }
}

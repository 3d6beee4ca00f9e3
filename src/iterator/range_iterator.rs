use std::{iter::FusedIterator, sync::Arc};

use crate::util::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    PreFirst,
    At(usize),
    Exhausted,
}

/// Cursor over merged keys in `[first_index, end)`
///
/// `current_key()` and `current_index()` are only `Some` directly after an
/// `advance()` that returned `true`.
#[derive(Debug, Clone)]
pub struct RangeIterator {
    keys: Arc<Vec<Key>>,
    first: usize,
    end: usize,
    state: State,
}

impl RangeIterator {
    /// Create an iterator starting at `first_index` and including
    /// `last_index`. With no `last_index` it runs to the end of `keys`.
    pub fn new(keys: Arc<Vec<Key>>, first_index: usize, last_index: Option<usize>) -> Self {
        let end = match last_index {
            Some(last) => last.saturating_add(1).min(keys.len()),
            None => keys.len(),
        };
        RangeIterator {
            keys,
            first: first_index,
            end,
            state: State::PreFirst,
        }
    }

    /// An iterator that yields nothing.
    pub fn empty() -> Self {
        RangeIterator {
            keys: Arc::new(Vec::new()),
            first: 0,
            end: 0,
            state: State::PreFirst,
        }
    }

    /// Rewind to the pre-first state.
    pub fn reset(&mut self) {
        self.state = State::PreFirst;
    }

    /// Move to the next key in range.
    ///
    /// Returns `false` once the range is used up, and keeps returning `false`
    /// until [`reset`](Self::reset).
    pub fn advance(&mut self) -> bool {
        let next = match self.state {
            State::PreFirst => self.first,
            State::At(index) => index + 1,
            State::Exhausted => return false,
        };

        if next < self.end {
            self.state = State::At(next);
            true
        } else {
            self.state = State::Exhausted;
            false
        }
    }

    pub fn current_key(&self) -> Option<Key> {
        match self.state {
            State::At(index) => Some(self.keys[index]),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            State::At(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Number of keys a full pass from pre-first yields.
    pub fn range_len(&self) -> usize {
        self.end.saturating_sub(self.first)
    }

    fn remaining(&self) -> usize {
        match self.state {
            State::PreFirst => self.range_len(),
            State::At(index) => self.end.saturating_sub(index + 1),
            State::Exhausted => 0,
        }
    }
}

impl Iterator for RangeIterator {
    type Item = (usize, Key);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.advance() {
            return None;
        }
        match self.state {
            State::At(index) => Some((index, self.keys[index])),
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RangeIterator {}

impl FusedIterator for RangeIterator {}

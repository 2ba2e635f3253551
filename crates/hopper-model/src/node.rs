// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Branching decisions of a branch-and-price tree node.
//!
//! A node is described by two lists of item pairs: pairs that must end up in
//! different bins (`separate`) and pairs that must share a bin (`together`).
//! The tree driver owns the nodes; the engine only reads them.

use crate::index::ItemIndex;
use smallvec::SmallVec;

/// Inline storage for the pair lists; most nodes sit at a shallow depth.
pub type PairList = SmallVec<[ItemPair; 8]>;

/// An unordered pair of items, stored with `first <= second`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ItemPair {
    first: ItemIndex,
    second: ItemIndex,
}

impl ItemPair {
    /// Creates a pair, ordering the two items.
    ///
    /// ```rust
    /// # use hopper_model::{index::ItemIndex, node::ItemPair};
    /// let p = ItemPair::new(ItemIndex::new(3), ItemIndex::new(1));
    /// assert_eq!(p.first().get(), 1);
    /// assert_eq!(p.second().get(), 3);
    /// ```
    #[inline]
    pub fn new(a: ItemIndex, b: ItemIndex) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// Creates a pair from raw item positions.
    #[inline]
    pub fn from_raw(a: usize, b: usize) -> Self {
        Self::new(ItemIndex::new(a), ItemIndex::new(b))
    }

    /// The smaller item.
    #[inline(always)]
    pub fn first(&self) -> ItemIndex {
        self.first
    }

    /// The larger item.
    #[inline(always)]
    pub fn second(&self) -> ItemIndex {
        self.second
    }

    /// Returns the pair as raw positions.
    #[inline(always)]
    pub fn as_raw(&self) -> (usize, usize) {
        (self.first.get(), self.second.get())
    }
}

impl std::fmt::Display for ItemPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first.get(), self.second.get())
    }
}

/// A malformed branch node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// A pair references an item outside `0..num_items`.
    ItemOutOfRange { pair: ItemPair, num_items: usize },
    /// A pair joins an item with itself.
    DegeneratePair { pair: ItemPair },
}

impl std::fmt::Display for NodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemOutOfRange { pair, num_items } => write!(
                f,
                "Pair {} references an item outside of 0..{}",
                pair, num_items
            ),
            Self::DegeneratePair { pair } => {
                write!(f, "Pair {} joins an item with itself", pair)
            }
        }
    }
}

impl std::error::Error for NodeError {}

/// The pairwise branching decisions of one tree node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchNode {
    is_root: bool,
    depth: usize,
    separate: PairList,
    together: PairList,
}

impl BranchNode {
    /// The root node: no decisions, never pruned by bound.
    #[inline]
    pub fn root() -> Self {
        Self {
            is_root: true,
            depth: 0,
            separate: PairList::new(),
            together: PairList::new(),
        }
    }

    /// A node with explicit decisions.
    pub fn new<S, T>(is_root: bool, separate: S, together: T) -> Self
    where
        S: IntoIterator<Item = ItemPair>,
        T: IntoIterator<Item = ItemPair>,
    {
        let separate: PairList = separate.into_iter().collect();
        let together: PairList = together.into_iter().collect();
        let depth = separate.len() + together.len();
        Self {
            is_root,
            depth,
            separate,
            together,
        }
    }

    /// The child that forces `pair` into different bins.
    pub fn child_separate(&self, pair: ItemPair) -> Self {
        let mut child = self.child();
        child.separate.push(pair);
        child
    }

    /// The child that forces `pair` into the same bin.
    pub fn child_together(&self, pair: ItemPair) -> Self {
        let mut child = self.child();
        child.together.push(pair);
        child
    }

    #[inline]
    fn child(&self) -> Self {
        Self {
            is_root: false,
            depth: self.depth + 1,
            separate: self.separate.clone(),
            together: self.together.clone(),
        }
    }

    /// Returns `true` for the root node.
    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Number of decisions between the root and this node.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Pairs that must be placed in different bins.
    #[inline(always)]
    pub fn separate(&self) -> &[ItemPair] {
        &self.separate
    }

    /// Pairs that must be placed in the same bin.
    #[inline(always)]
    pub fn together(&self) -> &[ItemPair] {
        &self.together
    }

    /// Checks that every pair references two distinct items of an instance
    /// with `num_items` items.
    pub fn validate(&self, num_items: usize) -> Result<(), NodeError> {
        for &pair in self.separate.iter().chain(self.together.iter()) {
            if pair.second().get() >= num_items {
                return Err(NodeError::ItemOutOfRange { pair, num_items });
            }
            if pair.first() == pair.second() {
                return Err(NodeError::DegeneratePair { pair });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for BranchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |pairs: &[ItemPair]| {
            pairs
                .iter()
                .map(ItemPair::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "BranchNode(root: {}, depth: {}, separate: [{}], together: [{}])",
            self.is_root,
            self.depth,
            join(&self.separate),
            join(&self.together)
        )
    }
}

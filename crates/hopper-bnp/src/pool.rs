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

//! # Column Pool
//!
//! The append-only arena of bin patterns generated over the engine's
//! lifetime. Every branch node sees the same pool; what a node may use is
//! decided by a bound overlay in the master problem, never by removing or
//! flagging a column here.
//!
//! The first `num_items` columns are the singletons `{i}`, inserted at
//! construction. They keep every master problem feasible.
//!
//! Membership is stored twice: as a sorted item list for iteration and as a
//! `FixedBitSet` for constant-time `contains` checks and for duplicate
//! detection through an `FxHashMap` keyed by the bit set.

use fixedbitset::FixedBitSet;
use hopper_model::{
    index::{ColumnIndex, ItemIndex},
    node::ItemPair,
    problem::{ProblemData, Weight},
};
use rustc_hash::FxHashMap;

/// One bin pattern: a set of items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    items: Vec<ItemIndex>,
    members: FixedBitSet,
}

impl Column {
    fn from_members(members: FixedBitSet) -> Self {
        let items = members.ones().map(ItemIndex::new).collect();
        Self { items, members }
    }

    /// The items of the pattern, ascending.
    #[inline]
    pub fn items(&self) -> &[ItemIndex] {
        &self.items
    }

    /// Number of items in the pattern.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline(always)]
    pub fn contains(&self, item: ItemIndex) -> bool {
        self.members.contains(item.get())
    }

    /// Both items of `pair` are in the pattern.
    #[inline(always)]
    pub fn contains_both(&self, pair: ItemPair) -> bool {
        self.contains(pair.first()) && self.contains(pair.second())
    }

    /// Exactly one item of `pair` is in the pattern.
    #[inline(always)]
    pub fn splits(&self, pair: ItemPair) -> bool {
        self.contains(pair.first()) != self.contains(pair.second())
    }

    /// Total weight of the pattern's items.
    pub fn weight<W>(&self, data: &ProblemData<W>) -> W
    where
        W: Weight,
    {
        self.items
            .iter()
            .fold(W::zero(), |acc, &i| acc + data.item_weight(i))
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (k, item) in self.items.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item.get())?;
        }
        write!(f, "}}")
    }
}

/// The result of offering a pattern to the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The pattern was new and got this index.
    Inserted(ColumnIndex),
    /// The pattern was already stored under this index.
    Existing(ColumnIndex),
}

/// The append-only collection of generated columns.
#[derive(Clone, Debug)]
pub struct ColumnPool {
    num_items: usize,
    columns: Vec<Column>,
    lookup: FxHashMap<FixedBitSet, ColumnIndex>,
}

impl ColumnPool {
    /// Creates a pool seeded with one singleton column per item.
    pub fn with_singletons(num_items: usize) -> Self {
        let mut pool = Self {
            num_items,
            columns: Vec::with_capacity(num_items * 2),
            lookup: FxHashMap::default(),
        };
        for i in 0..num_items {
            let mut members = FixedBitSet::with_capacity(num_items);
            members.insert(i);
            pool.insert(members);
        }
        pool
    }

    /// Number of items of the instance the pool was built for.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Number of singleton columns at the front of the pool.
    #[inline]
    pub fn num_singletons(&self) -> usize {
        self.num_items
    }

    /// Total number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns `true` for one of the initial singleton columns.
    #[inline(always)]
    pub fn is_singleton(&self, column: ColumnIndex) -> bool {
        column.get() < self.num_items
    }

    /// Returns the column stored under `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of bounds.
    #[inline]
    pub fn column(&self, column: ColumnIndex) -> &Column {
        &self.columns[column.get()]
    }

    /// Iterates over all columns with their indices.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ColumnIndex, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(j, c)| (ColumnIndex::new(j), c))
    }

    /// Iterates over the columns generated after the singletons.
    pub fn generated(&self) -> impl Iterator<Item = (ColumnIndex, &Column)> {
        self.iter().skip(self.num_items)
    }

    /// Looks up a pattern by membership.
    #[inline]
    pub fn find(&self, members: &FixedBitSet) -> Option<ColumnIndex> {
        self.lookup.get(members).copied()
    }

    /// Adds a pattern unless an identical one is already stored.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `members` is empty or sized for a
    /// different number of items.
    pub fn insert(&mut self, members: FixedBitSet) -> Insertion {
        debug_assert_eq!(
            members.len(),
            self.num_items,
            "called `ColumnPool::insert` with a bit set of the wrong length"
        );
        debug_assert!(
            !members.is_clear(),
            "called `ColumnPool::insert` with an empty pattern"
        );

        if let Some(existing) = self.find(&members) {
            return Insertion::Existing(existing);
        }

        let index = ColumnIndex::new(self.columns.len());
        self.lookup.insert(members.clone(), index);
        self.columns.push(Column::from_members(members));
        Insertion::Inserted(index)
    }

    /// Convenience wrapper around `insert` taking item indices.
    pub fn insert_items<I>(&mut self, items: I) -> Insertion
    where
        I: IntoIterator<Item = ItemIndex>,
    {
        let mut members = FixedBitSet::with_capacity(self.num_items);
        for item in items {
            members.insert(item.get());
        }
        self.insert(members)
    }
}

impl std::fmt::Display for ColumnPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ColumnPool(columns: {}, singletons: {})",
            self.len(),
            self.num_singletons()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_model::problem::ProblemDataBuilder;

    fn ii(i: usize) -> ItemIndex {
        ItemIndex::new(i)
    }

    #[test]
    fn test_seeded_with_singletons() {
        let pool = ColumnPool::with_singletons(3);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.num_singletons(), 3);
        for (j, column) in pool.iter() {
            assert!(pool.is_singleton(j));
            assert_eq!(column.items(), &[ii(j.get())]);
        }
        assert_eq!(pool.generated().count(), 0);
    }

    #[test]
    fn test_insert_appends_and_deduplicates() {
        let mut pool = ColumnPool::with_singletons(4);

        let first = pool.insert_items([ii(3), ii(0)]);
        assert_eq!(first, Insertion::Inserted(ColumnIndex::new(4)));
        assert_eq!(pool.column(ColumnIndex::new(4)).items(), &[ii(0), ii(3)]);
        assert!(!pool.is_singleton(ColumnIndex::new(4)));

        let again = pool.insert_items([ii(0), ii(3)]);
        assert_eq!(again, Insertion::Existing(ColumnIndex::new(4)));
        assert_eq!(pool.len(), 5);

        let singleton = pool.insert_items([ii(2)]);
        assert_eq!(singleton, Insertion::Existing(ColumnIndex::new(2)));
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_pair_predicates() {
        let mut pool = ColumnPool::with_singletons(4);
        pool.insert_items([ii(0), ii(1), ii(3)]);
        let column = pool.column(ColumnIndex::new(4));

        assert!(column.contains_both(ItemPair::from_raw(0, 3)));
        assert!(!column.contains_both(ItemPair::from_raw(0, 2)));
        assert!(column.splits(ItemPair::from_raw(1, 2)));
        assert!(!column.splits(ItemPair::from_raw(1, 3)));
        assert!(!column.splits(ItemPair::from_raw(2, 2)));
    }

    #[test]
    fn test_weight_and_display() {
        let data = ProblemDataBuilder::new(10u32)
            .with_items([4, 4, 4, 6])
            .build()
            .unwrap();
        let mut pool = ColumnPool::with_singletons(4);
        pool.insert_items([ii(1), ii(3)]);
        let column = pool.column(ColumnIndex::new(4));
        assert_eq!(column.weight(&data), 10);
        assert_eq!(column.to_string(), "{1, 3}");
        assert_eq!(pool.to_string(), "ColumnPool(columns: 5, singletons: 4)");
    }
}

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

use crate::index::ItemIndex;
use num_traits::{Num, ToPrimitive};

/// Numeric types usable as item weights and bin capacities.
///
/// Integer and floating point types both qualify. The solving engines work
/// in `f64`; `ProblemData` converts once, at build time.
pub trait Weight: Num + ToPrimitive + Copy + PartialOrd + std::fmt::Display + std::fmt::Debug {}

impl<T> Weight for T where
    T: Num + ToPrimitive + Copy + PartialOrd + std::fmt::Display + std::fmt::Debug
{
}

/// The error type for building a `ProblemData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemDataError {
    /// The instance contains no items.
    Empty,
    /// The bin capacity is zero or negative.
    NonPositiveCapacity,
    /// An item weight is zero or negative.
    NonPositiveWeight { item: ItemIndex },
    /// An item is heavier than the bin capacity.
    OversizedItem { item: ItemIndex },
    /// A weight or the capacity has no finite `f64` representation.
    NotRepresentable { item: Option<ItemIndex> },
}

impl std::fmt::Display for ProblemDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "The instance contains no items"),
            Self::NonPositiveCapacity => write!(f, "The bin capacity must be positive"),
            Self::NonPositiveWeight { item } => {
                write!(f, "Item {} has a non-positive weight", item.get())
            }
            Self::OversizedItem { item } => {
                write!(f, "Item {} does not fit into an empty bin", item.get())
            }
            Self::NotRepresentable { item: Some(item) } => {
                write!(f, "The weight of item {} is not a finite number", item.get())
            }
            Self::NotRepresentable { item: None } => {
                write!(f, "The bin capacity is not a finite number")
            }
        }
    }
}

impl std::error::Error for ProblemDataError {}

/// The immutable description of a bin packing instance.
///
/// Holds the item weights and the common bin capacity, plus their `f64`
/// images which are what the LP and integer-program models are built from.
///
/// Construction:
/// - Use `ProblemDataBuilder` and call `ProblemDataBuilder::build`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemData<W> {
    weights: Vec<W>,
    capacity: W,
    weights_f64: Vec<f64>,
    capacity_f64: f64,
}

impl<W> ProblemData<W>
where
    W: Weight,
{
    /// Returns the number of items.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hopper_model::problem::ProblemDataBuilder;
    /// let data = ProblemDataBuilder::new(10).with_items([4, 4, 6]).build().unwrap();
    /// assert_eq!(data.num_items(), 3);
    /// ```
    #[inline]
    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    /// Returns the common bin capacity.
    #[inline]
    pub fn capacity(&self) -> W {
        self.capacity
    }

    /// Returns the bin capacity as `f64`.
    #[inline]
    pub fn capacity_f64(&self) -> f64 {
        self.capacity_f64
    }

    /// Returns the weight of an item.
    ///
    /// # Panics
    ///
    /// Panics if `item` is not in `0..num_items()`.
    #[inline]
    pub fn item_weight(&self, item: ItemIndex) -> W {
        let index = item.get();
        debug_assert!(
            index < self.num_items(),
            "called `ProblemData::item_weight` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );
        self.weights[index]
    }

    /// Returns all item weights, indexed by item.
    #[inline]
    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Returns all item weights as `f64`, indexed by item.
    #[inline]
    pub fn weights_f64(&self) -> &[f64] {
        &self.weights_f64
    }

    /// Returns the sum of all item weights.
    pub fn total_weight(&self) -> W {
        self.weights.iter().fold(W::zero(), |acc, &w| acc + w)
    }

    /// The continuous lower bound `ceil(total_weight / capacity)` on the
    /// number of bins.
    ///
    /// ```rust
    /// # use hopper_model::problem::ProblemDataBuilder;
    /// let data = ProblemDataBuilder::new(10).with_items([4, 4, 4, 6]).build().unwrap();
    /// assert_eq!(data.trivial_lower_bound(), 2);
    /// ```
    pub fn trivial_lower_bound(&self) -> u64 {
        let total: f64 = self.weights_f64.iter().sum();
        (total / self.capacity_f64).ceil() as u64
    }

    /// Iterates over all item indices.
    #[inline]
    pub fn items(&self) -> impl DoubleEndedIterator<Item = ItemIndex> + ExactSizeIterator {
        ItemIndex::range(self.num_items())
    }
}

impl<W> std::fmt::Display for ProblemData<W>
where
    W: Weight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ProblemData(items: {}, capacity: {}, total_weight: {})",
            self.num_items(),
            self.capacity,
            self.total_weight()
        )
    }
}

/// A mutable builder for `ProblemData`.
///
/// | Field | Default | Semantics |
/// | :--- | :--- | :--- |
/// | `weights` | empty | Items are appended in index order. |
/// | `reject_oversized` | `true` | Items heavier than the capacity fail the build. |
#[derive(Clone, Debug)]
pub struct ProblemDataBuilder<W> {
    capacity: W,
    weights: Vec<W>,
    reject_oversized: bool,
}

impl<W> ProblemDataBuilder<W>
where
    W: Weight,
{
    /// Creates a builder for bins of the given capacity.
    #[inline]
    pub fn new(capacity: W) -> Self {
        Self {
            capacity,
            weights: Vec::new(),
            reject_oversized: true,
        }
    }

    /// Creates a builder with room for `num_items` weights.
    #[inline]
    pub fn with_capacity(capacity: W, num_items: usize) -> Self {
        Self {
            capacity,
            weights: Vec::with_capacity(num_items),
            reject_oversized: true,
        }
    }

    /// Appends an item and returns its index.
    #[inline]
    pub fn add_item(&mut self, weight: W) -> ItemIndex {
        self.weights.push(weight);
        ItemIndex::new(self.weights.len() - 1)
    }

    /// Appends all items of `weights`.
    #[inline]
    pub fn with_items<I>(mut self, weights: I) -> Self
    where
        I: IntoIterator<Item = W>,
    {
        self.weights.extend(weights);
        self
    }

    /// Configures whether items heavier than the capacity fail the build.
    ///
    /// Such items can never be packed, but the master problem stays feasible
    /// through their singleton columns, so a caller studying bounds may
    /// want to keep them.
    #[inline]
    pub fn reject_oversized(mut self, yes: bool) -> Self {
        self.reject_oversized = yes;
        self
    }

    /// Returns the number of items added so far.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    /// Validates the instance and freezes it.
    pub fn build(self) -> Result<ProblemData<W>, ProblemDataError> {
        if self.weights.is_empty() {
            return Err(ProblemDataError::Empty);
        }
        if self.capacity <= W::zero() {
            return Err(ProblemDataError::NonPositiveCapacity);
        }

        let capacity_f64 = self
            .capacity
            .to_f64()
            .filter(|c| c.is_finite())
            .ok_or(ProblemDataError::NotRepresentable { item: None })?;

        let mut weights_f64 = Vec::with_capacity(self.weights.len());
        for (i, &weight) in self.weights.iter().enumerate() {
            let item = ItemIndex::new(i);
            if weight <= W::zero() {
                return Err(ProblemDataError::NonPositiveWeight { item });
            }
            if self.reject_oversized && weight > self.capacity {
                return Err(ProblemDataError::OversizedItem { item });
            }
            let w = weight
                .to_f64()
                .filter(|w| w.is_finite())
                .ok_or(ProblemDataError::NotRepresentable { item: Some(item) })?;
            weights_f64.push(w);
        }

        Ok(ProblemData {
            weights: self.weights,
            capacity: self.capacity,
            weights_f64,
            capacity_f64,
        })
    }
}

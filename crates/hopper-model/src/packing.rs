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

use crate::{
    index::ItemIndex,
    problem::{ProblemData, Weight},
};

/// An integral solution: every item assigned to exactly one bin.
///
/// The objective of a packing is its number of bins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packing {
    bins: Vec<Vec<ItemIndex>>,
}

impl Packing {
    /// Creates a packing from its bins. Items inside a bin are sorted and
    /// bins are ordered by their smallest item, so equal assignments
    /// compare equal.
    pub fn new(mut bins: Vec<Vec<ItemIndex>>) -> Self {
        for bin in &mut bins {
            bin.sort_unstable();
        }
        bins.sort_unstable();
        Self { bins }
    }

    /// The number of bins used.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    /// The bins, each a sorted list of items.
    #[inline]
    pub fn bins(&self) -> &[Vec<ItemIndex>] {
        &self.bins
    }

    /// Returns the bin holding `item`, if any.
    pub fn bin_of(&self, item: ItemIndex) -> Option<usize> {
        self.bins
            .iter()
            .position(|bin| bin.binary_search(&item).is_ok())
    }

    /// Returns `true` if every item of `data` appears in exactly one bin and
    /// no bin exceeds the capacity.
    pub fn is_feasible_for<W>(&self, data: &ProblemData<W>) -> bool
    where
        W: Weight,
    {
        let mut seen = vec![false; data.num_items()];
        for bin in &self.bins {
            let mut load = W::zero();
            for &item in bin {
                let Some(flag) = seen.get_mut(item.get()) else {
                    return false;
                };
                if *flag {
                    return false;
                }
                *flag = true;
                load = load + data.item_weight(item);
            }
            if load > data.capacity() {
                return false;
            }
        }
        seen.into_iter().all(|s| s)
    }
}

impl std::fmt::Display for Packing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Packing({} bins)", self.num_bins())?;
        for (b, bin) in self.bins.iter().enumerate() {
            write!(f, "  Bin {}:", b)?;
            for item in bin {
                write!(f, " {}", item.get())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

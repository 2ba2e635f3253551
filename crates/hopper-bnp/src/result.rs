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

use hopper_model::{node::ItemPair, packing::Packing};

/// The result of solving one branch node.
///
/// Every variant except `Branch` means "do not expand this node"; the
/// variants only differ in why.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeOutcome {
    /// The converged master solution is fractional; branch on this pair.
    Branch(ItemPair),
    /// The node cannot beat the incumbent. `bound` is the master objective
    /// at the time of the check.
    Pruned { bound: f64 },
    /// No bin pattern satisfies the node's decisions.
    PricingInfeasible,
    /// The converged master solution is integral.
    Integral(Packing),
    /// The master problem has no solution under the node's decisions.
    MasterInfeasible,
}

impl NodeOutcome {
    /// The pair to branch on, if any.
    #[inline]
    pub fn branching_pair(&self) -> Option<ItemPair> {
        match self {
            Self::Branch(pair) => Some(*pair),
            _ => None,
        }
    }

    /// The pair as signed raw positions, `(-1, -1)` when there is none.
    pub fn as_sentinel(&self) -> (i64, i64) {
        match self.branching_pair() {
            Some(pair) => {
                let (a, b) = pair.as_raw();
                (a as i64, b as i64)
            }
            None => (-1, -1),
        }
    }

    #[inline]
    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch(_))
    }
}

impl std::fmt::Display for NodeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Branch(pair) => write!(f, "Branch{}", pair),
            Self::Pruned { bound } => write!(f, "Pruned(bound: {})", bound),
            Self::PricingInfeasible => write!(f, "PricingInfeasible"),
            Self::Integral(packing) => write!(f, "Integral({} bins)", packing.num_bins()),
            Self::MasterInfeasible => write!(f, "MasterInfeasible"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_model::index::ItemIndex;

    #[test]
    fn test_sentinel_encoding() {
        let branch = NodeOutcome::Branch(ItemPair::from_raw(3, 1));
        assert_eq!(branch.branching_pair(), Some(ItemPair::from_raw(1, 3)));
        assert_eq!(branch.as_sentinel(), (1, 3));
        assert!(branch.is_branch());

        let packing = Packing::new(vec![vec![ItemIndex::new(0)]]);
        for outcome in [
            NodeOutcome::Pruned { bound: 3.0 },
            NodeOutcome::PricingInfeasible,
            NodeOutcome::Integral(packing),
            NodeOutcome::MasterInfeasible,
        ] {
            assert_eq!(outcome.branching_pair(), None);
            assert_eq!(outcome.as_sentinel(), (-1, -1));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            NodeOutcome::Branch(ItemPair::from_raw(0, 2)).to_string(),
            "Branch(0, 2)"
        );
        assert_eq!(
            NodeOutcome::Pruned { bound: 2.5 }.to_string(),
            "Pruned(bound: 2.5)"
        );
    }
}

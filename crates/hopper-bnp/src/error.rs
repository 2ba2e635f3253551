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

use hopper_lp::engine::EngineError;
use hopper_model::node::NodeError;

/// A fatal failure while solving one branch node.
///
/// Pruning, pricing infeasibility and integrality are outcomes, not errors;
/// see `NodeOutcome`.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchAndPriceError {
    /// A solving engine failed.
    Engine(EngineError),
    /// The node references items the instance does not have.
    InvalidNode(NodeError),
    /// A monitor asked to stop.
    Aborted(String),
}

impl std::fmt::Display for BranchAndPriceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(e) => write!(f, "Engine error: {}", e),
            Self::InvalidNode(e) => write!(f, "Invalid node: {}", e),
            Self::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

impl std::error::Error for BranchAndPriceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(e) => Some(e),
            Self::InvalidNode(e) => Some(e),
            Self::Aborted(_) => None,
        }
    }
}

impl From<EngineError> for BranchAndPriceError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<NodeError> for BranchAndPriceError {
    fn from(e: NodeError) -> Self {
        Self::InvalidNode(e)
    }
}

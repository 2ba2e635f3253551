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

//! # Incumbent Stores
//!
//! The incumbent is the fewest bins of any integral solution found so far.
//! It starts at `+inf`, only ever decreases, and is replaced only by a
//! strictly smaller value.
//!
//! `IncumbentStore` abstracts over where that value lives:
//!
//! - `LocalIncumbent`: a plain field of one engine. No synchronisation.
//! - `SharedIncumbent`: shared between engines exploring nodes on different
//!   threads. The bound is an `AtomicU64` holding the bits of an `f64` and
//!   is lowered with a compare-and-swap loop, so a reader never blocks; the
//!   packing behind it sits in a `Mutex` and is the source of truth.
//!
//! Engines hold a store by value; to share, hand each engine an
//! `Arc<SharedIncumbent>` or a `&SharedIncumbent`.

use hopper_model::packing::Packing;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

/// Read and update access to the best known integral solution.
pub trait IncumbentStore {
    /// The incumbent objective in bins, `+inf` when none is known.
    fn upper_bound(&self) -> f64;
    /// Installs `packing` if it uses strictly fewer bins than the current
    /// incumbent. Returns `true` on installation.
    fn try_install(&mut self, packing: &Packing) -> bool;
    /// A copy of the incumbent packing, if any.
    fn snapshot(&self) -> Option<Packing>;
}

/// An incumbent owned by a single engine.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LocalIncumbent {
    packing: Option<Packing>,
}

impl LocalIncumbent {
    #[inline]
    pub fn new() -> Self {
        Self { packing: None }
    }
}

impl IncumbentStore for LocalIncumbent {
    #[inline]
    fn upper_bound(&self) -> f64 {
        self.packing
            .as_ref()
            .map_or(f64::INFINITY, |p| p.num_bins() as f64)
    }

    fn try_install(&mut self, packing: &Packing) -> bool {
        if (packing.num_bins() as f64) < self.upper_bound() {
            self.packing = Some(packing.clone());
            true
        } else {
            false
        }
    }

    #[inline]
    fn snapshot(&self) -> Option<Packing> {
        self.packing.clone()
    }
}

/// A thread-safe incumbent shared by several engines.
#[derive(Debug)]
pub struct SharedIncumbent {
    /// `f64` bits of the current bound; `+inf` until the first install.
    upper_bound: AtomicU64,
    packing: Mutex<Option<Packing>>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIncumbent {
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicU64::new(f64::INFINITY.to_bits()),
            packing: Mutex::new(None),
        }
    }

    /// The current bound. Lock-free.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        f64::from_bits(self.upper_bound.load(Ordering::Acquire))
    }

    /// Lowers the bound to `value` if `value` is strictly smaller.
    /// Returns `true` if this call lowered it.
    pub fn lower_to(&self, value: f64) -> bool {
        let mut current = self.upper_bound.load(Ordering::Acquire);
        loop {
            if value >= f64::from_bits(current) {
                return false;
            }
            match self.upper_bound.compare_exchange_weak(
                current,
                value.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Installs `packing` if it beats the current incumbent.
    pub fn try_install(&self, packing: &Packing) -> bool {
        let candidate = packing.num_bins() as f64;
        if candidate >= self.upper_bound() {
            return false;
        }

        let mut guard = self.packing.lock().unwrap_or_else(PoisonError::into_inner);
        // Compare against the stored packing; the bound may have moved
        // while we waited for the lock.
        if guard
            .as_ref()
            .is_some_and(|current| packing.num_bins() >= current.num_bins())
        {
            return false;
        }
        if !self.lower_to(candidate) {
            return false;
        }
        *guard = Some(packing.clone());
        true
    }

    /// A copy of the incumbent packing, if any.
    pub fn snapshot(&self) -> Option<Packing> {
        self.packing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedIncumbent(upper_bound: {})", self.upper_bound())
    }
}

impl IncumbentStore for SharedIncumbent {
    #[inline]
    fn upper_bound(&self) -> f64 {
        SharedIncumbent::upper_bound(self)
    }

    #[inline]
    fn try_install(&mut self, packing: &Packing) -> bool {
        SharedIncumbent::try_install(self, packing)
    }

    #[inline]
    fn snapshot(&self) -> Option<Packing> {
        SharedIncumbent::snapshot(self)
    }
}

impl IncumbentStore for &SharedIncumbent {
    #[inline]
    fn upper_bound(&self) -> f64 {
        SharedIncumbent::upper_bound(self)
    }

    #[inline]
    fn try_install(&mut self, packing: &Packing) -> bool {
        SharedIncumbent::try_install(self, packing)
    }

    #[inline]
    fn snapshot(&self) -> Option<Packing> {
        SharedIncumbent::snapshot(self)
    }
}

impl IncumbentStore for Arc<SharedIncumbent> {
    #[inline]
    fn upper_bound(&self) -> f64 {
        SharedIncumbent::upper_bound(self)
    }

    #[inline]
    fn try_install(&mut self, packing: &Packing) -> bool {
        SharedIncumbent::try_install(self, packing)
    }

    #[inline]
    fn snapshot(&self) -> Option<Packing> {
        SharedIncumbent::snapshot(self)
    }
}

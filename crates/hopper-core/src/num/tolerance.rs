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

//! # Tolerance-Aware Comparisons
//!
//! LP and integer-program engines report values in floating point. A pattern
//! that should be worth exactly `0.5` comes back as `0.49999999997`, a
//! reduced cost that should be zero comes back as `-3e-12`. `Tolerance`
//! collects the comparisons the engine needs and applies one fixed `ε` to
//! all of them.
//!
//! ```rust
//! use hopper_core::num::tolerance::Tolerance;
//!
//! let tol = Tolerance::default();
//! assert!(tol.is_equal(0.5, 0.5 + 1e-9));
//! assert!(!tol.is_less(-1e-9, 0.0));
//! assert_eq!(tol.ceil(2.0000000001), 2.0);
//! ```

/// Default `ε` used when none is configured.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// A fixed absolute tolerance for comparing floating point values.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Tolerance {
    epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl Tolerance {
    /// Creates a tolerance with the given absolute `epsilon`.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is negative or not finite.
    #[inline]
    pub fn new(epsilon: f64) -> Self {
        assert!(
            epsilon.is_finite() && epsilon >= 0.0,
            "called `Tolerance::new` with invalid epsilon: {}",
            epsilon
        );
        Self { epsilon }
    }

    /// Returns the absolute tolerance.
    #[inline(always)]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `a < b` by more than `ε`.
    #[inline(always)]
    pub fn is_less(&self, a: f64, b: f64) -> bool {
        a < b - self.epsilon
    }

    /// `a >= b` up to `ε`.
    #[inline(always)]
    pub fn is_greater_or_equal(&self, a: f64, b: f64) -> bool {
        a >= b - self.epsilon
    }

    /// `|a - b| <= ε`. Two infinities of the same sign compare equal.
    #[inline(always)]
    pub fn is_equal(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.epsilon
    }

    /// `|a| <= ε`.
    #[inline(always)]
    pub fn is_zero(&self, a: f64) -> bool {
        a.abs() <= self.epsilon
    }

    /// Rounds `a` up to the next integer, treating values within `ε` above
    /// an integer as that integer.
    #[inline(always)]
    pub fn ceil(&self, a: f64) -> f64 {
        (a - self.epsilon).ceil()
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tolerance({:e})", self.epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_comparisons_ignore_noise() {
        let tol = Tolerance::new(1e-6);
        assert!(!tol.is_less(1.0 - 1e-9, 1.0));
        assert!(tol.is_less(0.9, 1.0));
    }

    #[test]
    fn test_greater_or_equal_accepts_noise() {
        let tol = Tolerance::new(1e-6);
        assert!(tol.is_greater_or_equal(1.0 - 1e-9, 1.0));
        assert!(!tol.is_greater_or_equal(0.9, 1.0));
        assert!(tol.is_greater_or_equal(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_equality_handles_infinity() {
        let tol = Tolerance::default();
        assert!(tol.is_equal(f64::INFINITY, f64::INFINITY));
        assert!(!tol.is_equal(f64::INFINITY, 1e300));
        assert!(!tol.is_less(f64::INFINITY, f64::INFINITY));
        assert!(tol.is_less(2.0, f64::INFINITY));
    }

    #[test]
    fn test_ceil_snaps_values_just_above_integer() {
        let tol = Tolerance::new(1e-6);
        assert_eq!(tol.ceil(2.0 + 1e-9), 2.0);
        assert_eq!(tol.ceil(2.0), 2.0);
        assert_eq!(tol.ceil(2.3), 3.0);
        assert_eq!(tol.ceil(1.9999999), 2.0);
    }

    #[test]
    fn test_zero() {
        let tol = Tolerance::default();
        assert!(tol.is_zero(-1e-9));
        assert!(!tol.is_zero(1e-3));
    }

    #[test]
    #[should_panic(expected = "invalid epsilon")]
    fn test_negative_epsilon_panics() {
        let _ = Tolerance::new(-1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Tolerance::new(1e-6)), "Tolerance(1e-6)");
    }
}

//! Value sets: functions of a (source, target) index pair.

use std::fmt::Debug;
use std::ops::Mul;

/// A value assigned to every (source, target) pair.
pub trait ValueSet: Debug {
    /// Value for the pair.
    fn value(&self, source: usize, target: usize) -> f64;
}

impl ValueSet for f64 {
    fn value(&self, _source: usize, _target: usize) -> f64 {
        *self
    }
}

impl<V: ValueSet + ?Sized> ValueSet for Box<V> {
    fn value(&self, source: usize, target: usize) -> f64 {
        (**self).value(source, target)
    }
}

/// Gaussian profile `exp(-d²/(2σ²))` truncated at `cutoff`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianFn {
    sigma: f64,
    cutoff: f64,
}

impl GaussianFn {
    /// Creates the profile; values at `d >= cutoff` are zero.
    pub fn new(sigma: f64, cutoff: f64) -> Self {
        Self { sigma, cutoff }
    }

    /// Evaluates the profile at `d`.
    pub fn apply(&self, d: f64) -> f64 {
        if d < self.cutoff {
            (-d * d / (2.0 * self.sigma * self.sigma)).exp()
        } else {
            0.0
        }
    }
}

/// A value set passed through a [`GaussianFn`].
#[derive(Clone, Debug)]
pub struct Composed<V> {
    f: GaussianFn,
    inner: V,
}

impl<V: ValueSet> ValueSet for Composed<V> {
    fn value(&self, source: usize, target: usize) -> f64 {
        self.f.apply(self.inner.value(source, target))
    }
}

impl<V: ValueSet> Mul<V> for GaussianFn {
    type Output = Composed<V>;

    fn mul(self, inner: V) -> Composed<V> {
        Composed { f: self, inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_cutoff() {
        let g = GaussianFn::new(1.0, 2.0);
        assert_eq!(g.apply(0.0), 1.0);
        assert!((g.apply(1.0) - (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(g.apply(2.0), 0.0);
    }

    #[test]
    fn test_composition_over_constant() {
        let v = GaussianFn::new(1.0, 10.0) * 1.0;
        assert!((v.value(3, 4) - (-0.5f64).exp()).abs() < 1e-12);
    }
}

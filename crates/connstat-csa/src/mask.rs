//! Masks: sets of (source, target) pairs.

use crate::value_set::ValueSet;
use connstat_core::{Error, Result};
use rand::Rng;
use std::collections::BTreeSet;
use std::ops::Mul;

/// A set of (source, target) index pairs, possibly stochastic.
///
/// Products of masks (`a * b`) are intersections. Stochastic masks draw one
/// uniform number per candidate pair when realised, so the mask is only
/// finite once a [`Mask::cross`] bounds the candidates.
#[derive(Debug)]
pub enum Mask {
    /// Cartesian product of a source set and a target set.
    Cross {
        /// Source indices.
        sources: BTreeSet<usize>,
        /// Target indices.
        targets: BTreeSet<usize>,
    },
    /// Keeps each pair with fixed probability.
    Random(f64),
    /// Keeps each pair with the probability given by a value set.
    RandomBy(Box<dyn ValueSet>),
    /// Pairs contained in both masks.
    Intersection(Box<Mask>, Box<Mask>),
}

impl Mask {
    /// Cartesian product `sources × targets`.
    pub fn cross<S, T>(sources: S, targets: T) -> Self
    where
        S: IntoIterator<Item = usize>,
        T: IntoIterator<Item = usize>,
    {
        Mask::Cross {
            sources: sources.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Bernoulli mask with probability `p`.
    pub fn random(p: f64) -> Self {
        Mask::Random(p)
    }

    /// Bernoulli mask whose per-pair probability is `probability(i, j)`,
    /// clipped to `[0, 1]`.
    pub fn random_by<V: ValueSet + 'static>(probability: V) -> Self {
        Mask::RandomBy(Box::new(probability))
    }

    /// Realises the mask, returning pairs in source-major order.
    pub fn pairs<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<(usize, usize)>> {
        let mut crosses = Vec::new();
        let mut filters = Vec::new();
        self.collect(&mut crosses, &mut filters);

        let Some((first, rest)) = crosses.split_first() else {
            return Err(Error::validation(
                "cannot realise an infinite mask; intersect it with a cross product",
            ));
        };

        let mut pairs = Vec::new();
        for &i in first.0 {
            for &j in first.1 {
                if !rest.iter().all(|(s, t)| s.contains(&i) && t.contains(&j)) {
                    continue;
                }
                if filters.iter().all(|f| f.keep(i, j, rng)) {
                    pairs.push((i, j));
                }
            }
        }
        tracing::debug!(
            candidates = first.0.len() * first.1.len(),
            kept = pairs.len(),
            "realised mask"
        );
        Ok(pairs)
    }

    fn collect<'a>(
        &'a self,
        crosses: &mut Vec<(&'a BTreeSet<usize>, &'a BTreeSet<usize>)>,
        filters: &mut Vec<&'a Mask>,
    ) {
        match self {
            Mask::Cross { sources, targets } => crosses.push((sources, targets)),
            Mask::Random(_) | Mask::RandomBy(_) => filters.push(self),
            Mask::Intersection(a, b) => {
                a.collect(crosses, filters);
                b.collect(crosses, filters);
            }
        }
    }

    fn keep<R: Rng + ?Sized>(&self, i: usize, j: usize, rng: &mut R) -> bool {
        let p = match self {
            Mask::Random(p) => *p,
            Mask::RandomBy(v) => v.value(i, j),
            Mask::Cross { .. } | Mask::Intersection(..) => return true,
        };
        rng.random::<f64>() < p.clamp(0.0, 1.0)
    }
}

impl Mul for Mask {
    type Output = Mask;

    fn mul(self, rhs: Mask) -> Mask {
        Mask::Intersection(Box::new(self), Box::new(rhs))
    }
}

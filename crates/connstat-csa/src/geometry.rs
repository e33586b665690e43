//! Geometry functions (index → position) and metrics.

use crate::value_set::ValueSet;
use connstat_core::{Dimensions, Error, Position, Result};
use rand::Rng;

/// Finite mapping from node index to position.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    points: Vec<Position>,
}

impl PointSet {
    /// Wraps explicit positions.
    pub fn new(points: Vec<Position>) -> Self {
        Self { points }
    }

    /// A single node at `position`.
    pub fn single(position: Position) -> Self {
        Self::new(vec![position])
    }

    /// `n` nodes scattered uniformly on `[0, side)²`.
    pub fn random2d<R: Rng + ?Sized>(n: usize, side: f64, rng: &mut R) -> Self {
        let points = (0..n)
            .map(|_| {
                let x = rng.random::<f64>() * side;
                let y = rng.random::<f64>() * side;
                Position::Planar([x, y])
            })
            .collect();
        Self::new(points)
    }

    /// Position of node `index`.
    pub fn get(&self, index: usize) -> Option<Position> {
        self.points.get(index).copied()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All positions in index order.
    pub fn positions(&self) -> &[Position] {
        &self.points
    }
}

/// Euclidean distance between a node of one point set and a node of another.
///
/// Indices outside either set evaluate to `f64::INFINITY`.
#[derive(Clone, Debug)]
pub struct Metric {
    sources: PointSet,
    targets: PointSet,
}

impl Metric {
    /// Distance between source `i` and target `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        match (self.sources.get(i), self.targets.get(j)) {
            (Some(a), Some(b)) => a
                .coords()
                .iter()
                .zip(b.coords())
                .map(|(x, y)| (y - x).powi(2))
                .sum::<f64>()
                .sqrt(),
            _ => f64::INFINITY,
        }
    }

    /// Target geometry.
    pub fn targets(&self) -> &PointSet {
        &self.targets
    }
}

impl ValueSet for Metric {
    fn value(&self, source: usize, target: usize) -> f64 {
        self.distance(source, target)
    }
}

/// Planar Euclidean metric between two point sets.
pub fn euclid_metric_2d(sources: PointSet, targets: PointSet) -> Result<Metric> {
    let planar = |set: &PointSet| {
        set.positions()
            .iter()
            .all(|p| p.dimensions() == Dimensions::Two)
    };
    if !planar(&sources) || !planar(&targets) {
        return Err(Error::unsupported("euclid_metric_2d", "non-planar positions"));
    }
    Ok(Metric { sources, targets })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random2d_inside_square() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = PointSet::random2d(500, 2.0, &mut rng);
        assert_eq!(set.len(), 500);
        assert!(
            set.positions()
                .iter()
                .all(|p| p.coords().iter().all(|c| (0.0..2.0).contains(c)))
        );
    }

    #[test]
    fn test_metric_distance() {
        let d = euclid_metric_2d(
            PointSet::single(Position::Planar([0.0, 0.0])),
            PointSet::new(vec![Position::Planar([3.0, 4.0])]),
        )
        .unwrap();
        assert_eq!(d.value(0, 0), 5.0);
        assert_eq!(d.value(0, 1), f64::INFINITY);
    }

    #[test]
    fn test_metric_rejects_3d() {
        let r = euclid_metric_2d(
            PointSet::single(Position::Spatial([0.0; 3])),
            PointSet::single(Position::Planar([0.0; 2])),
        );
        assert!(matches!(r, Err(Error::Unsupported { .. })));
    }
}

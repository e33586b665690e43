#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Connstat CSA
//!
//! A small connection-set algebra. Connectivity is described as a product
//! of masks (which pairs may connect) and value sets (per-pair values such
//! as distances, probabilities or weights):
//!
//! ```rust
//! use connstat_csa::{ConnectionSet, GaussianFn, Mask, PointSet, euclid_metric_2d};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let source = PointSet::single(connstat_core::Position::Planar([0.5, 0.5]));
//! let targets = PointSet::random2d(100, 1.0, &mut rng);
//! let d = euclid_metric_2d(source, targets).unwrap();
//!
//! let mask = Mask::cross([0], 0..100) * Mask::random_by(GaussianFn::new(0.25, 0.7) * d);
//! let cs = ConnectionSet::new(mask, 1.0, 1.0);
//! let conns = cs.connections(&mut rng).unwrap();
//! assert!(conns.iter().all(|c| c.source == 0 && c.target < 100));
//! ```

mod cset;
mod geometry;
mod mask;
mod proptests;
mod value_set;

pub use cset::{Connection, ConnectionSet};
pub use geometry::{Metric, PointSet, euclid_metric_2d};
pub use mask::Mask;
pub use value_set::{Composed, GaussianFn, ValueSet};

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Connstat Spatial
//!
//! Statistical tests for spatially structured networks. A single source
//! node is connected to `N` uniformly scattered targets by a
//! distance-dependent kernel; the harness checks that
//!
//! - the distances of connected targets follow the expected distribution
//!   (Kolmogorov-Smirnov test), and
//! - the number of connections matches its expectation (Z-test).
//!
//! ```rust,no_run
//! use connstat_core::{Dimensions, KernelName};
//! use connstat_spatial::{LayerSpatialTester, SpatialTester};
//!
//! let mut tester =
//!     LayerSpatialTester::new(1.0, 10_000, Dimensions::Two, KernelName::Gaussian, None)?;
//! let ks = tester.ks_test(false, Some(0))?;
//! println!("p-value of KS-test: {}", ks.p_value);
//! let z = tester.z_test(false, Some(0))?;
//! println!("p-value of Z-test: {}", z.p_value);
//! # Ok::<(), connstat_core::Error>(())
//! ```

pub mod expected;
pub mod export;
mod proptests;
pub mod tester;
pub mod testers;

pub use expected::ExpectedDistribution;
pub use tester::{SpatialTester, TestKind, TwoLevelResult};
pub use testers::{CsaSpatialTester, LayerSpatialTester, from_config};

//! The spatial test harness.
//!
//! A [`SpatialTester`] wraps one connection algorithm. Backends implement
//! the primitive steps (seed, build populations, connect, report distances
//! and positions); the trait supplies the statistical tests on top of them.
//!
//! A single test run goes through:
//!
//! 1. `reset(seed)`: reseed every PRNG the backend uses
//! 2. `build()`: create the source node and the scattered target nodes
//! 3. `connect()`: run the connection algorithm (skipped in control mode)
//! 4. collect distances of connected targets and compare them with the
//!    [`ExpectedDistribution`] (KS test) or count them against the expected
//!    number of connections (Z-test)

use crate::expected::ExpectedDistribution;
use connstat_core::stats::{self, KsResult, ZResult};
use connstat_core::{Error, Extent, Kernel, Position, Result};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Upper bound (exclusive) for randomly drawn seeds.
pub const MAX_RANDOM_SEED: u64 = 10_000_000_000;

/// Returns `seed`, or a fresh random seed in `[0, 10¹⁰)` when absent.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let drawn = rand::rng().random_range(0..MAX_RANDOM_SEED);
        info!(seed = drawn, "no seed given, drew a random one");
        drawn
    })
}

/// Which single-level test a two-level test repeats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Kolmogorov-Smirnov test on connection distances.
    #[default]
    Ks,
    /// Z-test on the number of connections.
    Z,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ks => f.write_str("ks"),
            Self::Z => f.write_str("z"),
        }
    }
}

impl FromStr for TestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ks" => Ok(Self::Ks),
            "z" => Ok(Self::Z),
            other => Err(Error::invalid_parameter(
                "test",
                format!("unknown test '{other}', expected ks or z"),
            )),
        }
    }
}

/// Outcome of a two-level test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwoLevelResult {
    /// First-level test that was repeated.
    pub kind: TestKind,
    /// Seed of the first run; run `i` used `start_seed + i`.
    pub start_seed: u64,
    /// p-values of the individual runs.
    pub p_values: Vec<f64>,
    /// KS test of the p-values against U(0, 1).
    pub ks: KsResult,
}

/// A connection algorithm under test.
pub trait SpatialTester {
    /// Short backend name for logs and reports.
    fn backend(&self) -> &'static str;

    /// Region the target nodes are scattered in, centred on the source.
    fn extent(&self) -> &Extent;

    /// Kernel the algorithm is asked to realise.
    fn kernel(&self) -> &Kernel;

    /// Number of target nodes.
    fn nodes(&self) -> usize;

    /// Reseeds the backend's PRNGs and discards any built network.
    /// Returns the seed actually used.
    fn reset(&mut self, seed: Option<u64>) -> u64;

    /// Creates the source and target populations.
    fn build(&mut self) -> Result<()>;

    /// Connects the source to the targets.
    fn connect(&mut self) -> Result<()>;

    /// Distances from the source to every target node.
    fn distances(&self) -> Result<Vec<f64>>;

    /// Distances from the source to the connected target nodes.
    fn target_distances(&self) -> Result<Vec<f64>>;

    /// Positions of all target nodes.
    fn positions(&self) -> Result<Vec<Position>>;

    /// Positions of the connected target nodes.
    fn target_positions(&self) -> Result<Vec<Position>>;

    /// Indices (into [`positions`](Self::positions)) of connected targets.
    fn target_indices(&self) -> Result<Vec<usize>>;

    /// PRNG reserved for control draws.
    fn control_rng(&mut self) -> &mut StdRng;

    /// Distribution the connected distances should follow.
    fn expected(&self) -> ExpectedDistribution {
        let extent = self.extent();
        ExpectedDistribution::new(*self.kernel(), extent.dimensions(), extent.side_length)
    }

    /// Connected distances drawn directly from the kernel with independent
    /// Bernoulli trials, bypassing the connection algorithm.
    fn control_distances(&mut self) -> Result<Vec<f64>> {
        let distances = self.distances()?;
        let kernel = *self.kernel();
        let rng = self.control_rng();
        Ok(distances
            .into_iter()
            .filter(|&d| rng.random::<f64>() < kernel.probability(d))
            .collect())
    }

    /// Resets, builds and (unless `control`) connects, then returns the
    /// distances of connected targets.
    fn sample(&mut self, control: bool, seed: Option<u64>) -> Result<Vec<f64>> {
        let seed = self.reset(seed);
        self.build()?;
        let sample = if control {
            self.control_distances()?
        } else {
            self.connect()?;
            self.target_distances()?
        };
        debug!(
            backend = self.backend(),
            seed,
            control,
            connections = sample.len(),
            "sampled connection distances"
        );
        Ok(sample)
    }

    /// Kolmogorov-Smirnov test of connected distances against the expected
    /// distribution.
    fn ks_test(&mut self, control: bool, seed: Option<u64>) -> Result<KsResult> {
        let sample = self.sample(control, seed)?;
        let expected = self.expected();
        if expected.is_degenerate() {
            return Err(Error::validation(format!(
                "kernel {} never connects; the KS test is undefined",
                self.kernel()
            )));
        }
        let result = stats::ks_test(&sample, |d| expected.cdf(d))?;
        info!(
            backend = self.backend(),
            control,
            statistic = result.statistic,
            p_value = result.p_value,
            n = result.sample_size,
            "KS test"
        );
        Ok(result)
    }

    /// Z-test of the number of connections against its expectation given
    /// the realised target positions.
    fn z_test(&mut self, control: bool, seed: Option<u64>) -> Result<ZResult> {
        let sample = self.sample(control, seed)?;
        let kernel = *self.kernel();
        let probabilities: Vec<f64> = self
            .distances()?
            .into_iter()
            .map(|d| kernel.probability(d))
            .collect();
        let result = stats::z_test(sample.len(), &probabilities)?;
        info!(
            backend = self.backend(),
            control,
            z = result.z,
            p_value = result.p_value,
            observed = result.observed,
            expected = result.expected,
            "Z-test"
        );
        Ok(result)
    }

    /// Repeats a test over `runs` consecutive seeds and KS-tests the
    /// resulting p-values for uniformity.
    ///
    /// Z-test p-values come from a discrete count, so their distribution is
    /// only approximately uniform for small networks.
    fn two_level_test(
        &mut self,
        kind: TestKind,
        runs: usize,
        start_seed: u64,
        control: bool,
    ) -> Result<TwoLevelResult> {
        if runs == 0 {
            return Err(Error::invalid_parameter("runs", "must be at least 1"));
        }
        let mut p_values = Vec::with_capacity(runs);
        for i in 0..runs as u64 {
            let seed = Some(start_seed.wrapping_add(i));
            let p = match kind {
                TestKind::Ks => self.ks_test(control, seed)?.p_value,
                TestKind::Z => self.z_test(control, seed)?.p_value,
            };
            p_values.push(p);
        }
        let ks = stats::ks_uniform(&p_values)?;
        info!(
            backend = self.backend(),
            %kind,
            runs,
            statistic = ks.statistic,
            p_value = ks.p_value,
            "two-level test"
        );
        Ok(TwoLevelResult {
            kind,
            start_seed,
            p_values,
            ks,
        })
    }
}

//! Expected distribution of source-target distances.
//!
//! With targets scattered uniformly in a box of side `L` around the source,
//! the density of target distances is proportional to the measure of the
//! sphere of radius `D` that lies inside the box (arc length in 2D, surface
//! area in 3D). Connected targets are thinned by the kernel, so their
//! distances follow
//!
//! ```text
//! pdf(D) ∝ kernel_probability(D) · shell(D),   0 ≤ D ≤ max_distance
//! ```

use connstat_core::stats::simpson;
use connstat_core::{Dimensions, Kernel};
use std::f64::consts::{FRAC_PI_2, PI};

/// Number of tabulation intervals for the CDF.
const GRID_INTERVALS: usize = 2048;

/// Simpson sub-intervals per grid cell.
const CELL_INTERVALS: usize = 8;

/// Simpson intervals for the corner region of the 3D shell.
const SHELL_INTERVALS: usize = 64;

/// Measure of the sphere of radius `d` centred in a box of side
/// `side_length` that lies inside the box.
///
/// 2D: `2πD` up to `L/2`, then `2πD − 8D·acos(L/2D)` up to `L/√2`.
/// 3D: `4πD²` up to `L/2`, `2πD(3L − 4D)` up to `L/√2`, and a numerical
/// corner integral up to `L·√3/2`.
pub fn shell_measure(dimensions: Dimensions, side_length: f64, d: f64) -> f64 {
    let a = side_length / 2.0;
    if d <= 0.0 || d > dimensions.max_distance(side_length) {
        return 0.0;
    }
    match dimensions {
        Dimensions::Two => 4.0 * d * quarter_angle(a, d),
        Dimensions::Three => {
            if d <= a {
                4.0 * PI * d * d
            } else if d <= 2f64.sqrt() * a {
                2.0 * PI * d * (3.0 * side_length - 4.0 * d)
            } else {
                // Area element on a sphere is d·dφ·dz; integrate the
                // in-box azimuth over z within one octant.
                let z0 = (d * d - 2.0 * a * a).max(0.0).sqrt();
                let integral = simpson(
                    |z| quarter_angle(a, (d * d - z * z).max(0.0).sqrt()),
                    z0,
                    a,
                    SHELL_INTERVALS,
                );
                8.0 * d * integral
            }
        }
    }
}

/// Angle of the quarter circle of radius `rho` that stays inside the
/// quadrant square `[0, a]²`.
fn quarter_angle(a: f64, rho: f64) -> f64 {
    if rho <= a {
        FRAC_PI_2
    } else if rho <= 2f64.sqrt() * a {
        (FRAC_PI_2 - 2.0 * (a / rho).acos()).max(0.0)
    } else {
        0.0
    }
}

/// Tabulated distance distribution of connected targets.
#[derive(Clone, Debug)]
pub struct ExpectedDistribution {
    kernel: Kernel,
    dimensions: Dimensions,
    side_length: f64,
    max_distance: f64,
    normalization: f64,
    cdf_table: Vec<f64>,
}

impl ExpectedDistribution {
    /// Tabulates the distribution for a kernel in a box of side
    /// `side_length`.
    pub fn new(kernel: Kernel, dimensions: Dimensions, side_length: f64) -> Self {
        let max_distance = dimensions.max_distance(side_length);
        let h = max_distance / GRID_INTERVALS as f64;
        let raw = |d: f64| kernel.probability(d) * shell_measure(dimensions, side_length, d);

        let mut cdf_table = Vec::with_capacity(GRID_INTERVALS + 1);
        let mut acc = 0.0;
        cdf_table.push(0.0);
        for i in 0..GRID_INTERVALS {
            let lo = i as f64 * h;
            acc += simpson(raw, lo, lo + h, CELL_INTERVALS);
            cdf_table.push(acc);
        }
        let normalization = acc;
        if normalization > 0.0 {
            for v in &mut cdf_table {
                *v /= normalization;
            }
        }

        Self {
            kernel,
            dimensions,
            side_length,
            max_distance,
            normalization,
            cdf_table,
        }
    }

    /// Kernel the distribution was built for.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Largest possible distance.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Whether the kernel gives any connection probability at all.
    pub fn is_degenerate(&self) -> bool {
        self.normalization <= 0.0
    }

    /// Normalised probability density at `d`.
    pub fn pdf(&self, d: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.kernel.probability(d) * shell_measure(self.dimensions, self.side_length, d)
            / self.normalization
    }

    /// Cumulative distribution at `d`.
    pub fn cdf(&self, d: f64) -> f64 {
        if d <= 0.0 {
            return 0.0;
        }
        if d >= self.max_distance {
            return 1.0;
        }
        let pos = d / self.max_distance * GRID_INTERVALS as f64;
        let i = (pos.floor() as usize).min(GRID_INTERVALS - 1);
        let frac = pos - i as f64;
        self.cdf_table[i] + frac * (self.cdf_table[i + 1] - self.cdf_table[i])
    }
}

//! Common helpers for connstat spatial integration tests.

use connstat_core::config::NetworkConfig;
use connstat_core::{BackendKind, Dimensions, KernelName, KernelParams};
use connstat_spatial::{SpatialTester, from_config};

/// Significance level below which a fixed-seed test counts as a rejection.
pub const ALPHA: f64 = 1e-4;

/// Builds a tester for the unit square/cube.
pub fn tester(
    backend: BackendKind,
    dimensions: Dimensions,
    kernel: KernelName,
    nodes: usize,
) -> Box<dyn SpatialTester> {
    tester_with_params(backend, dimensions, kernel, nodes, KernelParams::new())
}

/// Builds a tester for the unit square/cube with kernel parameter overrides.
pub fn tester_with_params(
    backend: BackendKind,
    dimensions: Dimensions,
    kernel: KernelName,
    nodes: usize,
    kernel_params: KernelParams,
) -> Box<dyn SpatialTester> {
    let config = NetworkConfig {
        side_length: 1.0,
        nodes,
        dimensions,
        backend,
        kernel,
        kernel_params,
    };
    from_config(&config).expect("tester configuration should be valid")
}

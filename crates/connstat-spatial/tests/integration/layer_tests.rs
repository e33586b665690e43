//! Integration tests for the layer backend.

use connstat_core::stats;
use connstat_core::{BackendKind, Dimensions, Kernel, KernelName, KernelParams};
use connstat_spatial::ExpectedDistribution;

use crate::common::{ALPHA, tester, tester_with_params};

#[test]
fn test_ks_accepts_every_kernel_2d() {
    for kernel in KernelName::ALL {
        let mut t = tester(BackendKind::Layer, Dimensions::Two, kernel, 3000);
        let ks = t.ks_test(false, Some(2)).unwrap();
        assert!(ks.p_value > ALPHA, "{kernel}: p = {}", ks.p_value);
        assert!(ks.sample_size > 0);
    }
}

#[test]
fn test_ks_accepts_every_kernel_3d() {
    for kernel in KernelName::ALL {
        let mut t = tester(BackendKind::Layer, Dimensions::Three, kernel, 3000);
        let ks = t.ks_test(false, Some(8)).unwrap();
        assert!(ks.p_value > ALPHA, "{kernel}: p = {}", ks.p_value);
    }
}

#[test]
fn test_z_accepts_default_kernel() {
    let mut t = tester(BackendKind::Layer, Dimensions::Two, KernelName::Gaussian, 3000);
    let z = t.z_test(false, Some(4)).unwrap();
    assert!(z.p_value > ALPHA, "z = {}", z.z);
    assert!(z.variance > 0.0);
    assert!((z.observed as f64 - z.expected).abs() < 5.0 * z.variance.sqrt());
}

#[test]
fn test_ks_detects_wrong_kernel() {
    // Connect with a narrow Gaussian, compare against the default width.
    let params = KernelParams::from([("sigma".to_string(), 0.1)]);
    let mut t = tester_with_params(
        BackendKind::Layer,
        Dimensions::Two,
        KernelName::Gaussian,
        5000,
        params,
    );
    let sample = t.sample(false, Some(1)).unwrap();
    let wrong = ExpectedDistribution::new(
        Kernel::defaults(KernelName::Gaussian, 1.0),
        Dimensions::Two,
        1.0,
    );
    let ks = stats::ks_test(&sample, |d| wrong.cdf(d)).unwrap();
    assert!(ks.p_value < ALPHA, "p = {}", ks.p_value);
}

#[test]
fn test_z_detects_wrong_probabilities() {
    let params = KernelParams::from([("sigma".to_string(), 0.1)]);
    let mut t = tester_with_params(
        BackendKind::Layer,
        Dimensions::Two,
        KernelName::Gaussian,
        5000,
        params,
    );
    let observed = t.sample(false, Some(1)).unwrap().len();
    let wrong = Kernel::defaults(KernelName::Gaussian, 1.0);
    let probabilities: Vec<f64> = t
        .distances()
        .unwrap()
        .into_iter()
        .map(|d| wrong.probability(d))
        .collect();
    let z = stats::z_test(observed, &probabilities).unwrap();
    assert!(z.z < 0.0);
    assert!(z.p_value < ALPHA);
}

#[test]
fn test_periodic_distances_bounded() {
    let mut t = tester(BackendKind::Layer, Dimensions::Three, KernelName::Constant, 500);
    let sample = t.sample(false, Some(0)).unwrap();
    assert_eq!(sample.len(), 500);
    let max = Dimensions::Three.max_distance(1.0);
    assert!(sample.iter().all(|&d| d <= max));
}

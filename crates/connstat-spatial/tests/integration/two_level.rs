//! Integration tests for two-level tests.

use connstat_core::{BackendKind, Dimensions, KernelName};
use connstat_spatial::TestKind;

use crate::common::{ALPHA, tester};

#[test]
fn test_two_level_ks_layer() {
    let mut t = tester(BackendKind::Layer, Dimensions::Two, KernelName::Linear, 400);
    let result = t.two_level_test(TestKind::Ks, 20, 100, false).unwrap();
    assert_eq!(result.kind, TestKind::Ks);
    assert_eq!(result.start_seed, 100);
    assert_eq!(result.p_values.len(), 20);
    assert!(result.p_values.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(result.ks.p_value > ALPHA, "p = {}", result.ks.p_value);
}

#[test]
fn test_two_level_z_control_csa() {
    let mut t = tester(BackendKind::Csa, Dimensions::Two, KernelName::Gaussian, 400);
    let result = t.two_level_test(TestKind::Z, 10, 7, true).unwrap();
    assert_eq!(result.p_values.len(), 10);
    assert_eq!(result.ks.sample_size, 10);
}

#[test]
fn test_two_level_reproducible() {
    let mut a = tester(BackendKind::Layer, Dimensions::Two, KernelName::Gaussian, 200);
    let mut b = tester(BackendKind::Layer, Dimensions::Two, KernelName::Gaussian, 200);
    let ra = a.two_level_test(TestKind::Ks, 5, 42, false).unwrap();
    let rb = b.two_level_test(TestKind::Ks, 5, 42, false).unwrap();
    assert_eq!(ra, rb);
}

#[test]
fn test_two_level_runs_match_single_tests() {
    let mut t = tester(BackendKind::Layer, Dimensions::Two, KernelName::Gaussian, 200);
    let result = t.two_level_test(TestKind::Ks, 3, 10, false).unwrap();
    let single = t.ks_test(false, Some(12)).unwrap();
    assert_eq!(result.p_values[2], single.p_value);
}

#[test]
fn test_two_level_zero_runs() {
    let mut t = tester(BackendKind::Layer, Dimensions::Two, KernelName::Gaussian, 50);
    assert!(t.two_level_test(TestKind::Ks, 0, 0, false).is_err());
}

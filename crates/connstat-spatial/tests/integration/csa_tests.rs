//! Integration tests for the connection-set algebra backend.

use connstat_core::{BackendKind, Dimensions, KernelName, KernelParams};

use crate::common::{ALPHA, tester, tester_with_params};

#[test]
fn test_ks_accepts_gaussian() {
    let mut t = tester(BackendKind::Csa, Dimensions::Two, KernelName::Gaussian, 3000);
    let ks = t.ks_test(false, Some(6)).unwrap();
    assert!(ks.p_value > ALPHA, "p = {}", ks.p_value);
}

#[test]
fn test_ks_accepts_narrow_gaussian() {
    let params = KernelParams::from([("sigma".to_string(), 0.1)]);
    let mut t = tester_with_params(
        BackendKind::Csa,
        Dimensions::Two,
        KernelName::Gaussian,
        5000,
        params,
    );
    let ks = t.ks_test(false, Some(12)).unwrap();
    assert!(ks.p_value > ALPHA, "p = {}", ks.p_value);
}

#[test]
fn test_z_accepts_gaussian() {
    let mut t = tester(BackendKind::Csa, Dimensions::Two, KernelName::Gaussian, 3000);
    let z = t.z_test(false, Some(6)).unwrap();
    assert!(z.p_value > ALPHA, "z = {}", z.z);
}

#[test]
fn test_targets_inside_square() {
    let mut t = tester(BackendKind::Csa, Dimensions::Two, KernelName::Gaussian, 1000);
    t.sample(false, Some(3)).unwrap();
    let positions = t.positions().unwrap();
    assert_eq!(positions.len(), 1000);
    assert!(
        positions
            .iter()
            .all(|p| p.coords().iter().all(|c| (0.0..1.0).contains(c)))
    );
    assert_eq!(t.extent().center.coords(), &[0.5, 0.5]);
}

#[test]
fn test_control_matches_backend_statistics() {
    let mut t = tester(BackendKind::Csa, Dimensions::Two, KernelName::Gaussian, 3000);
    let backend = t.sample(false, Some(30)).unwrap().len() as f64;
    let control = t.sample(true, Some(30)).unwrap().len() as f64;
    // Same positions, independent Bernoulli draws: counts agree within a
    // few standard deviations (variance < 3000 / 4 each).
    assert!((backend - control).abs() < 5.0 * (2.0 * 750.0f64).sqrt());
}

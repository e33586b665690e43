//! Integration tests for CSV export of realised networks.

use connstat_core::{BackendKind, Dimensions, KernelName};
use connstat_spatial::export::{NetworkRow, cdf_rows, network_rows, pdf_rows, write_csv_file};

use crate::common::tester;

#[test]
fn test_network_rows_flag_connected_targets() {
    let mut t = tester(BackendKind::Layer, Dimensions::Two, KernelName::Gaussian, 300);
    let sample = t.sample(false, Some(5)).unwrap();
    let rows = network_rows(&*t).unwrap();
    assert_eq!(rows.len(), 300);
    assert_eq!(rows.iter().filter(|r| r.connected).count(), sample.len());
    assert!(rows.iter().all(|r| r.z.is_none()));
}

#[test]
fn test_network_rows_3d_have_z() {
    let mut t = tester(BackendKind::Layer, Dimensions::Three, KernelName::Linear, 100);
    t.sample(false, Some(5)).unwrap();
    let rows: Vec<NetworkRow> = network_rows(&*t).unwrap();
    assert!(rows.iter().all(|r| r.z.is_some()));
}

#[test]
fn test_export_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut t = tester(BackendKind::Csa, Dimensions::Two, KernelName::Gaussian, 500);
    let sample = t.sample(false, Some(9)).unwrap();
    let expected = t.expected();

    let network = dir.path().join("network.csv");
    write_csv_file(&network, &network_rows(&*t).unwrap()).unwrap();
    let text = std::fs::read_to_string(&network).unwrap();
    assert!(text.starts_with("x,y,z,connected\n"));
    assert_eq!(text.lines().count(), 501);

    let pdf = dir.path().join("pdf.csv");
    write_csv_file(&pdf, &pdf_rows(&sample, &expected, 25).unwrap()).unwrap();
    let text = std::fs::read_to_string(&pdf).unwrap();
    assert!(text.starts_with("distance,observed,expected\n"));
    assert_eq!(text.lines().count(), 26);

    let cdf = dir.path().join("cdf.csv");
    write_csv_file(&cdf, &cdf_rows(&sample, &expected)).unwrap();
    let text = std::fs::read_to_string(&cdf).unwrap();
    assert_eq!(text.lines().count(), sample.len() + 1);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing").join("network.csv");
    let rows: Vec<NetworkRow> = Vec::new();
    let err = write_csv_file(&path, &rows).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

//! Plot data: network layout, PDF and CDF comparisons as CSV.
//!
//! Each export is a list of serialisable rows; [`write_csv`] and
//! [`write_csv_file`] write any of them with a header line.

use crate::expected::ExpectedDistribution;
use crate::tester::SpatialTester;
use connstat_core::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// One target node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NetworkRow {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate (empty in 2D).
    pub z: Option<f64>,
    /// Whether the source connects to this node.
    pub connected: bool,
}

/// Observed and expected density at the centre of a histogram bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PdfRow {
    /// Bin centre.
    pub distance: f64,
    /// Observed density.
    pub observed: f64,
    /// Expected density.
    pub expected: f64,
}

/// Empirical and expected CDF at an observed distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CdfRow {
    /// Observed distance.
    pub distance: f64,
    /// Empirical CDF.
    pub observed: f64,
    /// Expected CDF.
    pub expected: f64,
}

/// Positions of all target nodes of a built (and connected) tester.
pub fn network_rows<T: SpatialTester + ?Sized>(tester: &T) -> Result<Vec<NetworkRow>> {
    let connected: HashSet<usize> = tester.target_indices()?.into_iter().collect();
    Ok(tester
        .positions()?
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let c = p.coords();
            NetworkRow {
                x: c[0],
                y: c[1],
                z: c.get(2).copied(),
                connected: connected.contains(&i),
            }
        })
        .collect())
}

/// Density histogram of `sample` over `[0, max_distance]` next to the
/// expected PDF.
pub fn pdf_rows(
    sample: &[f64],
    expected: &ExpectedDistribution,
    bins: usize,
) -> Result<Vec<PdfRow>> {
    if bins == 0 {
        return Err(Error::invalid_parameter("bins", "must be at least 1"));
    }
    let max = expected.max_distance();
    let width = max / bins as f64;
    let mut counts = vec![0usize; bins];
    for &d in sample {
        let i = ((d / width).floor().max(0.0) as usize).min(bins - 1);
        counts[i] += 1;
    }
    let n = sample.len().max(1) as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let distance = (i as f64 + 0.5) * width;
            PdfRow {
                distance,
                observed: count as f64 / (n * width),
                expected: expected.pdf(distance),
            }
        })
        .collect())
}

/// Empirical CDF of `sample` next to the expected CDF.
pub fn cdf_rows(sample: &[f64], expected: &ExpectedDistribution) -> Vec<CdfRow> {
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, distance)| CdfRow {
            distance,
            observed: (i + 1) as f64 / n,
            expected: expected.cdf(distance),
        })
        .collect()
}

/// Writes `rows` as CSV with a header.
pub fn write_csv<W: Write, R: Serialize>(writer: W, rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `rows` as CSV to `path`.
pub fn write_csv_file<R: Serialize>(path: &Path, rows: &[R]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io_with_path(e, path))?;
    write_csv(file, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

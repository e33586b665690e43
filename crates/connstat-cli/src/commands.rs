//! Test and export commands.

use crate::cli::{Cli, Command, ExportKind, NetworkArgs};
use crate::config_handlers::handle_config_command;
use connstat_core::{ConfigManager, ConnstatConfig, Dimensions, Kernel, KsResult, ZResult};
use connstat_spatial::export::{cdf_rows, network_rows, pdf_rows, write_csv, write_csv_file};
use connstat_spatial::tester::resolve_seed;
use connstat_spatial::{SpatialTester, TestKind, TwoLevelResult, from_config};
use serde::Serialize;
use std::path::Path;

/// Runs the parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Ks(network) => {
            let config = load_config(config_path, &network)?;
            let report = ks(&config)?;
            let text = render_report(&report, cli.json, |r| {
                format!(
                    "p-value of KS-test: {}\nstatistic D = {} over {} connections",
                    r.result.p_value, r.result.statistic, r.result.sample_size
                )
            })?;
            println!("{text}");
        }
        Command::Z(network) => {
            let config = load_config(config_path, &network)?;
            let report = z(&config)?;
            let text = render_report(&report, cli.json, |r| {
                format!(
                    "p-value of Z-test: {}\nz = {} ({} observed, {:.2} expected)",
                    r.result.p_value, r.result.z, r.result.observed, r.result.expected
                )
            })?;
            println!("{text}");
        }
        Command::TwoLevel {
            network,
            test,
            runs,
            start_seed,
        } => {
            let config = load_config(config_path, &network)?;
            let report = two_level(&config, test, runs, start_seed)?;
            let text = render_report(&report, cli.json, |r| {
                format!(
                    "p-value of two-level {} test: {}\n{} runs from seed {}, statistic D = {}",
                    r.result.kind,
                    r.result.ks.p_value,
                    r.result.p_values.len(),
                    r.result.start_seed,
                    r.result.ks.statistic
                )
            })?;
            println!("{text}");
        }
        Command::Export {
            what,
            out,
            bins,
            network,
        } => {
            let config = load_config(config_path, &network)?;
            export(&config, what, bins, out.as_deref())?;
        }
        Command::Config { action } => handle_config_command(config_path, action)?,
    }
    Ok(())
}

/// Loads the configuration file and applies command-line overrides.
pub fn load_config(config_path: Option<&str>, args: &NetworkArgs) -> anyhow::Result<ConnstatConfig> {
    let mut config = ConnstatConfig::load(config_path)?;
    args.apply(&mut config);
    config.validate()?;
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

/// Test outcome with the settings that produced it.
#[derive(Debug, Serialize)]
pub struct Report<T> {
    /// Backend name.
    pub backend: &'static str,
    /// Kernel under test.
    pub kernel: Kernel,
    /// Number of dimensions.
    pub dimensions: Dimensions,
    /// Side length.
    pub side_length: f64,
    /// Number of target nodes.
    pub nodes: usize,
    /// Seed of the (first) run.
    pub seed: u64,
    /// Whether connections were drawn from the kernel directly.
    pub control: bool,
    /// Test outcome.
    pub result: T,
}

impl<T> Report<T> {
    fn new(tester: &dyn SpatialTester, seed: u64, control: bool, result: T) -> Self {
        Self {
            backend: tester.backend(),
            kernel: *tester.kernel(),
            dimensions: tester.extent().dimensions(),
            side_length: tester.extent().side_length,
            nodes: tester.nodes(),
            seed,
            control,
            result,
        }
    }
}

/// Single KS test.
pub fn ks(config: &ConnstatConfig) -> anyhow::Result<Report<KsResult>> {
    let mut tester = from_config(&config.network)?;
    let seed = resolve_seed(config.test.seed);
    let result = tester.ks_test(config.test.control, Some(seed))?;
    Ok(Report::new(&*tester, seed, config.test.control, result))
}

/// Single Z-test.
pub fn z(config: &ConnstatConfig) -> anyhow::Result<Report<ZResult>> {
    let mut tester = from_config(&config.network)?;
    let seed = resolve_seed(config.test.seed);
    let result = tester.z_test(config.test.control, Some(seed))?;
    Ok(Report::new(&*tester, seed, config.test.control, result))
}

/// Two-level test; `runs` and `start_seed` fall back to the configuration.
pub fn two_level(
    config: &ConnstatConfig,
    kind: TestKind,
    runs: Option<usize>,
    start_seed: Option<u64>,
) -> anyhow::Result<Report<TwoLevelResult>> {
    let mut tester = from_config(&config.network)?;
    let seed = resolve_seed(start_seed.or(config.test.seed));
    let runs = runs.unwrap_or(config.test.runs);
    let result = tester.two_level_test(kind, runs, seed, config.test.control)?;
    Ok(Report::new(&*tester, seed, config.test.control, result))
}

/// Realises one network and writes the requested plot data.
pub fn export(
    config: &ConnstatConfig,
    what: ExportKind,
    bins: Option<usize>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let mut tester = from_config(&config.network)?;
    let seed = resolve_seed(config.test.seed);
    let sample = tester.sample(config.test.control, Some(seed))?;
    tracing::info!(seed, ?what, connections = sample.len(), "exporting");

    match what {
        ExportKind::Network => {
            if config.test.control {
                tracing::warn!("network export shows backend connections; --control is ignored");
                tester.reset(Some(seed));
                tester.build()?;
                tester.connect()?;
            }
            write_rows(out, &network_rows(&*tester)?)
        }
        ExportKind::Pdf => {
            let rows = pdf_rows(&sample, &tester.expected(), bins.unwrap_or(config.test.bins))?;
            write_rows(out, &rows)
        }
        ExportKind::Cdf => write_rows(out, &cdf_rows(&sample, &tester.expected())),
    }
}

fn write_rows<R: Serialize>(out: Option<&Path>, rows: &[R]) -> anyhow::Result<()> {
    match out {
        Some(path) => write_csv_file(path, rows)?,
        None => write_csv(std::io::stdout().lock(), rows)?,
    }
    Ok(())
}

/// Formats a report as pretty JSON, or as a settings line followed by the
/// test-specific `human` text.
fn render_report<T: Serialize>(
    report: &Report<T>,
    json: bool,
    human: impl FnOnce(&Report<T>) -> String,
) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    Ok(format!(
        "{} backend, kernel {}, {} nodes in {} (L = {}), seed {}{}\n{}",
        report.backend,
        report.kernel,
        report.nodes,
        report.dimensions,
        report.side_length,
        report.seed,
        if report.control { ", control" } else { "" },
        human(report)
    ))
}

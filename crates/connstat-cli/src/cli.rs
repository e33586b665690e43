//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use connstat_core::kernel::parse_param;
use connstat_core::{BackendKind, ConnstatConfig, Dimensions, KernelName};
use connstat_spatial::TestKind;
use std::path::PathBuf;

/// Statistical tests for spatial network connection algorithms.
#[derive(Parser, Debug)]
#[command(name = "connstat", version)]
#[command(about = "Test spatial connection algorithms against their kernels", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CONNSTAT_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Kolmogorov-Smirnov test of connection distances
    Ks(NetworkArgs),

    /// Z-test of the number of connections
    Z(NetworkArgs),

    /// Repeat a test over consecutive seeds and KS-test the p-values
    TwoLevel {
        /// Network overrides
        #[command(flatten)]
        network: NetworkArgs,

        /// First-level test to repeat (ks or z)
        #[arg(long, default_value = "ks")]
        test: TestKind,

        /// Number of runs [default: test.runs]
        #[arg(long)]
        runs: Option<usize>,

        /// Seed of the first run [default: --seed, or random]
        #[arg(long)]
        start_seed: Option<u64>,
    },

    /// Write plot data of one realised network as CSV
    Export {
        /// What to export
        #[arg(value_enum)]
        what: ExportKind,

        /// Output file [default: stdout]
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Histogram bins for pdf export [default: test.bins]
        #[arg(long)]
        bins: Option<usize>,

        /// Network overrides
        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Plot data sets.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// Target positions with a connected flag
    Network,
    /// Histogram of connected distances next to the expected density
    Pdf,
    /// Empirical CDF of connected distances next to the expected CDF
    Cdf,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Get a configuration value by dotted key
    Get {
        /// Dotted key, e.g. network.nodes
        key: String,
    },

    /// Set a configuration value by dotted key
    Set {
        /// Dotted key, e.g. network.kernel
        key: String,
        /// New value
        value: String,
    },

    /// Create a default configuration file
    Init {
        /// Output file [default: platform config dir]
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as CONNSTAT_* environment variables
    Export {
        /// Format as docker --env flags
        #[arg(long)]
        docker_env: bool,
    },
}

/// Command-line overrides of the network and test configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// Connection backend (layer or csa)
    #[arg(short, long)]
    pub backend: Option<BackendKind>,

    /// Number of dimensions (2 or 3)
    #[arg(short, long)]
    pub dimensions: Option<Dimensions>,

    /// Side length of the square or cube
    #[arg(short = 'L', long)]
    pub side_length: Option<f64>,

    /// Number of target nodes
    #[arg(short = 'N', long)]
    pub nodes: Option<usize>,

    /// Kernel family (constant, linear, exponential, gaussian)
    #[arg(short, long)]
    pub kernel: Option<KernelName>,

    /// Kernel parameter override, e.g. --param sigma=0.1 (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, f64)>,

    /// PRNG seed [default: random]
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Draw connections directly from the kernel instead of the backend
    #[arg(long)]
    pub control: bool,
}

impl NetworkArgs {
    /// Applies the overrides on top of a loaded configuration.
    ///
    /// Choosing a different kernel family discards parameters configured
    /// for the previous one.
    pub fn apply(&self, config: &mut ConnstatConfig) {
        let network = &mut config.network;
        if let Some(backend) = self.backend {
            network.backend = backend;
        }
        if let Some(dimensions) = self.dimensions {
            network.dimensions = dimensions;
        }
        if let Some(side_length) = self.side_length {
            network.side_length = side_length;
        }
        if let Some(nodes) = self.nodes {
            network.nodes = nodes;
        }
        if let Some(kernel) = self.kernel
            && kernel != network.kernel
        {
            network.kernel = kernel;
            network.kernel_params.clear();
        }
        network.kernel_params.extend(self.params.iter().cloned());
        if self.seed.is_some() {
            config.test.seed = self.seed;
        }
        if self.control {
            config.test.control = true;
        }
    }
}

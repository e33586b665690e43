//! # connstat-cli
//!
//! Command-line front end for connstat:
//! - `ks`, `z`: single statistical tests of one realised network
//! - `two-level`: repeated tests with a uniformity check of the p-values
//! - `export`: network layout, PDF and CDF plot data as CSV
//! - `config`: inspect and edit the TOML configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;

pub use cli::Cli;
pub use commands::run;

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Connstat Core
//!
//! Shared types for testing spatial connection algorithms:
//!
//! - [`geometry`]: dimensions, positions and (optionally periodic) extents
//! - [`kernel`]: distance-dependent connection-probability kernels
//! - [`network`]: spatially embedded network graph
//! - [`stats`]: Kolmogorov-Smirnov and Z tests
//! - [`config`]: TOML configuration with environment overrides
//! - [`error`]: error types and `Result` alias

pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod network;
mod proptests;
pub mod stats;

// Re-exports for convenience
pub use config::{BackendKind, ConfigManager, ConnstatConfig};
pub use error::{Error, Result};
pub use geometry::{Dimensions, Extent, Position};
pub use kernel::{Kernel, KernelName, KernelParams};
pub use network::{Node, SpatialNetwork, Synapse};
pub use stats::{KsResult, ZResult};

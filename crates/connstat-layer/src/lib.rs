#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Connstat Layer
//!
//! Spatial layers in the style of a simulator topology module: nodes are
//! created at explicit positions inside an extent, and two layers are
//! connected by a mask (which displacements are eligible) and a kernel
//! (connection probability as a function of distance).

mod connect;
mod layer;
mod mask;
mod proptests;

pub use connect::{ConnectionSpec, ConnectionType, connect_layers};
pub use layer::{Layer, LayerSpec, distances, find_center_element, target_positions};
pub use mask::ConnectionMask;

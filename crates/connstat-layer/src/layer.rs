//! Layer creation and spatial queries.

use connstat_core::network::NodeIndex;
use connstat_core::{Error, Extent, Position, Result, SpatialNetwork};
use tracing::debug;

/// Description of a layer to create.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    /// Population name given to the created nodes.
    pub name: String,
    /// Node positions.
    pub positions: Vec<Position>,
    /// Region the layer occupies.
    pub extent: Extent,
}

/// Nodes of a layer inside a [`SpatialNetwork`].
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    name: String,
    extent: Extent,
    nodes: Vec<NodeIndex>,
}

impl Layer {
    /// Adds the layer's nodes to `network`.
    ///
    /// Every position must have the extent's dimensionality and lie inside
    /// the extent.
    pub fn create(network: &mut SpatialNetwork, spec: LayerSpec) -> Result<Self> {
        if spec.positions.is_empty() {
            return Err(Error::validation(format!("layer '{}' has no nodes", spec.name)));
        }
        if let Some(p) = spec.positions.iter().find(|p| !spec.extent.contains(p)) {
            return Err(Error::validation(format!(
                "position {p} lies outside layer '{}'",
                spec.name
            )));
        }
        let nodes = network.add_population(&spec.name, spec.positions);
        debug!(layer = %spec.name, nodes = nodes.len(), "created layer");
        Ok(Self {
            name: spec.name,
            extent: spec.extent,
            nodes,
        })
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region of the layer.
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Node indices in creation order.
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the layer has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` belongs to this layer.
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.contains(&node)
    }
}

fn position_of(network: &SpatialNetwork, node: NodeIndex) -> Result<Position> {
    network
        .position(node)
        .ok_or_else(|| Error::validation(format!("node {} does not exist", node.index())))
}

/// Node of `layer` closest to the centre of its extent.
pub fn find_center_element(network: &SpatialNetwork, layer: &Layer) -> Result<NodeIndex> {
    let mut best: Option<(NodeIndex, f64)> = None;
    for &node in layer.nodes() {
        let d = layer
            .extent()
            .distance(&layer.extent().center, &position_of(network, node)?)?;
        if best.is_none_or(|(_, b)| d < b) {
            best = Some((node, d));
        }
    }
    best.map(|(n, _)| n)
        .ok_or_else(|| Error::validation(format!("layer '{}' has no nodes", layer.name())))
}

/// Distances from `from` to each node in `to`, measured in `layer`'s
/// geometry (periodic if the layer wraps).
pub fn distances(
    network: &SpatialNetwork,
    layer: &Layer,
    from: NodeIndex,
    to: &[NodeIndex],
) -> Result<Vec<f64>> {
    let origin = position_of(network, from)?;
    to.iter()
        .map(|&n| layer.extent().distance(&origin, &position_of(network, n)?))
        .collect()
}

/// Positions of the nodes in `layer` that `source` connects to.
pub fn target_positions(
    network: &SpatialNetwork,
    source: NodeIndex,
    layer: &Layer,
) -> Result<Vec<Position>> {
    network
        .targets(source)
        .into_iter()
        .filter(|t| layer.contains(*t))
        .map(|t| position_of(network, t))
        .collect()
}

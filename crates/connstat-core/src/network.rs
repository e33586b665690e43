//! Spatially embedded network graph.
//!
//! Both connection backends realise their connections into a
//! [`SpatialNetwork`]: nodes carry a population name and a position, edges
//! carry synapse parameters.

use crate::geometry::Position;
use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

pub use petgraph::graph::NodeIndex;

/// A node placed in space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Name of the population this node belongs to.
    pub population: String,
    /// Index of the node inside its population.
    pub local_index: usize,
    /// Location of the node.
    pub position: Position,
}

/// Parameters of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    /// Synaptic weight.
    pub weight: f64,
    /// Transmission delay.
    pub delay: f64,
}

impl Default for Synapse {
    fn default() -> Self {
        Self {
            weight: 1.0,
            delay: 1.0,
        }
    }
}

/// Directed graph of positioned nodes.
#[derive(Clone, Debug, Default)]
pub struct SpatialNetwork {
    graph: DiGraph<Node, Synapse>,
}

impl SpatialNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one node per position and returns their indices in order.
    pub fn add_population<I>(&mut self, name: &str, positions: I) -> Vec<NodeIndex>
    where
        I: IntoIterator<Item = Position>,
    {
        positions
            .into_iter()
            .enumerate()
            .map(|(local_index, position)| {
                self.graph.add_node(Node {
                    population: name.to_string(),
                    local_index,
                    position,
                })
            })
            .collect()
    }

    /// Connects `source` to `target`.
    pub fn connect(&mut self, source: NodeIndex, target: NodeIndex, synapse: Synapse) {
        self.graph.add_edge(source, target, synapse);
    }

    /// Node data for `index`.
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(index)
    }

    /// Position of `index`.
    pub fn position(&self, index: NodeIndex) -> Option<Position> {
        self.node(index).map(|n| n.position)
    }

    /// Targets of `source` in the order the connections were made.
    pub fn targets(&self, source: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(source, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        // petgraph yields outgoing edges newest first
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, t)| t).collect()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total number of connections.
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }
}

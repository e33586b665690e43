//! Kernel-based connection between layers.

use crate::layer::Layer;
use crate::mask::ConnectionMask;
use connstat_core::network::NodeIndex;
use connstat_core::{Error, Kernel, Result, SpatialNetwork, Synapse};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Direction in which candidate pairs are enumerated.
///
/// Both directions produce the same connection probabilities; they differ
/// only in the order random numbers are consumed and connections created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// For each source, visit every target.
    #[default]
    Divergent,
    /// For each target, visit every source.
    Convergent,
}

/// How two layers are connected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    /// Enumeration order.
    pub connection_type: ConnectionType,
    /// Eligible displacements; every pair is eligible when absent.
    pub mask: Option<ConnectionMask>,
    /// Connection probability as a function of distance.
    pub kernel: Kernel,
    /// Parameters given to every created connection.
    pub synapse: Synapse,
    /// Whether a node may connect to itself.
    pub allow_autapses: bool,
}

impl ConnectionSpec {
    /// Divergent connection with the given mask and kernel.
    pub fn divergent(mask: ConnectionMask, kernel: Kernel) -> Self {
        Self {
            connection_type: ConnectionType::Divergent,
            mask: Some(mask),
            kernel,
            synapse: Synapse::default(),
            allow_autapses: false,
        }
    }
}

/// Connects `source` to `target` according to `spec`.
///
/// Displacements are measured in the target layer's geometry, so a
/// wrapping target layer yields periodic distances. Returns the number of
/// connections created.
pub fn connect_layers<R: Rng + ?Sized>(
    network: &mut SpatialNetwork,
    source: &Layer,
    target: &Layer,
    spec: &ConnectionSpec,
    rng: &mut R,
) -> Result<usize> {
    let dims = target.extent().dimensions();
    if source.extent().dimensions() != dims {
        return Err(Error::validation(format!(
            "cannot connect a {} layer to a {dims} layer",
            source.extent().dimensions()
        )));
    }
    if let Some(mask) = &spec.mask {
        mask.validate(dims)?;
    }

    let pairs: Vec<(NodeIndex, NodeIndex)> = match spec.connection_type {
        ConnectionType::Divergent => source
            .nodes()
            .iter()
            .flat_map(|&s| target.nodes().iter().map(move |&t| (s, t)))
            .collect(),
        ConnectionType::Convergent => target
            .nodes()
            .iter()
            .flat_map(|&t| source.nodes().iter().map(move |&s| (s, t)))
            .collect(),
    };

    let mut created = 0;
    for (s, t) in pairs {
        if s == t && !spec.allow_autapses {
            continue;
        }
        let (Some(from), Some(to)) = (network.position(s), network.position(t)) else {
            return Err(Error::validation("layer refers to a node missing from the network"));
        };
        let displacement = target.extent().displacement(&from, &to)?;
        if spec.mask.is_some_and(|m| !m.contains(&displacement)) {
            continue;
        }
        let p = spec.kernel.probability(displacement.norm());
        if rng.random::<f64>() < p {
            network.connect(s, t, spec.synapse);
            created += 1;
        }
    }

    debug!(
        source = source.name(),
        target = target.name(),
        kernel = %spec.kernel,
        created,
        "connected layers"
    );
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layer::LayerSpec;
    use connstat_core::{Dimensions, Extent, KernelName, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layers(net: &mut SpatialNetwork, n: usize, rng: &mut StdRng) -> (Layer, Layer) {
        let extent = Extent::centered(Dimensions::Two, 1.0, true).unwrap();
        let src = Layer::create(
            net,
            LayerSpec {
                name: "source".to_string(),
                positions: vec![Position::origin(Dimensions::Two)],
                extent,
            },
        )
        .unwrap();
        let positions = (0..n)
            .map(|_| Position::Planar([rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5)]))
            .collect();
        let tgt = Layer::create(
            net,
            LayerSpec {
                name: "target".to_string(),
                positions,
                extent,
            },
        )
        .unwrap();
        (src, tgt)
    }

    #[test]
    fn test_constant_one_connects_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net = SpatialNetwork::new();
        let (src, tgt) = layers(&mut net, 200, &mut rng);
        let spec = ConnectionSpec::divergent(
            ConnectionMask::covering(tgt.extent()),
            Kernel::defaults(KernelName::Constant, 1.0),
        );
        assert_eq!(connect_layers(&mut net, &src, &tgt, &spec, &mut rng).unwrap(), 200);
        assert_eq!(net.targets(src.nodes()[0]).len(), 200);
    }

    #[test]
    fn test_mask_limits_targets() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut net = SpatialNetwork::new();
        let (src, tgt) = layers(&mut net, 500, &mut rng);
        let spec = ConnectionSpec::divergent(
            ConnectionMask::Circular { radius: 0.2 },
            Kernel::Constant { p: 1.0 },
        );
        connect_layers(&mut net, &src, &tgt, &spec, &mut rng).unwrap();
        for t in net.targets(src.nodes()[0]) {
            assert!(net.position(t).unwrap().norm() <= 0.2);
        }
    }

    #[test]
    fn test_zero_kernel_connects_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = SpatialNetwork::new();
        let (src, tgt) = layers(&mut net, 100, &mut rng);
        let spec = ConnectionSpec::divergent(
            ConnectionMask::covering(tgt.extent()),
            Kernel::Constant { p: 0.0 },
        );
        assert_eq!(connect_layers(&mut net, &src, &tgt, &spec, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut net = SpatialNetwork::new();
        let (src, tgt) = layers(&mut net, 10, &mut rng);
        let spec = ConnectionSpec::divergent(
            ConnectionMask::Spherical { radius: 1.0 },
            Kernel::Constant { p: 1.0 },
        );
        assert!(connect_layers(&mut net, &src, &tgt, &spec, &mut rng).is_err());
    }

    #[test]
    fn test_convergent_matches_divergent_count_for_certain_kernel() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = SpatialNetwork::new();
        let (src, tgt) = layers(&mut net, 50, &mut rng);
        let mut spec = ConnectionSpec::divergent(
            ConnectionMask::Circular { radius: 0.3 },
            Kernel::Constant { p: 1.0 },
        );
        let div = connect_layers(&mut net, &src, &tgt, &spec, &mut rng).unwrap();
        spec.connection_type = ConnectionType::Convergent;
        let conv = connect_layers(&mut net, &src, &tgt, &spec, &mut rng).unwrap();
        assert_eq!(div, conv);
    }

    #[test]
    fn test_autapses_skipped() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut net = SpatialNetwork::new();
        let (_, tgt) = layers(&mut net, 20, &mut rng);
        let spec = ConnectionSpec::divergent(
            ConnectionMask::covering(tgt.extent()),
            Kernel::Constant { p: 1.0 },
        );
        let created = connect_layers(&mut net, &tgt, &tgt, &spec, &mut rng).unwrap();
        assert_eq!(created, 20 * 19);
    }
}

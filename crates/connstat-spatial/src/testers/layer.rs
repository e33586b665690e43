//! Tester for layer/mask/kernel connection.

use crate::tester::{SpatialTester, resolve_seed};
use connstat_core::network::NodeIndex;
use connstat_core::{
    Dimensions, Error, Extent, Kernel, KernelName, KernelParams, Position, Result, SpatialNetwork,
};
use connstat_layer::{
    ConnectionMask, ConnectionSpec, Layer, LayerSpec, connect_layers, distances,
    find_center_element, target_positions,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

struct Built {
    network: SpatialNetwork,
    sources: Layer,
    targets: Layer,
    driver: NodeIndex,
}

/// Single source at the origin of a periodic layer, `N` targets scattered
/// uniformly over `[-L/2, L/2)^d`, divergent connection with a mask
/// covering the whole layer.
///
/// Seed `s` is mapped to `3s`; target positions use PRNG `3s`, connections
/// `3s + 1` and control draws `3s + 2`.
pub struct LayerSpatialTester {
    extent: Extent,
    nodes: usize,
    kernel: Kernel,
    spec: ConnectionSpec,
    position_rng: StdRng,
    connect_rng: StdRng,
    control_rng: StdRng,
    built: Option<Built>,
}

impl LayerSpatialTester {
    /// Creates a tester for `nodes` targets in a layer of side
    /// `side_length`.
    pub fn new(
        side_length: f64,
        nodes: usize,
        dimensions: Dimensions,
        kernel_name: KernelName,
        kernel_params: Option<&KernelParams>,
    ) -> Result<Self> {
        if nodes == 0 {
            return Err(Error::invalid_parameter("nodes", "must be at least 1"));
        }
        let extent = Extent::centered(dimensions, side_length, true)?;
        let kernel = Kernel::with_params(kernel_name, side_length, kernel_params)?;
        let spec = ConnectionSpec::divergent(ConnectionMask::covering(&extent), kernel);
        Ok(Self {
            extent,
            nodes,
            kernel,
            spec,
            position_rng: StdRng::seed_from_u64(0),
            connect_rng: StdRng::seed_from_u64(1),
            control_rng: StdRng::seed_from_u64(2),
            built: None,
        })
    }

    fn built(&self) -> Result<&Built> {
        self.built
            .as_ref()
            .ok_or_else(|| Error::validation("network not built; call build() first"))
    }
}

impl SpatialTester for LayerSpatialTester {
    fn backend(&self) -> &'static str {
        "layer"
    }

    fn extent(&self) -> &Extent {
        &self.extent
    }

    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn nodes(&self) -> usize {
        self.nodes
    }

    fn reset(&mut self, seed: Option<u64>) -> u64 {
        let seed = resolve_seed(seed);
        let base = seed.wrapping_mul(3);
        self.position_rng = StdRng::seed_from_u64(base);
        self.connect_rng = StdRng::seed_from_u64(base.wrapping_add(1));
        self.control_rng = StdRng::seed_from_u64(base.wrapping_add(2));
        self.built = None;
        seed
    }

    fn build(&mut self) -> Result<()> {
        let mut network = SpatialNetwork::new();
        let dims = self.extent.dimensions();
        let half = self.extent.side_length / 2.0;

        let sources = Layer::create(
            &mut network,
            LayerSpec {
                name: "source".to_string(),
                positions: vec![Position::origin(dims)],
                extent: self.extent,
            },
        )?;

        let rng = &mut self.position_rng;
        let mut coord = || rng.random_range(-half..half);
        let positions: Vec<Position> = (0..self.nodes)
            .map(|_| match dims {
                Dimensions::Two => Position::Planar([coord(), coord()]),
                Dimensions::Three => Position::Spatial([coord(), coord(), coord()]),
            })
            .collect();
        let targets = Layer::create(
            &mut network,
            LayerSpec {
                name: "target".to_string(),
                positions,
                extent: self.extent,
            },
        )?;

        let driver = find_center_element(&network, &sources)?;
        debug!(nodes = targets.len(), %dims, "built layers");
        self.built = Some(Built {
            network,
            sources,
            targets,
            driver,
        });
        Ok(())
    }

    fn connect(&mut self) -> Result<()> {
        let built = self
            .built
            .as_mut()
            .ok_or_else(|| Error::validation("network not built; call build() first"))?;
        connect_layers(
            &mut built.network,
            &built.sources,
            &built.targets,
            &self.spec,
            &mut self.connect_rng,
        )?;
        Ok(())
    }

    fn distances(&self) -> Result<Vec<f64>> {
        let b = self.built()?;
        distances(&b.network, &b.targets, b.driver, b.targets.nodes())
    }

    fn target_distances(&self) -> Result<Vec<f64>> {
        let b = self.built()?;
        let connected: Vec<NodeIndex> = b
            .network
            .targets(b.driver)
            .into_iter()
            .filter(|t| b.targets.contains(*t))
            .collect();
        distances(&b.network, &b.targets, b.driver, &connected)
    }

    fn positions(&self) -> Result<Vec<Position>> {
        let b = self.built()?;
        b.targets
            .nodes()
            .iter()
            .map(|&n| {
                b.network
                    .position(n)
                    .ok_or_else(|| Error::validation("target node missing from network"))
            })
            .collect()
    }

    fn target_positions(&self) -> Result<Vec<Position>> {
        let b = self.built()?;
        target_positions(&b.network, b.driver, &b.targets)
    }

    fn target_indices(&self) -> Result<Vec<usize>> {
        let b = self.built()?;
        Ok(b.network
            .targets(b.driver)
            .into_iter()
            .filter(|t| b.targets.contains(*t))
            .filter_map(|t| b.network.node(t).map(|n| n.local_index))
            .collect())
    }

    fn control_rng(&mut self) -> &mut StdRng {
        &mut self.control_rng
    }
}

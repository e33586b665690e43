//! Tester for connection-set algebra.

use crate::tester::{SpatialTester, resolve_seed};
use connstat_core::network::NodeIndex;
use connstat_core::{
    Dimensions, Error, Extent, Kernel, KernelName, KernelParams, Position, Result, SpatialNetwork,
};
use connstat_csa::{ConnectionSet, GaussianFn, Mask, Metric, PointSet, euclid_metric_2d};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

const BACKEND: &str = "CSA";

struct Built {
    network: SpatialNetwork,
    metric: Metric,
    sources: Vec<NodeIndex>,
    targets: Vec<NodeIndex>,
}

/// Single source at the centre of `[0, L)²`, `N` targets from
/// `random2d`, connected by
/// `cross({0}, 0..N) * random(gaussian(sigma, max_distance) * d)`.
///
/// Only the Gaussian kernel in 2D is expressible, and only its `sigma` may
/// be changed. Seed `s` is mapped to `2s`; positions and connections share
/// PRNG `2s`, control draws use `2s + 1`.
pub struct CsaSpatialTester {
    extent: Extent,
    nodes: usize,
    kernel: Kernel,
    sigma: f64,
    rng: StdRng,
    control_rng: StdRng,
    built: Option<Built>,
}

impl CsaSpatialTester {
    /// Creates a tester for `nodes` targets in a square of side
    /// `side_length`.
    pub fn new(
        side_length: f64,
        nodes: usize,
        dimensions: Dimensions,
        kernel_name: KernelName,
        kernel_params: Option<&KernelParams>,
    ) -> Result<Self> {
        if dimensions != Dimensions::Two {
            return Err(Error::unsupported(
                BACKEND,
                "construction of 3D spatial networks",
            ));
        }
        if kernel_name != KernelName::Gaussian {
            return Err(Error::unsupported(
                BACKEND,
                format!("the {kernel_name} kernel (only gaussian)"),
            ));
        }
        if let Some(key) = kernel_params
            .into_iter()
            .flat_map(|p| p.keys())
            .find(|k| k.as_str() != "sigma")
        {
            return Err(Error::invalid_parameter(
                key.as_str(),
                "only 'sigma' can be set for the CSA gaussian kernel",
            ));
        }
        if nodes == 0 {
            return Err(Error::invalid_parameter("nodes", "must be at least 1"));
        }

        let half = side_length / 2.0;
        let extent = Extent::new(Position::Planar([half, half]), side_length, false)?;
        let kernel = Kernel::with_params(kernel_name, side_length, kernel_params)?;
        let Kernel::Gaussian { sigma, .. } = kernel else {
            return Err(Error::unsupported(BACKEND, format!("the {kernel} kernel")));
        };

        Ok(Self {
            extent,
            nodes,
            kernel,
            sigma,
            rng: StdRng::seed_from_u64(0),
            control_rng: StdRng::seed_from_u64(1),
            built: None,
        })
    }

    fn built(&self) -> Result<&Built> {
        self.built
            .as_ref()
            .ok_or_else(|| Error::validation("network not built; call build() first"))
    }
}

impl SpatialTester for CsaSpatialTester {
    fn backend(&self) -> &'static str {
        "csa"
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
        let base = seed.wrapping_mul(2);
        self.rng = StdRng::seed_from_u64(base);
        self.control_rng = StdRng::seed_from_u64(base.wrapping_add(1));
        self.built = None;
        seed
    }

    fn build(&mut self) -> Result<()> {
        let source = PointSet::single(self.extent.center);
        let targets = PointSet::random2d(self.nodes, self.extent.side_length, &mut self.rng);

        let mut network = SpatialNetwork::new();
        let source_ids = network.add_population("source", source.positions().iter().copied());
        let target_ids = network.add_population("target", targets.positions().iter().copied());
        let metric = euclid_metric_2d(source, targets)?;

        debug!(nodes = target_ids.len(), "built CSA populations");
        self.built = Some(Built {
            network,
            metric,
            sources: source_ids,
            targets: target_ids,
        });
        Ok(())
    }

    fn connect(&mut self) -> Result<()> {
        let built = self
            .built
            .as_mut()
            .ok_or_else(|| Error::validation("network not built; call build() first"))?;
        let cutoff = self.extent.max_distance();
        let mask = Mask::cross([0], 0..self.nodes)
            * Mask::random_by(GaussianFn::new(self.sigma, cutoff) * built.metric.clone());
        let cs = ConnectionSet::new(mask, 1.0, 1.0);
        let created = cs.realize_into(
            &mut built.network,
            &built.sources,
            &built.targets,
            &mut self.rng,
        )?;
        debug!(created, sigma = self.sigma, cutoff, "realised connection set");
        Ok(())
    }

    fn distances(&self) -> Result<Vec<f64>> {
        let b = self.built()?;
        Ok((0..b.targets.len()).map(|j| b.metric.distance(0, j)).collect())
    }

    fn target_distances(&self) -> Result<Vec<f64>> {
        let b = self.built()?;
        Ok(self
            .target_indices()?
            .into_iter()
            .map(|j| b.metric.distance(0, j))
            .collect())
    }

    fn positions(&self) -> Result<Vec<Position>> {
        Ok(self.built()?.metric.targets().positions().to_vec())
    }

    fn target_positions(&self) -> Result<Vec<Position>> {
        let b = self.built()?;
        Ok(self
            .target_indices()?
            .into_iter()
            .filter_map(|j| b.metric.targets().get(j))
            .collect())
    }

    fn target_indices(&self) -> Result<Vec<usize>> {
        let b = self.built()?;
        let source = b
            .sources
            .first()
            .copied()
            .ok_or_else(|| Error::validation("CSA source population is empty"))?;
        Ok(b.network
            .targets(source)
            .into_iter()
            .filter_map(|t| b.network.node(t))
            .filter(|n| n.population == "target")
            .map(|n| n.local_index)
            .collect())
    }

    fn control_rng(&mut self) -> &mut StdRng {
        &mut self.control_rng
    }
}

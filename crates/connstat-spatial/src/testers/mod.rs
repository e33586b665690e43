//! Connection backends wrapped as [`SpatialTester`]s.

mod csa;
mod layer;

pub use csa::CsaSpatialTester;
pub use layer::LayerSpatialTester;

use crate::tester::SpatialTester;
use connstat_core::config::NetworkConfig;
use connstat_core::{BackendKind, Result};

/// Builds the tester described by a network configuration.
pub fn from_config(config: &NetworkConfig) -> Result<Box<dyn SpatialTester>> {
    let params = (!config.kernel_params.is_empty()).then_some(&config.kernel_params);
    let tester: Box<dyn SpatialTester> = match config.backend {
        BackendKind::Layer => Box::new(LayerSpatialTester::new(
            config.side_length,
            config.nodes,
            config.dimensions,
            config.kernel,
            params,
        )?),
        BackendKind::Csa => Box::new(CsaSpatialTester::new(
            config.side_length,
            config.nodes,
            config.dimensions,
            config.kernel,
            params,
        )?),
    };
    tracing::debug!(
        backend = tester.backend(),
        kernel = %tester.kernel(),
        nodes = tester.nodes(),
        "created tester"
    );
    Ok(tester)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use connstat_core::{Dimensions, Error, KernelName, KernelParams};

    fn small(backend: BackendKind, kernel: KernelName) -> NetworkConfig {
        NetworkConfig {
            nodes: 800,
            backend,
            kernel,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_network() {
        for backend in [BackendKind::Layer, BackendKind::Csa] {
            let mut a = from_config(&small(backend, KernelName::Gaussian)).unwrap();
            let mut b = from_config(&small(backend, KernelName::Gaussian)).unwrap();
            assert_eq!(
                a.sample(false, Some(11)).unwrap(),
                b.sample(false, Some(11)).unwrap()
            );
            assert_eq!(a.positions().unwrap(), b.positions().unwrap());
            assert_eq!(a.target_indices().unwrap(), b.target_indices().unwrap());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut t = from_config(&small(BackendKind::Layer, KernelName::Gaussian)).unwrap();
        t.reset(Some(1));
        t.build().unwrap();
        let first = t.positions().unwrap();
        t.reset(Some(2));
        t.build().unwrap();
        assert_ne!(first, t.positions().unwrap());
    }

    #[test]
    fn test_not_built() {
        let t = from_config(&small(BackendKind::Csa, KernelName::Gaussian)).unwrap();
        assert!(t.distances().is_err());
        assert!(t.target_indices().is_err());
    }

    #[test]
    fn test_distances_within_max() {
        for dimensions in [Dimensions::Two, Dimensions::Three] {
            let config = NetworkConfig {
                dimensions,
                ..small(BackendKind::Layer, KernelName::Linear)
            };
            let mut t = from_config(&config).unwrap();
            t.reset(Some(3));
            t.build().unwrap();
            let max = t.extent().max_distance();
            let d = t.distances().unwrap();
            assert_eq!(d.len(), 800);
            assert!(d.iter().all(|&x| (0.0..=max + 1e-12).contains(&x)));
        }
    }

    #[test]
    fn test_target_views_agree() {
        for backend in [BackendKind::Layer, BackendKind::Csa] {
            let mut t = from_config(&small(backend, KernelName::Gaussian)).unwrap();
            let sample = t.sample(false, Some(5)).unwrap();
            let indices = t.target_indices().unwrap();
            let positions = t.positions().unwrap();
            let connected = t.target_positions().unwrap();
            assert_eq!(sample.len(), indices.len());
            assert_eq!(connected.len(), indices.len());
            for (i, p) in indices.iter().zip(&connected) {
                assert_eq!(positions[*i], *p);
            }
        }
    }

    #[test]
    fn test_constant_kernel_connects_everything() {
        let mut t = from_config(&small(BackendKind::Layer, KernelName::Constant)).unwrap();
        let z = t.z_test(false, Some(9)).unwrap();
        assert_eq!(z.observed, 800);
        assert_eq!(z.z, 0.0);
        assert_eq!(z.p_value, 1.0);
    }

    #[test]
    fn test_csa_connects_every_target_index() {
        let mut config = small(BackendKind::Csa, KernelName::Gaussian);
        config.kernel_params.insert("sigma".to_string(), 100.0);
        let mut t = from_config(&config).unwrap();
        t.sample(false, Some(4)).unwrap();
        let indices = t.target_indices().unwrap();
        // sigma >> L: practically every target connects.
        assert!(indices.len() > 790);
        assert!(indices.iter().all(|&i| i < 800));
    }

    #[test]
    fn test_csa_rejects_3d() {
        let config = NetworkConfig {
            dimensions: Dimensions::Three,
            ..small(BackendKind::Csa, KernelName::Gaussian)
        };
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, Error::Unsupported { .. }));
        assert!(err.to_string().contains("3D"));
    }

    #[test]
    fn test_csa_rejects_other_kernels() {
        for kernel in [
            KernelName::Constant,
            KernelName::Linear,
            KernelName::Exponential,
        ] {
            let err = from_config(&small(BackendKind::Csa, kernel)).err().unwrap();
            assert!(matches!(err, Error::Unsupported { .. }), "{kernel}");
        }
    }

    #[test]
    fn test_csa_rejects_non_sigma_params() {
        let mut config = small(BackendKind::Csa, KernelName::Gaussian);
        config.kernel_params = KernelParams::from([("mean".to_string(), 0.1)]);
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_zero_nodes_rejected() {
        for backend in [BackendKind::Layer, BackendKind::Csa] {
            let config = NetworkConfig {
                nodes: 0,
                ..small(backend, KernelName::Gaussian)
            };
            assert!(from_config(&config).is_err());
        }
    }

    #[test]
    fn test_control_ks_accepts() {
        for backend in [BackendKind::Layer, BackendKind::Csa] {
            let mut t = from_config(&small(backend, KernelName::Gaussian)).unwrap();
            let ks = t.ks_test(true, Some(21)).unwrap();
            assert!(ks.p_value > 1e-4, "{backend}: {}", ks.p_value);
        }
    }

    #[test]
    fn test_degenerate_kernel_ks_errors() {
        let mut config = small(BackendKind::Layer, KernelName::Constant);
        config.kernel_params.insert("p".to_string(), 0.0);
        let mut t = from_config(&config).unwrap();
        assert!(t.ks_test(false, Some(1)).is_err());
    }
}

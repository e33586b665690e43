//! Property-based tests for masks and layer connection.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{ConnectionMask, ConnectionSpec, Layer, LayerSpec, connect_layers};
    use connstat_core::{Dimensions, Extent, Kernel, Position, SpatialNetwork};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    proptest! {
        #[test]
        fn test_covering_mask_accepts_wrapped_displacements(
            side in 0.1f64..10.0,
            a in prop::array::uniform3(-0.49f64..0.49),
            b in prop::array::uniform3(-0.49f64..0.49),
        ) {
            let extent = Extent::centered(Dimensions::Three, side, true).unwrap();
            let at = |c: [f64; 3]| Position::Spatial(c.map(|x| x * side));
            let displacement = extent.displacement(&at(a), &at(b)).unwrap();
            prop_assert!(ConnectionMask::covering(&extent).contains(&displacement));
        }

        #[test]
        fn test_connection_count_bounded(
            n in 1usize..60,
            p in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut net = SpatialNetwork::new();
            let extent = Extent::centered(Dimensions::Two, 1.0, true).unwrap();
            let source = Layer::create(
                &mut net,
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
            let target = Layer::create(
                &mut net,
                LayerSpec {
                    name: "target".to_string(),
                    positions,
                    extent,
                },
            )
            .unwrap();
            let spec = ConnectionSpec::divergent(ConnectionMask::covering(&extent), Kernel::Constant { p });
            let created = connect_layers(&mut net, &source, &target, &spec, &mut rng).unwrap();
            prop_assert!(created <= n);
            prop_assert_eq!(created, net.connection_count());
            if p == 1.0 {
                prop_assert_eq!(created, n);
            }
        }
    }
}

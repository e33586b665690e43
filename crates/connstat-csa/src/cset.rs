//! Connection sets: a mask plus per-connection values.

use crate::mask::Mask;
use crate::value_set::ValueSet;
use connstat_core::network::NodeIndex;
use connstat_core::{Error, Result, SpatialNetwork, Synapse};
use rand::Rng;

/// One realised connection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    /// Source index.
    pub source: usize,
    /// Target index.
    pub target: usize,
    /// Weight value.
    pub weight: f64,
    /// Delay value.
    pub delay: f64,
}

/// A mask with weight and delay value sets.
#[derive(Debug)]
pub struct ConnectionSet {
    mask: Mask,
    weight: Box<dyn ValueSet>,
    delay: Box<dyn ValueSet>,
}

impl ConnectionSet {
    /// Creates a connection set.
    pub fn new<W, D>(mask: Mask, weight: W, delay: D) -> Self
    where
        W: ValueSet + 'static,
        D: ValueSet + 'static,
    {
        Self {
            mask,
            weight: Box::new(weight),
            delay: Box::new(delay),
        }
    }

    /// Realises the connection set.
    pub fn connections<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Connection>> {
        Ok(self
            .mask
            .pairs(rng)?
            .into_iter()
            .map(|(source, target)| Connection {
                source,
                target,
                weight: self.weight.value(source, target),
                delay: self.delay.value(source, target),
            })
            .collect())
    }

    /// Realises the connection set into `network`, mapping mask indices to
    /// the given node indices.
    pub fn realize_into<R: Rng + ?Sized>(
        &self,
        network: &mut SpatialNetwork,
        sources: &[NodeIndex],
        targets: &[NodeIndex],
        rng: &mut R,
    ) -> Result<usize> {
        let connections = self.connections(rng)?;
        for c in &connections {
            let (Some(&s), Some(&t)) = (sources.get(c.source), targets.get(c.target)) else {
                return Err(Error::validation(format!(
                    "connection ({}, {}) refers to a node outside the populations",
                    c.source, c.target
                )));
            };
            network.connect(
                s,
                t,
                Synapse {
                    weight: c.weight,
                    delay: c.delay,
                },
            );
        }
        Ok(connections.len())
    }
}

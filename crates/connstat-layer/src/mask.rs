//! Connection masks, anchored on the source node.

use connstat_core::{Dimensions, Error, Extent, Position, Result};
use serde::{Deserialize, Serialize};

/// Region of displacements (target − source) eligible for connection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMask {
    /// Axis-aligned rectangle (2D).
    Rectangular {
        /// Lower-left corner.
        lower_left: [f64; 2],
        /// Upper-right corner.
        upper_right: [f64; 2],
    },
    /// Axis-aligned box (3D).
    Box {
        /// Lower-left-front corner.
        lower_left: [f64; 3],
        /// Upper-right-back corner.
        upper_right: [f64; 3],
    },
    /// Disc of the given radius (2D).
    Circular {
        /// Radius.
        radius: f64,
    },
    /// Ball of the given radius (3D).
    Spherical {
        /// Radius.
        radius: f64,
    },
}

impl ConnectionMask {
    /// Rectangle or box covering a whole layer of side `L`, i.e.
    /// `[-L/2, L/2]` along every axis.
    pub fn covering(extent: &Extent) -> Self {
        let half = extent.side_length / 2.0;
        match extent.dimensions() {
            Dimensions::Two => Self::Rectangular {
                lower_left: [-half; 2],
                upper_right: [half; 2],
            },
            Dimensions::Three => Self::Box {
                lower_left: [-half; 3],
                upper_right: [half; 3],
            },
        }
    }

    /// Dimensionality the mask applies to.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            Self::Rectangular { .. } | Self::Circular { .. } => Dimensions::Two,
            Self::Box { .. } | Self::Spherical { .. } => Dimensions::Three,
        }
    }

    /// Checks the mask against a layer's dimensionality and its own
    /// geometry.
    pub fn validate(&self, dimensions: Dimensions) -> Result<()> {
        if self.dimensions() != dimensions {
            return Err(Error::validation(format!(
                "{} mask cannot be used with a {dimensions} layer",
                self.dimensions()
            )));
        }
        let ordered = |ll: &[f64], ur: &[f64]| ll.iter().zip(ur).all(|(a, b)| a <= b);
        match self {
            Self::Rectangular {
                lower_left,
                upper_right,
            } if !ordered(lower_left.as_slice(), upper_right.as_slice()) => Err(Error::validation(
                "mask lower_left must not exceed upper_right",
            )),
            Self::Box {
                lower_left,
                upper_right,
            } if !ordered(lower_left.as_slice(), upper_right.as_slice()) => Err(Error::validation(
                "mask lower_left must not exceed upper_right",
            )),
            Self::Circular { radius } | Self::Spherical { radius } if *radius <= 0.0 => {
                Err(Error::invalid_parameter("radius", "must be positive"))
            }
            _ => Ok(()),
        }
    }

    /// Whether a displacement falls inside the mask.
    pub fn contains(&self, displacement: &Position) -> bool {
        let d = displacement.coords();
        let inside = |ll: &[f64], ur: &[f64]| {
            d.iter()
                .zip(ll.iter().zip(ur))
                .all(|(x, (lo, hi))| *lo <= *x && *x <= *hi)
        };
        match (self, displacement.dimensions()) {
            (
                Self::Rectangular {
                    lower_left,
                    upper_right,
                },
                Dimensions::Two,
            ) => inside(lower_left.as_slice(), upper_right.as_slice()),
            (
                Self::Box {
                    lower_left,
                    upper_right,
                },
                Dimensions::Three,
            ) => inside(lower_left.as_slice(), upper_right.as_slice()),
            (Self::Circular { radius }, Dimensions::Two)
            | (Self::Spherical { radius }, Dimensions::Three) => displacement.norm() <= *radius,
            _ => false,
        }
    }
}

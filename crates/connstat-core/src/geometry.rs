//! Positions, extents and distances in 2D and 3D space.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Dimensions
// ============================================================================

/// Number of spatial dimensions a network lives in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensions {
    /// Square sheet.
    #[default]
    Two,
    /// Cube.
    Three,
}

impl Dimensions {
    /// Number of coordinates.
    pub fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Largest distance between the centre of a box of side `side_length`
    /// and any point inside it (half the box diagonal).
    pub fn max_distance(self, side_length: f64) -> f64 {
        match self {
            Self::Two => side_length / 2f64.sqrt(),
            Self::Three => side_length * 3f64.sqrt() / 2.0,
        }
    }
}

impl TryFrom<u8> for Dimensions {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(Error::invalid_parameter(
                "dimensions",
                format!("expected 2 or 3, got {other}"),
            )),
        }
    }
}

impl From<Dimensions> for u8 {
    fn from(value: Dimensions) -> Self {
        value.count() as u8
    }
}

impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "2d" => Ok(Self::Two),
            "3" | "3d" => Ok(Self::Three),
            other => Err(Error::invalid_parameter(
                "dimensions",
                format!("expected 2 or 3, got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}

// ============================================================================
// Position
// ============================================================================

/// A point in the plane or in space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    /// Two coordinates.
    Planar([f64; 2]),
    /// Three coordinates.
    Spatial([f64; 3]),
}

impl Position {
    /// The origin in the given number of dimensions.
    pub fn origin(dimensions: Dimensions) -> Self {
        Self::filled(dimensions, 0.0)
    }

    /// A point with every coordinate set to `value`.
    pub fn filled(dimensions: Dimensions, value: f64) -> Self {
        match dimensions {
            Dimensions::Two => Self::Planar([value; 2]),
            Dimensions::Three => Self::Spatial([value; 3]),
        }
    }

    /// Coordinates as a slice.
    pub fn coords(&self) -> &[f64] {
        match self {
            Self::Planar(c) => c,
            Self::Spatial(c) => c,
        }
    }

    /// Dimensionality of this position.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            Self::Planar(_) => Dimensions::Two,
            Self::Spatial(_) => Dimensions::Three,
        }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.coords().iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
        match (self, other) {
            (Self::Planar(a), Self::Planar(b)) => Ok(Self::Planar([f(a[0], b[0]), f(a[1], b[1])])),
            (Self::Spatial(a), Self::Spatial(b)) => Ok(Self::Spatial([
                f(a[0], b[0]),
                f(a[1], b[1]),
                f(a[2], b[2]),
            ])),
            _ => Err(Error::validation(format!(
                "cannot combine {} and {} positions",
                self.dimensions(),
                other.dimensions()
            ))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.coords().iter().map(|c| format!("{c:.6}")).collect();
        write!(f, "({})", parts.join(", "))
    }
}

// ============================================================================
// Extent
// ============================================================================

/// Square or cubic region of side `side_length` centred on `center`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Centre of the region.
    pub center: Position,
    /// Side length `L`.
    pub side_length: f64,
    /// Whether distances wrap around the region boundary.
    pub edge_wrap: bool,
}

impl Extent {
    /// Creates an extent, validating the side length.
    pub fn new(center: Position, side_length: f64, edge_wrap: bool) -> Result<Self> {
        if !side_length.is_finite() || side_length <= 0.0 {
            return Err(Error::invalid_parameter(
                "side_length",
                format!("must be positive and finite, got {side_length}"),
            ));
        }
        Ok(Self {
            center,
            side_length,
            edge_wrap,
        })
    }

    /// Extent centred on the origin.
    pub fn centered(dimensions: Dimensions, side_length: f64, edge_wrap: bool) -> Result<Self> {
        Self::new(Position::origin(dimensions), side_length, edge_wrap)
    }

    /// Dimensionality of the region.
    pub fn dimensions(&self) -> Dimensions {
        self.center.dimensions()
    }

    /// Whether `p` lies inside the closed region.
    pub fn contains(&self, p: &Position) -> bool {
        let half = self.side_length / 2.0;
        p.dimensions() == self.dimensions()
            && p
                .coords()
                .iter()
                .zip(self.center.coords())
                .all(|(a, c)| (a - c).abs() <= half)
    }

    /// Displacement vector from `from` to `to`, using the minimum image
    /// when the region wraps.
    pub fn displacement(&self, from: &Position, to: &Position) -> Result<Position> {
        let l = self.side_length;
        let wrap = self.edge_wrap;
        from.zip_with(to, |a, b| {
            let d = b - a;
            if wrap { d - l * (d / l).round() } else { d }
        })
    }

    /// Distance between two positions.
    pub fn distance(&self, from: &Position, to: &Position) -> Result<f64> {
        Ok(self.displacement(from, to)?.norm())
    }

    /// Largest distance from the centre to any point inside the region.
    pub fn max_distance(&self) -> f64 {
        self.dimensions().max_distance(self.side_length)
    }
}

//! Distance-dependent connection-probability kernels.
//!
//! A kernel maps the distance `D` between a source and a target node to the
//! probability that the two are connected. Values outside `[0, 1]` are
//! clipped when used as probabilities.
//!
//! Default parameters scale with the side length `L` of the layer so that
//! every kernel stays meaningful across the whole distance range:
//!
//! | kernel        | formula                                   | defaults                               |
//! |---------------|-------------------------------------------|----------------------------------------|
//! | `constant`    | `p`                                       | `p = 1`                                |
//! | `linear`      | `c + a·D`                                 | `a = -√2/L`, `c = 1`                   |
//! | `exponential` | `c + a·exp(-D/tau)`                       | `a = 1`, `c = 0`, `tau = -L/(√2·ln 0.1)` |
//! | `gaussian`    | `c + p_center·exp(-(D-mean)²/(2·sigma²))` | `p_center = 1`, `sigma = L/4`, `mean = 0`, `c = 0` |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Parameter overrides keyed by parameter name.
pub type KernelParams = BTreeMap<String, f64>;

/// Kernel family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelName {
    /// Distance-independent probability.
    Constant,
    /// Linear decay.
    Linear,
    /// Exponential decay.
    Exponential,
    /// Gaussian profile.
    #[default]
    Gaussian,
}

impl KernelName {
    /// All kernel families.
    pub const ALL: [KernelName; 4] = [
        Self::Constant,
        Self::Linear,
        Self::Exponential,
        Self::Gaussian,
    ];

    /// Lower-case kernel name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Linear => "linear",
            Self::Exponential => "exponential",
            Self::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for KernelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid_parameter(
                    "kernel",
                    format!("unknown kernel '{s}', expected constant, linear, exponential or gaussian"),
                )
            })
    }
}

/// A parameterised kernel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Kernel {
    /// `p`
    Constant {
        /// Connection probability.
        p: f64,
    },
    /// `c + a·D`
    Linear {
        /// Slope.
        a: f64,
        /// Intercept.
        c: f64,
    },
    /// `c + a·exp(-D/tau)`
    Exponential {
        /// Amplitude.
        a: f64,
        /// Offset.
        c: f64,
        /// Decay length.
        tau: f64,
    },
    /// `c + p_center·exp(-(D-mean)²/(2·sigma²))`
    Gaussian {
        /// Amplitude at `mean`.
        p_center: f64,
        /// Width.
        sigma: f64,
        /// Centre of the profile.
        mean: f64,
        /// Offset.
        c: f64,
    },
}

impl Kernel {
    /// Default kernel of the given family for a layer of side `side_length`.
    pub fn defaults(name: KernelName, side_length: f64) -> Self {
        let sqrt2 = 2f64.sqrt();
        match name {
            KernelName::Constant => Self::Constant { p: 1.0 },
            KernelName::Linear => Self::Linear {
                a: -sqrt2 / side_length,
                c: 1.0,
            },
            KernelName::Exponential => Self::Exponential {
                a: 1.0,
                c: 0.0,
                tau: -side_length / (sqrt2 * 0.1f64.ln()),
            },
            KernelName::Gaussian => Self::Gaussian {
                p_center: 1.0,
                sigma: side_length / 4.0,
                mean: 0.0,
                c: 0.0,
            },
        }
    }

    /// Default kernel with `params` applied on top.
    ///
    /// Unknown parameter names and non-finite values are rejected.
    pub fn with_params(
        name: KernelName,
        side_length: f64,
        params: Option<&KernelParams>,
    ) -> Result<Self> {
        let mut kernel = Self::defaults(name, side_length);
        if let Some(params) = params {
            for (key, value) in params {
                kernel.set(key, *value)?;
            }
        }
        kernel.validate()?;
        Ok(kernel)
    }

    /// Kernel family.
    pub fn name(&self) -> KernelName {
        match self {
            Self::Constant { .. } => KernelName::Constant,
            Self::Linear { .. } => KernelName::Linear,
            Self::Exponential { .. } => KernelName::Exponential,
            Self::Gaussian { .. } => KernelName::Gaussian,
        }
    }

    /// Names of the parameters this kernel accepts.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Self::Constant { .. } => &["p"],
            Self::Linear { .. } => &["a", "c"],
            Self::Exponential { .. } => &["a", "c", "tau"],
            Self::Gaussian { .. } => &["p_center", "sigma", "mean", "c"],
        }
    }

    /// Current parameters as a map.
    pub fn params(&self) -> KernelParams {
        let pairs: Vec<(&str, f64)> = match *self {
            Self::Constant { p } => vec![("p", p)],
            Self::Linear { a, c } => vec![("a", a), ("c", c)],
            Self::Exponential { a, c, tau } => vec![("a", a), ("c", c), ("tau", tau)],
            Self::Gaussian {
                p_center,
                sigma,
                mean,
                c,
            } => vec![
                ("p_center", p_center),
                ("sigma", sigma),
                ("mean", mean),
                ("c", c),
            ],
        };
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    /// Sets a single parameter by name.
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::invalid_parameter(key, "must be finite"));
        }
        let slot = match (self, key) {
            (Self::Constant { p }, "p") => p,
            (Self::Linear { a, .. }, "a") => a,
            (Self::Linear { c, .. }, "c") => c,
            (Self::Exponential { a, .. }, "a") => a,
            (Self::Exponential { c, .. }, "c") => c,
            (Self::Exponential { tau, .. }, "tau") => tau,
            (Self::Gaussian { p_center, .. }, "p_center") => p_center,
            (Self::Gaussian { sigma, .. }, "sigma") => sigma,
            (Self::Gaussian { mean, .. }, "mean") => mean,
            (Self::Gaussian { c, .. }, "c") => c,
            (kernel, _) => {
                return Err(Error::invalid_parameter(
                    key,
                    format!(
                        "not a parameter of the {} kernel (expected one of: {})",
                        kernel.name(),
                        kernel.parameter_names().join(", ")
                    ),
                ));
            }
        };
        *slot = value;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Exponential { tau, .. } if tau == 0.0 => {
                Err(Error::invalid_parameter("tau", "must be non-zero"))
            }
            Self::Gaussian { sigma, .. } if sigma <= 0.0 => {
                Err(Error::invalid_parameter("sigma", "must be positive"))
            }
            _ => Ok(()),
        }
    }

    /// Raw kernel value at distance `d`.
    pub fn value(&self, d: f64) -> f64 {
        match *self {
            Self::Constant { p } => p,
            Self::Linear { a, c } => c + a * d,
            Self::Exponential { a, c, tau } => c + a * (-d / tau).exp(),
            Self::Gaussian {
                p_center,
                sigma,
                mean,
                c,
            } => c + p_center * (-(d - mean).powi(2) / (2.0 * sigma * sigma)).exp(),
        }
    }

    /// Connection probability at distance `d`, clipped to `[0, 1]`.
    ///
    /// A kernel value that overflows to NaN counts as probability 0.
    pub fn probability(&self, d: f64) -> f64 {
        let v = self.value(d);
        if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(f, "{}({})", self.name(), params.join(", "))
    }
}

/// Parses `key=value` into a parameter override.
pub fn parse_param(s: &str) -> Result<(String, f64)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| Error::invalid_parameter(s, "expected KEY=VALUE"))?;
    let key = key.trim();
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_parameter(key, format!("'{}' is not a number", value.trim())))?;
    Ok((key.to_string(), value))
}

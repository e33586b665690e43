//! Configuration file handling.
//!
//! Configuration is resolved in this order:
//!
//! 1. explicit path (`--config`)
//! 2. `CONNSTAT_CONFIG` environment variable
//! 3. `<platform config dir>/connstat/config.toml`
//!
//! A missing file at the default location yields the built-in defaults.
//! After the file is read, `CONNSTAT_<SECTION>_<KEY>` environment variables
//! override individual values (e.g. `CONNSTAT_NETWORK_NODES=500`).

use crate::geometry::Dimensions;
use crate::kernel::{KernelName, KernelParams};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "CONNSTAT_";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CONNSTAT_CONFIG";

// ============================================================================
// ConfigManager trait
// ============================================================================

/// Common behaviour of TOML-backed configuration types.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name, used for the config directory and messages.
    fn project_name() -> &'static str;

    /// Default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::project_name()).join("config.toml"))
    }

    /// Resolves the config file path from an explicit path, the
    /// environment, or the platform default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Loads the configuration, applying environment overrides.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let mut value = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                toml::from_str::<toml::Value>(&content)?
            }
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => toml::Value::try_from(Self::default()).map_err(|e| Error::config(e.to_string()))?,
        };
        apply_env_overrides(&mut value, std::env::vars())?;
        Ok(value.try_into()?)
    }

    /// Serialises the configuration as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flattens the configuration into `CONNSTAT_*` environment variables.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&value, ENV_PREFIX.trim_end_matches('_'), &mut vars);
        Ok(vars)
    }
}

fn flatten_env(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, v) in table {
                let name = format!("{prefix}_{}", key.to_ascii_uppercase());
                flatten_env(v, &name, out);
            }
        }
        other => out.push((prefix.to_string(), format_toml_value(other))),
    }
}

/// Applies `CONNSTAT_<SECTION>_<KEY>` overrides from `vars` to `root`.
pub fn apply_env_overrides<I>(root: &mut toml::Value, vars: I) -> Result<()>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, raw) in vars {
        let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        if name == CONFIG_ENV_VAR {
            continue;
        }
        let lower = rest.to_ascii_lowercase();
        let Some((section, key)) = lower.split_once('_') else {
            continue;
        };
        let dotted = match key.strip_prefix("kernel_params_") {
            Some(param) => format!("{section}.kernel_params.{param}"),
            None => format!("{section}.{key}"),
        };
        tracing::debug!(var = %name, key = %dotted, "applying environment override");
        set_nested_value(root, &dotted, parse_value(&raw))?;
    }
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Set a value at a dotted key path, creating intermediate tables as needed.
pub fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(Error::config("Empty key path"));
    };
    if last.is_empty() {
        return Err(Error::config("Empty key path"));
    }

    let mut current = root;
    for part in parents {
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config("Cannot navigate into a non-table value"))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| Error::config("Cannot set key on a non-table value"))?;
    table.insert(last.to_string(), value);
    Ok(())
}

/// Parse a string value into a TOML value, auto-detecting the type.
///
/// Priority: bool → integer → float → string.
pub fn parse_value(s: &str) -> toml::Value {
    if s == "true" {
        return toml::Value::Boolean(true);
    }
    if s == "false" {
        return toml::Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(s.to_string())
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// connstat configuration
// ============================================================================

/// Connection algorithm under test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Layer/mask/kernel connection in the style of a topology module.
    #[default]
    Layer,
    /// Connection-set algebra.
    Csa,
}

impl BackendKind {
    /// Lower-case backend name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::Csa => "csa",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "layer" | "nest" | "topology" => Ok(Self::Layer),
            "csa" => Ok(Self::Csa),
            other => Err(Error::invalid_parameter(
                "backend",
                format!("unknown backend '{other}', expected layer or csa"),
            )),
        }
    }
}

/// Network under test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Side length `L` of the square or cube.
    pub side_length: f64,
    /// Number of target nodes `N`.
    pub nodes: usize,
    /// 2 or 3.
    pub dimensions: Dimensions,
    /// Connection backend.
    pub backend: BackendKind,
    /// Kernel family.
    pub kernel: KernelName,
    /// Kernel parameter overrides.
    pub kernel_params: KernelParams,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            side_length: 1.0,
            nodes: 10_000,
            dimensions: Dimensions::Two,
            backend: BackendKind::Layer,
            kernel: KernelName::Gaussian,
            kernel_params: KernelParams::new(),
        }
    }
}

/// Test execution settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// PRNG seed; a random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Replace the backend's connections with an ideal Bernoulli draw.
    pub control: bool,
    /// Number of runs in a two-level test.
    pub runs: usize,
    /// Histogram bins for PDF export.
    pub bins: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            seed: None,
            control: false,
            runs: 100,
            bins: 100,
        }
    }
}

/// Top-level connstat configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnstatConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Test settings.
    pub test: TestConfig,
}

impl ConfigManager for ConnstatConfig {
    fn project_name() -> &'static str {
        "connstat"
    }
}

impl ConnstatConfig {
    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let n = &self.network;
        if !n.side_length.is_finite() || n.side_length <= 0.0 {
            return Err(Error::invalid_parameter(
                "network.side_length",
                "must be positive and finite",
            ));
        }
        if n.nodes == 0 {
            return Err(Error::invalid_parameter("network.nodes", "must be at least 1"));
        }
        if self.test.runs == 0 {
            return Err(Error::invalid_parameter("test.runs", "must be at least 1"));
        }
        if self.test.bins == 0 {
            return Err(Error::invalid_parameter("test.bins", "must be at least 1"));
        }
        Ok(())
    }
}

//! Configuration – reads/writes `raptor.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! `RAPTOR_*` environment variables override whatever the file says.

use std::fs;
use std::path::Path;

use raptor_middleware::BridgeDescriptor;
use raptor_sensor::SensorTopics;
use raptor_types::RaptorError;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Choices
// ────────────────────────────────────────────────────────────────────────────

/// Which wire schema family the sensor speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    #[default]
    RaceControl,
    Mockup,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaKind::RaceControl => write!(f, "race_control"),
            SchemaKind::Mockup => write!(f, "mockup"),
        }
    }
}

impl std::str::FromStr for SchemaKind {
    type Err = RaptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "race_control" => Ok(SchemaKind::RaceControl),
            "mockup" => Ok(SchemaKind::Mockup),
            other => Err(RaptorError::Config(format!("unknown schema '{other}'"))),
        }
    }
}

/// Which simulated backend the CLI binds the sensor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendChoice {
    #[default]
    VehicleDynamics,
    Alternate,
    None,
}

// ────────────────────────────────────────────────────────────────────────────
// Config sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub schema: SchemaKind,

    #[serde(default = "default_command_topic")]
    pub command_topic: String,

    /// Ignored by the mockup schema.
    #[serde(default = "default_status_topic")]
    pub status_topic: Option<String>,
}

impl SensorConfig {
    pub fn topics(&self) -> SensorTopics {
        SensorTopics::new(self.command_topic.clone(), self.status_topic.clone())
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            schema: SchemaKind::default(),
            command_topic: default_command_topic(),
            status_topic: default_status_topic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_name")]
    pub name: Option<String>,

    #[serde(default = "default_bridge_kind")]
    pub kind: Option<String>,
}

impl BridgeConfig {
    pub fn descriptor(&self) -> BridgeDescriptor {
        BridgeDescriptor::new(self.name.as_deref(), self.kind.as_deref())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: default_bridge_name(),
            kind: default_bridge_kind(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleConfig {
    #[serde(default)]
    pub backend: BackendChoice,
}

/// Contents of `raptor.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub vehicle: VehicleConfig,
}

// ────────────────────────────────────────────────────────────────────────────
// Defaults
// ────────────────────────────────────────────────────────────────────────────

fn default_command_topic() -> String {
    "/raptor/vehicle_command".to_string()
}
fn default_status_topic() -> Option<String> {
    Some("/raptor/vehicle_status".to_string())
}
fn default_bridge_name() -> Option<String> {
    Some("ROS".to_string())
}
fn default_bridge_kind() -> Option<String> {
    Some("ROS2".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Load / save
// ────────────────────────────────────────────────────────────────────────────

/// Load the config from `path`, falling back to defaults when the file does
/// not exist, then apply environment overrides.
pub fn load_from(path: &Path) -> Result<Config, RaptorError> {
    let mut cfg = if path.exists() {
        let raw = fs::read_to_string(path).map_err(|e| {
            RaptorError::Config(format!("failed to read config at {}: {e}", path.display()))
        })?;
        toml::from_str(&raw)
            .map_err(|e| RaptorError::Config(format!("failed to parse {}: {e}", path.display())))?
    } else {
        Config::default()
    };
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

/// Apply `RAPTOR_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `RAPTOR_SCHEMA` | `sensor.schema` |
/// | `RAPTOR_COMMAND_TOPIC` | `sensor.command_topic` |
/// | `RAPTOR_STATUS_TOPIC` | `sensor.status_topic` |
/// | `RAPTOR_BRIDGE_KIND` | `bridge.kind` |
pub fn apply_env_overrides(cfg: &mut Config) -> Result<(), RaptorError> {
    apply_overrides(cfg, |key| std::env::var(key).ok())
}

/// Override logic with the variable lookup injected, so tests need not touch
/// the process environment.
pub(crate) fn apply_overrides(
    cfg: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), RaptorError> {
    if let Some(v) = lookup("RAPTOR_SCHEMA") {
        cfg.sensor.schema = v.parse()?;
    }
    if let Some(v) = lookup("RAPTOR_COMMAND_TOPIC") {
        cfg.sensor.command_topic = v;
    }
    if let Some(v) = lookup("RAPTOR_STATUS_TOPIC") {
        cfg.sensor.status_topic = Some(v);
    }
    if let Some(v) = lookup("RAPTOR_BRIDGE_KIND") {
        cfg.bridge.kind = Some(v);
    }
    Ok(())
}

/// Write `cfg` to `path`, creating parent directories as needed.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), RaptorError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| RaptorError::Config(format!("failed to serialize config: {e}")))?;
    fs::write(path, raw)?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

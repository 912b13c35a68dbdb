//! Compiler configuration (`waygraph.toml`).
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.
//!
//! ```toml
//! [world]
//! game = "Little Witch Nobeta"
//! prefix = "lwn"
//! class_prefix = "LWN"
//! base_id = 345600000
//!
//! [ids]
//! null_id_locations = ["Victory"]
//!
//! [settings]
//! shortcut_gates = "vanilla"
//! barriers = "randomized"
//! lore_checks = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub world: WorldConfig,
    pub ids: IdConfig,
    pub settings: Settings,
}

impl CompilerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Naming used in the generated host modules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Display name of the game, set on the generated region class.
    pub game: String,
    /// Prefix for module-level tables, e.g. `lwn_locations`.
    pub prefix: String,
    /// Prefix for class names, e.g. `LWNRegion` and `LWNWorld`.
    pub class_prefix: String,
    /// Offset added to every location index.
    pub base_id: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            game: "Little Witch Nobeta".to_string(),
            prefix: "lwn".to_string(),
            class_prefix: "LWN".to_string(),
            base_id: 345_600_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdConfig {
    /// Locations that never get a numeric id, in addition to the `Event` group.
    pub null_id_locations: Vec<String>,
}

/// How a class of optional checks behaves in a generated world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateBehavior {
    /// Gates stay where the base game puts them; no checks.
    Vanilla,
    /// Opening a gate is a check.
    #[default]
    Randomized,
    /// Gates start open; no checks.
    Open,
}

/// Feature toggles supplied by the host when a world is generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub shortcut_gates: GateBehavior,
    pub barriers: GateBehavior,
    pub lore_checks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shortcut_gates: GateBehavior::Randomized,
            barriers: GateBehavior::Randomized,
            lore_checks: true,
        }
    }
}

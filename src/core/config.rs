//! Simulation configuration
//!
//! Bundles the balance values of every pool. Loaded from RON so designers can
//! tune respawn timers and ranges without recompiling; anything omitted from
//! the file falls back to the client defaults.
//!
//! ```ron
//! (
//!     drops: (lifetime_ms: 60000, seed: Some(7)),
//!     mobs: (respawn_enabled: false),
//! )
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::drops::DropPoolConfig;
use crate::mobs::MobPoolConfig;
use crate::portals::PortalPoolConfig;
use crate::reactors::ReactorPoolConfig;

/// Error raised while loading a [`SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(std::io::Error),
    /// The file is not valid RON for this schema
    Parse(ron::error::SpannedError),
    /// The config could not be written back as RON
    Serialize(ron::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Parse(err)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(err: ron::Error) -> Self {
        Self::Serialize(err)
    }
}

/// Configuration for all four pools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Drop pool balance values
    pub drops: DropPoolConfig,
    /// Mob pool balance values
    pub mobs: MobPoolConfig,
    /// Portal pool ranges and fade timing
    pub portals: PortalPoolConfig,
    /// Reactor pool timing
    pub reactors: ReactorPoolConfig,
}

impl SimConfig {
    /// Parse a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config = ron::from_str(text)?;
        Ok(config)
    }

    /// Read and parse a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        Ok(text)
    }

    /// Replace the drop configuration
    #[must_use]
    pub fn with_drops(mut self, drops: DropPoolConfig) -> Self {
        self.drops = drops;
        self
    }

    /// Replace the mob configuration
    #[must_use]
    pub fn with_mobs(mut self, mobs: MobPoolConfig) -> Self {
        self.mobs = mobs;
        self
    }

    /// Replace the portal configuration
    #[must_use]
    pub fn with_portals(mut self, portals: PortalPoolConfig) -> Self {
        self.portals = portals;
        self
    }

    /// Replace the reactor configuration
    #[must_use]
    pub fn with_reactors(mut self, reactors: ReactorPoolConfig) -> Self {
        self.reactors = reactors;
        self
    }
}

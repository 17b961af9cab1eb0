//! Node configuration, loaded from JSON.
//!
//! Every field has a default, so an empty object `{}` describes a five
//! output node with two universes per output.

use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::node::NodeIdentity;
use crate::routing::{MapError, UniverseMap};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid MAC address {0:?}: expected six hex octets separated by ':'")]
    InvalidMac(String),
    #[error("render.update_hz must be a finite rate greater than zero")]
    ZeroUpdateRate,
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub node: NodeSection,
    pub universes: UniverseSection,
    pub render: RenderSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSection {
    /// Truncated to 17 bytes on the wire.
    pub short_name: String,
    /// Truncated to 63 bytes on the wire.
    pub long_name: String,
    /// Advertised until the transport learns the real local address.
    pub ip: Ipv4Addr,
    /// `aa:bb:cc:dd:ee:ff`.
    pub mac: String,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            short_name: "Light Node".to_string(),
            long_name: "Desorb Light Node".to_string(),
            ip: Ipv4Addr::new(192, 168, 1, 116),
            mac: "04:e9:e5:00:00:02".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniverseSection {
    pub start_universe: u16,
    pub universes_per_output: u16,
    pub number_of_outputs: u16,
    pub pixels_per_output: usize,
}

impl Default for UniverseSection {
    fn default() -> Self {
        Self {
            start_universe: 0,
            universes_per_output: 2,
            number_of_outputs: 5,
            pixels_per_output: 340,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    pub update_hz: f64,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self { update_hz: 60.0 }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            outputs = config.universes.number_of_outputs,
            start_universe = config.universes.start_universe,
            "loaded node config"
        );
        Ok(config)
    }

    /// Parses and validates.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.universe_map()?;
        parse_mac(&self.node.mac)?;
        let hz = self.render.update_hz;
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::ZeroUpdateRate);
        }
        Ok(())
    }

    pub fn universe_map(&self) -> Result<UniverseMap, ConfigError> {
        let u = &self.universes;
        Ok(UniverseMap::new(
            u.start_universe,
            u.universes_per_output,
            u.number_of_outputs,
            u.pixels_per_output,
        )?)
    }

    pub fn identity(&self) -> Result<NodeIdentity, ConfigError> {
        let map = self.universe_map()?;
        let mac = parse_mac(&self.node.mac)?;
        Ok(NodeIdentity::new(
            self.node.short_name.clone(),
            self.node.long_name.clone(),
            self.node.ip,
            mac,
            &map,
        ))
    }
}

pub fn parse_mac(text: &str) -> Result<[u8; 6], ConfigError> {
    let invalid = || ConfigError::InvalidMac(text.to_string());
    let mut mac = [0u8; 6];
    let mut parts = text.split(':');
    for octet in &mut mac {
        let part = parts.next().ok_or_else(invalid)?;
        if part.len() != 2 {
            return Err(invalid());
        }
        *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(mac)
}

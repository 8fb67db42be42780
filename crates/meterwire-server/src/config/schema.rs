use std::net::SocketAddr;

use serde::Deserialize;
use meterwire_core::error::{MeterwireError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MeterwireError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_entity_bytes")]
    pub max_entity_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_entity_bytes: default_max_entity_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            MeterwireError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })?;
        if !(1..=64 * 1024 * 1024).contains(&self.max_entity_bytes) {
            return Err(MeterwireError::BadRequest(
                "server.max_entity_bytes must be between 1 and 67108864".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_entity_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Name of the shared registry resource metrics are bound into.
    #[serde(default = "default_registry")]
    pub registry: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.registry.trim().is_empty() {
            return Err(MeterwireError::BadRequest("metrics.registry must not be empty".into()));
        }
        Ok(())
    }
}

fn default_registry() -> String {
    "meterwire".into()
}

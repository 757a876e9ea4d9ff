use crate::store::{ProfileStore, WriteDurability, PROFILE_PATH};
use crate::tools::read_json;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH: &str = "data/config.json";
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listener: String,
    pub profile: String,
    pub durable_writes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listener: format!("0.0.0.0:{}", DEFAULT_PORT),
            profile: PROFILE_PATH.to_string(),
            durable_writes: false,
        }
    }
}

impl ServerConfig {
    /// Defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_json = read_json(path)?;
        let config: ServerConfig = serde_json::from_value(config_json)
            .map_err(|e| anyhow!("Unable to parse {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Applies the optional port argument given on the command line.
    pub fn apply_args(mut self, mut args: impl Iterator<Item = String>) -> Result<Self, anyhow::Error> {
        if let Some(raw) = args.next() {
            let port: u16 = raw
                .parse()
                .map_err(|_| anyhow!("invalid port: {:?}", raw))?;
            self.listener = match self.listener.rsplit_once(':') {
                Some((host, _)) => format!("{}:{}", host, port),
                None => format!("{}:{}", self.listener, port),
            };
        }
        if let Some(extra) = args.next() {
            return Err(anyhow!("unexpected argument: {:?}", extra));
        }
        Ok(self)
    }

    pub fn store(&self) -> ProfileStore {
        let durability = if self.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::Fast
        };
        ProfileStore::with_durability(&self.profile, durability)
    }
}

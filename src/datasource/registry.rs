//! Asset registry: symbol to decimal precision and chain-level identifier.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub symbol: String,
    pub decimals: u32,
    pub coin_type: String,
}

impl AssetInfo {
    pub fn new(symbol: &str, decimals: u32, coin_type: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            decimals,
            coin_type: coin_type.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read asset registry {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid asset registry {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Case-insensitive symbol lookup.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: HashMap<String, AssetInfo>,
}

impl AssetRegistry {
    pub fn empty() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Registry seeded with the native coin and the canonical stablecoin.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.insert(AssetInfo::new("SUI", 9, "0x2::sui::SUI"));
        registry.insert(AssetInfo::new(
            "USDC",
            6,
            "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC",
        ));
        registry
    }

    /// Defaults overlaid with the JSON array of assets at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path_str = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| RegistryError::Io {
            path: path_str.clone(),
            source,
        })?;
        let assets: Vec<AssetInfo> =
            serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
                path: path_str,
                source,
            })?;

        let mut registry = Self::with_defaults();
        for asset in assets {
            registry.insert(asset);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, asset: AssetInfo) {
        self.assets.insert(asset.symbol.to_uppercase(), asset);
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetInfo> {
        self.assets.get(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

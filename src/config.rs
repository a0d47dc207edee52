use crate::datasource::AssetRegistry;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub read_gateway_url: String,
    pub inspect_sender: String,
    pub asset_registry_file: Option<String>,
    pub cycle_policy: CyclePolicy,
}

/// What to do with executable nodes that sit on or behind a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Sequence everything else and report the withheld nodes.
    #[default]
    Truncate,
    /// Refuse to simulate the graph.
    Reject,
}

impl CyclePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePolicy::Truncate => "truncate",
            CyclePolicy::Reject => "reject",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let read_gateway_url = env_map
            .get("READ_GATEWAY_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("READ_GATEWAY_URL".to_string()))?;

        let inspect_sender = env_map
            .get("INSPECT_SENDER")
            .cloned()
            .unwrap_or_else(|| "0x0".to_string());
        if !inspect_sender.starts_with("0x") {
            return Err(ConfigError::InvalidValue(
                "INSPECT_SENDER".to_string(),
                "must be a 0x-prefixed address".to_string(),
            ));
        }

        let asset_registry_file = env_map
            .get("ASSET_REGISTRY_FILE")
            .filter(|s| !s.trim().is_empty())
            .cloned();

        let cycle_policy = match env_map
            .get("CYCLE_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("truncate")
        {
            "truncate" => CyclePolicy::Truncate,
            "reject" => CyclePolicy::Reject,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CYCLE_POLICY".to_string(),
                    format!("must be truncate or reject, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            read_gateway_url,
            inspect_sender,
            asset_registry_file,
            cycle_policy,
        })
    }

    /// Built-in assets, overlaid with `ASSET_REGISTRY_FILE` when set.
    pub fn load_asset_registry(&self) -> Result<AssetRegistry, ConfigError> {
        match &self.asset_registry_file {
            Some(path) => AssetRegistry::load(path).map_err(|e| {
                ConfigError::InvalidValue("ASSET_REGISTRY_FILE".to_string(), e.to_string())
            }),
            None => Ok(AssetRegistry::with_defaults()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(
            "READ_GATEWAY_URL".to_string(),
            "http://127.0.0.1:9000".to_string(),
        );
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.inspect_sender, "0x0");
        assert_eq!(config.cycle_policy, CyclePolicy::Truncate);
        assert!(config.asset_registry_file.is_none());
    }

    #[test]
    fn test_missing_read_gateway_url() {
        let mut env_map = setup_required_env();
        env_map.remove("READ_GATEWAY_URL");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "READ_GATEWAY_URL"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_inspect_sender() {
        let mut env_map = setup_required_env();
        env_map.insert("INSPECT_SENDER".to_string(), "alice".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "INSPECT_SENDER"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_cycle_policy_reject() {
        let mut env_map = setup_required_env();
        env_map.insert("CYCLE_POLICY".to_string(), "reject".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.cycle_policy, CyclePolicy::Reject);
    }

    #[test]
    fn test_invalid_cycle_policy() {
        let mut env_map = setup_required_env();
        env_map.insert("CYCLE_POLICY".to_string(), "ignore".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "CYCLE_POLICY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_asset_registry_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"symbol": "DEEP", "decimals": 6, "coinType": "0xdeep::deep::DEEP"}}]"#
        )
        .unwrap();

        let mut env_map = setup_required_env();
        env_map.insert(
            "ASSET_REGISTRY_FILE".to_string(),
            file.path().to_string_lossy().to_string(),
        );
        let config = Config::from_env_map(env_map).unwrap();
        let registry = config.load_asset_registry().unwrap();
        assert_eq!(registry.get("deep").unwrap().decimals, 6);
    }

    #[test]
    fn test_unreadable_asset_registry_file() {
        let mut env_map = setup_required_env();
        env_map.insert(
            "ASSET_REGISTRY_FILE".to_string(),
            "/nonexistent/assets.json".to_string(),
        );
        let config = Config::from_env_map(env_map).unwrap();
        match config.load_asset_registry() {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "ASSET_REGISTRY_FILE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}

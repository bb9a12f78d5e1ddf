use serde::{Deserialize, Serialize};
use std::fs;

use crate::fee::FeePolicy;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub rail: RailConfig,
    #[serde(default)]
    pub fees: FeePolicy,
    /// Bearer token -> account id, provisioned at startup
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RailConfig {
    /// Use the in-process mock rail instead of a live gateway
    pub mock: bool,
    pub base_url: String,
    pub secret_key: String,
    pub timeout_secs: u64,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            mock: true,
            base_url: "https://api.paystack.co".to_string(),
            secret_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccountConfig {
    pub account_id: String,
    pub token: String,
    pub email: String,
}

impl AppConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", config_path, e))?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
log_level: info
log_dir: ./logs
log_file: wallet.log
use_json: false
rotation: daily
gateway:
  host: 127.0.0.1
  port: 8080
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert!(config.rail.mock);
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn test_parse_accounts_and_fees() {
        let yaml = r#"
log_level: info
log_dir: ./logs
log_file: wallet.log
use_json: false
rotation: never
gateway:
  host: 0.0.0.0
  port: 9000
rail:
  mock: false
  base_url: https://api.paystack.co
  secret_key: sk_test_xyz
  timeout_secs: 15
fees:
  external_fee: 5000
  transfer_ceiling: 50000000
  funding_ceiling: 100000000
accounts:
  - account_id: alice
    token: tok_alice
    email: alice@example.com
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.rail.mock);
        assert_eq!(config.fees.external_fee, 5_000);
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].token, "tok_alice");
    }
}

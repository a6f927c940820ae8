//! Ledger configuration and token metadata
//!
//! Metadata is display-only: nothing in the accounting core reads the
//! decimals, since BASE is fixed. Every field has a default so a partial
//! JSON file is enough.

use elastic_core::{AccountId, Amount, BASE};
use serde::{Deserialize, Serialize};

/// Display metadata for the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new(default_name(), default_symbol(), default_decimals())
    }
}

/// Construction parameters for a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Token display name
    #[serde(default = "default_name")]
    pub name: String,

    /// Token ticker
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Display precision (metadata only)
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// External supply minted to the admin at construction
    #[serde(default = "default_initial_supply")]
    pub initial_supply: Amount,

    /// Deploying principal: sole initial holder and initial admin
    #[serde(default = "default_admin")]
    pub admin: AccountId,
}

// Default value functions for serde
fn default_name() -> String {
    "Elastic".to_string()
}

fn default_symbol() -> String {
    "ELX".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_initial_supply() -> Amount {
    Amount::new(1_000_000 * u128::from(BASE))
}

fn default_admin() -> AccountId {
    AccountId::new_unchecked("ADMIN")
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
            admin: default_admin(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Display metadata portion of the config
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.name, "Elastic");
        assert_eq!(config.symbol, "ELX");
        assert_eq!(config.decimals, 18);
        assert_eq!(config.initial_supply.value(), 1_000_000 * u128::from(BASE));
        assert_eq!(config.admin.as_str(), "ADMIN");
    }

    #[test]
    fn test_config_partial_json() {
        // Missing fields fall back to defaults
        let json = r#"{ "symbol": "rbt", "initial_supply": "5000", "admin": "treasury" }"#;
        let config: LedgerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.symbol, "rbt");
        assert_eq!(config.initial_supply, Amount::new(5000));
        assert_eq!(config.admin.as_str(), "TREASURY");
        assert_eq!(config.name, "Elastic"); // default
    }

    #[test]
    fn test_config_rejects_null_admin_string() {
        let json = r#"{ "admin": "" }"#;
        let result: Result<LedgerConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "Rebase Token", "decimals": 9 }}"#).unwrap();

        let config = LedgerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.name, "Rebase Token");
        assert_eq!(config.decimals, 9);
        assert_eq!(config.metadata().symbol, "ELX");
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = LedgerConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}

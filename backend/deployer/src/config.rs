//! Network configuration, loaded from `.env` and the process environment.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_WASM_PATH: &str = "target/wasm32-unknown-unknown/release/charity_fund.wasm";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("network `{0}` has no preset; set STELLAR_RPC_URL and STELLAR_NETWORK_PASSPHRASE")]
    UnknownNetwork(String),
    #[error("network `{0}` has no public RPC endpoint; set STELLAR_RPC_URL")]
    MissingRpcUrl(String),
    #[error("STELLAR_SOURCE_ACCOUNT is not set")]
    MissingSourceAccount,
}

/// Well-known networks: name, default RPC endpoint, passphrase.
const PRESETS: &[(&str, Option<&str>, &str)] = &[
    (
        "testnet",
        Some("https://soroban-testnet.stellar.org"),
        "Test SDF Network ; September 2015",
    ),
    (
        "futurenet",
        Some("https://rpc-futurenet.stellar.org"),
        "Test SDF Future Network ; October 2022",
    ),
    (
        "mainnet",
        None,
        "Public Global Stellar Network ; September 2015",
    ),
    (
        "local",
        Some("http://localhost:8000/rpc"),
        "Standalone Network ; February 2017",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: String,
    pub rpc_url: String,
    pub passphrase: String,
    pub source_account: Option<String>,
    pub wasm_path: PathBuf,
    pub cli: String,
}

impl NetworkConfig {
    /// Load from the environment, reading `.env` first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = lookup("STELLAR_NETWORK").unwrap_or_else(|| "testnet".to_string());
        let preset = PRESETS.iter().find(|(name, _, _)| *name == network);

        let rpc_override = lookup("STELLAR_RPC_URL");
        let passphrase_override = lookup("STELLAR_NETWORK_PASSPHRASE");

        let (rpc_url, passphrase) = match preset {
            Some((_, default_rpc, default_passphrase)) => {
                let rpc_url = rpc_override
                    .or_else(|| default_rpc.map(str::to_string))
                    .ok_or_else(|| ConfigError::MissingRpcUrl(network.clone()))?;
                let passphrase =
                    passphrase_override.unwrap_or_else(|| default_passphrase.to_string());
                (rpc_url, passphrase)
            }
            None => match (rpc_override, passphrase_override) {
                (Some(rpc_url), Some(passphrase)) => (rpc_url, passphrase),
                _ => return Err(ConfigError::UnknownNetwork(network)),
            },
        };

        Ok(NetworkConfig {
            network,
            rpc_url,
            passphrase,
            source_account: lookup("STELLAR_SOURCE_ACCOUNT"),
            wasm_path: lookup("CHARITY_FUND_WASM")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WASM_PATH)),
            cli: lookup("STELLAR_CLI").unwrap_or_else(|| "stellar".to_string()),
        })
    }

    /// The identity that signs transactions. Required for anything that
    /// touches the network.
    pub fn source_account(&self) -> Result<&str, ConfigError> {
        self.source_account
            .as_deref()
            .ok_or(ConfigError::MissingSourceAccount)
    }
}

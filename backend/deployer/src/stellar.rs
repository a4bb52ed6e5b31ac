//! Thin wrapper around the `stellar` CLI: builds argument vectors, runs
//! them through a [`CommandRunner`] and parses what comes back.

use std::process::Command;

use serde::Serialize;
use stellar_strkey::Strkey;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, NetworkConfig};
use crate::params::DeployParams;

#[derive(Debug, Error)]
pub enum StellarError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program} {subcommand}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        subcommand: String,
        status: String,
        stderr: String,
    },
    #[error("could not find a contract id in the deploy output")]
    MissingContractId,
    #[error("could not parse the output of `{function}`: {output}")]
    UnexpectedOutput { function: String, output: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, StellarError>;
}

/// Runs commands as child processes.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, StellarError> {
        debug!(program, ?args, "running");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| StellarError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(StellarError::CommandFailed {
                program: program.to_string(),
                subcommand: args.iter().take(2).cloned().collect::<Vec<_>>().join(" "),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}

/// What a successful `deploy` produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRecord {
    pub network: String,
    pub contract_id: String,
    pub deploy_tx_hash: Option<String>,
    pub init_tx_hash: Option<String>,
    #[serde(flatten)]
    pub params: DeployParams,
}

/// Read-only view of a deployed fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundSnapshot {
    pub contract_id: String,
    pub owner: String,
    pub token: String,
    pub fund_cause: String,
    pub timeframe: u64,
    pub target_amount: String,
    pub total_raised: String,
    pub remaining_amount: String,
    pub is_closed: bool,
    pub is_withdrawn: bool,
    pub is_refundable: bool,
}

pub struct StellarCli<'a, R> {
    config: &'a NetworkConfig,
    runner: R,
}

impl<'a, R: CommandRunner> StellarCli<'a, R> {
    pub fn new(config: &'a NetworkConfig, runner: R) -> Self {
        StellarCli { config, runner }
    }

    fn network_args(&self, source: &str) -> Vec<String> {
        vec![
            "--source".to_string(),
            source.to_string(),
            "--rpc-url".to_string(),
            self.config.rpc_url.clone(),
            "--network-passphrase".to_string(),
            self.config.passphrase.clone(),
        ]
    }

    pub fn deploy_args(&self, source: &str) -> Vec<String> {
        let mut args = vec![
            "contract".to_string(),
            "deploy".to_string(),
            "--wasm".to_string(),
            self.config.wasm_path.display().to_string(),
        ];
        args.extend(self.network_args(source));
        args
    }

    pub fn invoke_args(&self, contract_id: &str, source: &str, function: &str) -> Vec<String> {
        let mut args = vec![
            "contract".to_string(),
            "invoke".to_string(),
            "--id".to_string(),
            contract_id.to_string(),
        ];
        args.extend(self.network_args(source));
        args.push("--".to_string());
        args.push(function.to_string());
        args
    }

    pub fn init_args(&self, contract_id: &str, source: &str, params: &DeployParams) -> Vec<String> {
        let mut args = self.invoke_args(contract_id, source, "init");
        args.extend([
            "--owner".to_string(),
            params.owner.clone(),
            "--token".to_string(),
            params.token.clone(),
            "--target_amount".to_string(),
            params.target_amount.to_string(),
            "--cause".to_string(),
            params.cause.clone(),
            "--deadline".to_string(),
            params.timeframe.to_string(),
        ]);
        args
    }

    /// Upload, deploy and initialise a fund. The owner becomes whoever
    /// `params.owner` names; the source account must be able to sign for it.
    pub fn deploy(&self, params: &DeployParams) -> Result<DeploymentRecord, StellarError> {
        let source = self.config.source_account()?;

        let output = self.runner.run(&self.config.cli, &self.deploy_args(source))?;
        let contract_id = parse_contract_id(&output.stdout)?;
        let deploy_tx_hash = parse_tx_hash(&output.stderr);
        info!(%contract_id, network = %self.config.network, "contract deployed");

        let output = self
            .runner
            .run(&self.config.cli, &self.init_args(&contract_id, source, params))?;
        let init_tx_hash = parse_tx_hash(&output.stderr);
        info!(%contract_id, owner = %params.owner, tx = ?init_tx_hash, "fund initialised");

        Ok(DeploymentRecord {
            network: self.config.network.clone(),
            contract_id,
            deploy_tx_hash,
            init_tx_hash,
            params: params.clone(),
        })
    }

    fn query(&self, contract_id: &str, function: &str) -> Result<serde_json::Value, StellarError> {
        let source = self.config.source_account()?;
        let output = self
            .runner
            .run(&self.config.cli, &self.invoke_args(contract_id, source, function))?;
        let trimmed = output.stdout.trim();
        serde_json::from_str(trimmed).map_err(|_| StellarError::UnexpectedOutput {
            function: function.to_string(),
            output: trimmed.to_string(),
        })
    }

    fn query_string(&self, contract_id: &str, function: &str) -> Result<String, StellarError> {
        match self.query(contract_id, function)? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(StellarError::UnexpectedOutput {
                function: function.to_string(),
                output: other.to_string(),
            }),
        }
    }

    fn query_bool(&self, contract_id: &str, function: &str) -> Result<bool, StellarError> {
        self.query(contract_id, function)?
            .as_bool()
            .ok_or_else(|| StellarError::UnexpectedOutput {
                function: function.to_string(),
                output: "expected a boolean".to_string(),
            })
    }

    fn query_u64(&self, contract_id: &str, function: &str) -> Result<u64, StellarError> {
        let raw = self.query_string(contract_id, function)?;
        raw.parse().map_err(|_| StellarError::UnexpectedOutput {
            function: function.to_string(),
            output: raw,
        })
    }

    /// Read every public query of a deployed fund.
    pub fn status(&self, contract_id: &str) -> Result<FundSnapshot, StellarError> {
        Ok(FundSnapshot {
            contract_id: contract_id.to_string(),
            owner: self.query_string(contract_id, "owner")?,
            token: self.query_string(contract_id, "token")?,
            fund_cause: self.query_string(contract_id, "fund_cause")?,
            timeframe: self.query_u64(contract_id, "timeframe")?,
            target_amount: self.query_string(contract_id, "target_amount")?,
            total_raised: self.query_string(contract_id, "total_raised")?,
            remaining_amount: self.query_string(contract_id, "remaining_amount")?,
            is_closed: self.query_bool(contract_id, "is_closed")?,
            is_withdrawn: self.query_bool(contract_id, "is_withdrawn")?,
            is_refundable: self.query_bool(contract_id, "is_refundable")?,
        })
    }
}

/// The deploy subcommand prints the new contract's strkey as its last line.
pub fn parse_contract_id(stdout: &str) -> Result<String, StellarError> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| matches!(Strkey::from_string(line), Ok(Strkey::Contract(_))))
        .map(str::to_string)
        .ok_or(StellarError::MissingContractId)
}

/// The CLI reports "Transaction hash is <hex>" on stderr for every
/// submitted transaction.
pub fn parse_tx_hash(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .filter(|line| line.contains("Transaction hash is"))
        .filter_map(|line| line.split_whitespace().last())
        .find(|hash| hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit()))
        .map(str::to_string)
}

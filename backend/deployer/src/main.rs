//! charity-fund-deployer: validate, deploy and inspect CharityFund contracts.
//!
//! Network settings come from the environment (see `config.rs`); fund
//! parameters come from the command line and are checked against the same
//! rules the contract enforces before anything is submitted.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod params;
mod stellar;

use config::{ConfigError, NetworkConfig};
use params::{DeployParams, RawParams};
use stellar::{ProcessRunner, StellarCli};

#[derive(Parser, Debug)]
#[command(name = "charity-fund-deployer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate parameters and print the commands `deploy` would run.
    Check(FundArgs),
    /// Deploy a new fund and initialise it.
    Deploy(FundArgs),
    /// Print the public state of a deployed fund.
    Status {
        /// Contract id (C...).
        #[arg(long)]
        id: String,
    },
}

#[derive(Args, Debug)]
struct FundArgs {
    /// Owner account (G...) that receives the funds on success.
    #[arg(long)]
    owner: String,
    /// Stellar Asset Contract (C...) donations are made in.
    #[arg(long)]
    token: String,
    /// Target amount in the token's smallest unit.
    #[arg(long)]
    target_amount: String,
    /// What the fund is raising money for.
    #[arg(long)]
    fund_cause: String,
    /// Deadline as a unix timestamp.
    #[arg(long)]
    timeframe: String,
}

impl FundArgs {
    fn validate(&self) -> Result<DeployParams> {
        let raw = RawParams {
            owner: self.owner.clone(),
            token: self.token.clone(),
            target_amount: self.target_amount.clone(),
            cause: self.fund_cause.clone(),
            timeframe: self.timeframe.clone(),
        };
        let now = u64::try_from(Utc::now().timestamp()).context("system clock is before 1970")?;
        let params = DeployParams::validate(&raw, now).context("invalid fund parameters")?;

        let deadline = i64::try_from(params.timeframe)
            .ok()
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));
        match deadline {
            Some(deadline) => info!(%deadline, target = %params.target_amount, "parameters valid"),
            None => warn!(timeframe = params.timeframe, "deadline is beyond the representable calendar"),
        }
        Ok(params)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => {
            let params = args.validate()?;
            for line in preview(&params, NetworkConfig::from_env()) {
                println!("{line}");
            }
        }
        Command::Deploy(args) => {
            let params = args.validate()?;
            let config = load_config()?;
            let stellar = StellarCli::new(&config, ProcessRunner);
            let record = stellar.deploy(&params).context("deploying CharityFund")?;
            info!(
                contract_id = %record.contract_id,
                owner = %record.params.owner,
                tx = record.init_tx_hash.as_deref().unwrap_or("unknown"),
                "The CharityFund contract is deployed"
            );
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Status { id } => {
            let config = load_config()?;
            let stellar = StellarCli::new(&config, ProcessRunner);
            let snapshot = stellar
                .status(&id)
                .with_context(|| format!("reading state of {id}"))?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

fn load_config() -> Result<NetworkConfig> {
    let config = NetworkConfig::from_env().context("loading network configuration")?;
    info!(network = %config.network, rpc = %config.rpc_url, "using network");
    Ok(config)
}

/// The commands `deploy` would run for `params`. Validation does not need a
/// network, so an incomplete configuration only drops the preview.
fn preview(params: &DeployParams, config: Result<NetworkConfig, ConfigError>) -> Vec<String> {
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "network configuration incomplete, skipping command preview");
            return Vec::new();
        }
    };
    let stellar = StellarCli::new(&config, ProcessRunner);
    let source = config.source_account.as_deref().unwrap_or("<source>");
    vec![
        format!("{} {}", config.cli, shell_join(&stellar.deploy_args(source))),
        format!(
            "{} {}",
            config.cli,
            shell_join(&stellar.init_args("<contract-id>", source, params))
        ),
    ]
}

/// Quote arguments so the printed command can be pasted into a shell.
fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            if !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./:=<>".contains(c))
            {
                arg.clone()
            } else {
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

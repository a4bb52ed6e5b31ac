//! Validation of fund construction parameters before anything is sent to
//! the network.

use std::num::IntErrorKind;

use charity_fund::MIN_TIMEFRAME;
use serde::Serialize;
use stellar_strkey::Strkey;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("target amount `{0}` is not an integer")]
    InvalidTargetAmount(String),
    #[error("target amount `{0}` exceeds the maximum of {max}", max = i128::MAX)]
    TargetAmountTooLarge(String),
    #[error("target amount must be greater than zero, got `{0}`")]
    NonPositiveTargetAmount(String),
    #[error("timeframe `{0}` is not a unix timestamp")]
    InvalidTimeframe(String),
    #[error("timeframe {timeframe} must be at least {min} seconds after now ({now})")]
    TimeframeTooSoon { timeframe: u64, now: u64, min: u64 },
    #[error("owner `{0}` is not a Stellar account address (G...)")]
    InvalidOwner(String),
    #[error("token `{0}` is not a Stellar contract address (C...)")]
    InvalidToken(String),
}

/// Parameters as typed on the command line.
#[derive(Debug, Clone)]
pub struct RawParams {
    pub owner: String,
    pub token: String,
    pub target_amount: String,
    pub cause: String,
    pub timeframe: String,
}

/// Parameters that passed validation and will be accepted by `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployParams {
    pub owner: String,
    pub token: String,
    #[serde(serialize_with = "as_string")]
    pub target_amount: i128,
    pub cause: String,
    pub timeframe: u64,
}

// i128 does not survive a round trip through most JSON readers.
fn as_string<S: serde::Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl DeployParams {
    /// Check `raw` against the same rules the contract enforces, with `now`
    /// standing in for the ledger timestamp at `init`.
    pub fn validate(raw: &RawParams, now: u64) -> Result<Self, ParamError> {
        let target_amount = parse_target_amount(&raw.target_amount)?;
        let timeframe = parse_timeframe(&raw.timeframe, now)?;

        if !matches!(Strkey::from_string(&raw.owner), Ok(Strkey::PublicKeyEd25519(_))) {
            return Err(ParamError::InvalidOwner(raw.owner.clone()));
        }
        if !matches!(Strkey::from_string(&raw.token), Ok(Strkey::Contract(_))) {
            return Err(ParamError::InvalidToken(raw.token.clone()));
        }

        Ok(DeployParams {
            owner: raw.owner.clone(),
            token: raw.token.clone(),
            target_amount,
            cause: raw.cause.clone(),
            timeframe,
        })
    }
}

fn parse_target_amount(raw: &str) -> Result<i128, ParamError> {
    let amount = raw.trim().parse::<i128>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => ParamError::TargetAmountTooLarge(raw.to_string()),
        IntErrorKind::NegOverflow => ParamError::NonPositiveTargetAmount(raw.to_string()),
        _ => ParamError::InvalidTargetAmount(raw.to_string()),
    })?;
    if amount <= 0 {
        return Err(ParamError::NonPositiveTargetAmount(raw.to_string()));
    }
    Ok(amount)
}

fn parse_timeframe(raw: &str, now: u64) -> Result<u64, ParamError> {
    let timeframe = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ParamError::InvalidTimeframe(raw.to_string()))?;
    if timeframe.saturating_sub(now) < MIN_TIMEFRAME {
        return Err(ParamError::TimeframeTooSoon {
            timeframe,
            now,
            min: MIN_TIMEFRAME,
        });
    }
    Ok(timeframe)
}

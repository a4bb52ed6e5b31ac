// contracts/charity_fund/src/storage.rs
//
// Storage helpers for CharityFund.
//
// Layout:
//   - instance   DataKey::Config              → FundConfig   (written once)
//   - instance   DataKey::State               → LedgerState  (rewritten on every mutation)
//   - persistent DataKey::Contribution(donor) → i128         (absent reads as zero)
//
// Instance entries share the contract's TTL; each contribution entry carries
// its own and is bumped whenever it is written.

use soroban_sdk::{contracttype, Address, Env};

use crate::{
    types::{FundConfig, LedgerState},
    Error,
};

/// Minimum distance between `init` and the fund's deadline: 36 hours.
pub const MIN_TIMEFRAME: u64 = 36 * 60 * 60;

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const CONTRIBUTION_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const CONTRIBUTION_LIFETIME_THRESHOLD: u32 = CONTRIBUTION_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    State,
    Contribution(Address),
}

// ─────────────────────────────────────────────────────────
// Config and state
// ─────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &FundConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/// Load the fund's config. Fails with `Error::NotInitialized` before `init`.
pub fn load_config(env: &Env) -> Result<FundConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

/// Persist the mutable state and keep the instance alive.
pub fn save_state(env: &Env, state: &LedgerState) {
    env.storage().instance().set(&DataKey::State, state);
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn load_state(env: &Env) -> Result<LedgerState, Error> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

/// Load config and state together; every entry point needs both.
pub fn load_fund(env: &Env) -> Result<(FundConfig, LedgerState), Error> {
    Ok((load_config(env)?, load_state(env)?))
}

// ─────────────────────────────────────────────────────────
// Contributions
// ─────────────────────────────────────────────────────────

/// Amount currently credited to `donor`. Zero if they never donated or
/// have already been refunded.
pub fn get_contribution(env: &Env, donor: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Contribution(donor.clone()))
        .unwrap_or(0)
}

pub fn set_contribution(env: &Env, donor: &Address, amount: i128) {
    let key = DataKey::Contribution(donor.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage().persistent().extend_ttl(
        &key,
        CONTRIBUTION_LIFETIME_THRESHOLD,
        CONTRIBUTION_BUMP_AMOUNT,
    );
}

/// Zero out `donor`'s entry and return what it held.
pub fn take_contribution(env: &Env, donor: &Address) -> i128 {
    let key = DataKey::Contribution(donor.clone());
    let amount: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    if amount != 0 {
        env.storage().persistent().remove(&key);
    }
    amount
}

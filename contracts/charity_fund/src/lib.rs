//! # Charity Fund Contract
//!
//! A single-target escrow. Donations accumulate toward `target_amount`; the
//! donation that fills the remaining room exactly closes the fund for good.
//!
//! | Phase        | Entry Point(s)                                   |
//! |--------------|--------------------------------------------------|
//! | Bootstrap    | [`CharityFund::init`]                            |
//! | Funding      | [`CharityFund::donate`]                          |
//! | Success      | [`CharityFund::withdraw`] (owner, once)          |
//! | Failure      | [`CharityFund::refund`] (any donor, after deadline) |
//! | Queries      | `remaining_amount`, `is_open`, `is_closed`, `donated_amount_from`, ... |
//!
//! Both payout paths commit every state change before calling the token
//! contract, so a re-entrant call observes the post-payout ledger.

#![no_std]

#[cfg(test)]
extern crate std;

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String};

pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod fixture;
#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use storage::MIN_TIMEFRAME;
pub use types::{FundConfig, FundStatus, LedgerState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ZeroTargetAmount = 3,
    DeadlineTooSoon = 4,
    ZeroDonationAmount = 5,
    NegativeAmount = 6,
    FundTargetExceeded = 7,
    CharityIsFinished = 8,
    NotOwner = 9,
    CharityIsNotFinished = 10,
    AlreadyWithdrawn = 11,
    RefundIsNotYetAllowed = 12,
    NothingToRefund = 13,
    Overflow = 14,
}

#[contract]
pub struct CharityFund;

#[contractimpl]
impl CharityFund {
    /// Configure the fund. Must be called exactly once, right after deployment.
    ///
    /// - `owner` must authorize the call and is the only address that can withdraw.
    /// - `token` is the SAC address donations are made in.
    /// - `target_amount` must be > 0.
    /// - `deadline` must be at least [`MIN_TIMEFRAME`] seconds after the current
    ///   ledger timestamp.
    pub fn init(
        env: Env,
        owner: Address,
        token: Address,
        target_amount: i128,
        cause: String,
        deadline: u64,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();

        if target_amount == 0 {
            return Err(Error::ZeroTargetAmount);
        }
        if target_amount < 0 {
            return Err(Error::NegativeAmount);
        }

        let now = env.ledger().timestamp();
        if deadline.saturating_sub(now) < MIN_TIMEFRAME {
            return Err(Error::DeadlineTooSoon);
        }

        let config = FundConfig {
            owner: owner.clone(),
            token: token.clone(),
            target_amount,
            cause,
            deadline,
        };
        storage::save_config(&env, &config);
        storage::save_state(&env, &LedgerState::default());

        events::emit_fund_created(&env, owner, token, target_amount, deadline);
        Ok(())
    }

    /// Donate `amount` of the fund's token.
    ///
    /// The whole amount must fit in the remaining room; a donation that would
    /// overshoot the target is rejected, never trimmed. Donations are accepted
    /// after the deadline for as long as the fund is not closed.
    pub fn donate(env: Env, donor: Address, amount: i128) -> Result<(), Error> {
        donor.require_auth();

        let (config, mut state) = storage::load_fund(&env)?;

        if config.is_closed(&state) {
            return Err(Error::CharityIsFinished);
        }
        if amount == 0 {
            return Err(Error::ZeroDonationAmount);
        }
        if amount < 0 {
            return Err(Error::NegativeAmount);
        }
        if amount > config.remaining_amount(&state) {
            return Err(Error::FundTargetExceeded);
        }

        let donated = storage::get_contribution(&env, &donor)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        state.total_raised = state
            .total_raised
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        storage::set_contribution(&env, &donor, donated);
        storage::save_state(&env, &state);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        events::emit_donation_received(&env, donor, amount, state.total_raised);
        if config.is_closed(&state) {
            events::emit_fund_closed(&env, state.total_raised);
        }
        Ok(())
    }

    /// Pay the full target amount to the owner. Only once, only after the
    /// fund has closed.
    pub fn withdraw(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();

        let (config, mut state) = storage::load_fund(&env)?;

        if caller != config.owner {
            return Err(Error::NotOwner);
        }
        if !config.is_closed(&state) {
            return Err(Error::CharityIsNotFinished);
        }
        if state.withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }

        // Flag first; the transfer is the last thing this call does.
        state.withdrawn = true;
        storage::save_state(&env, &state);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(
            &env.current_contract_address(),
            &config.owner,
            &config.target_amount,
        );

        events::emit_funds_withdrawn(&env, config.owner, config.target_amount);
        Ok(())
    }

    /// Return `caller`'s whole contribution once the deadline has passed
    /// without the fund closing.
    ///
    /// Fails with `Error::NothingToRefund` when the caller has nothing
    /// credited, which includes a second refund by the same donor.
    pub fn refund(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();

        let (config, mut state) = storage::load_fund(&env)?;

        if config.is_closed(&state) {
            return Err(Error::CharityIsFinished);
        }
        if env.ledger().timestamp() <= config.deadline {
            return Err(Error::RefundIsNotYetAllowed);
        }

        let amount = storage::take_contribution(&env, &caller);
        if amount == 0 {
            return Err(Error::NothingToRefund);
        }
        state.total_raised -= amount;
        storage::save_state(&env, &state);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &caller, &amount);

        events::emit_donation_refunded(&env, caller, amount);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Everything fixed at `init`.
    pub fn config(env: Env) -> Result<FundConfig, Error> {
        storage::load_config(&env)
    }

    /// The address paid on withdrawal.
    pub fn owner(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.owner)
    }

    /// The token donations are made in.
    pub fn token(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.token)
    }

    /// The amount that closes the fund.
    pub fn target_amount(env: Env) -> Result<i128, Error> {
        Ok(storage::load_config(&env)?.target_amount)
    }

    /// What the fund is raising money for.
    pub fn fund_cause(env: Env) -> Result<String, Error> {
        Ok(storage::load_config(&env)?.cause)
    }

    /// The deadline, as a ledger timestamp.
    pub fn timeframe(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.deadline)
    }

    /// Sum of all contributions that have not been refunded.
    pub fn total_raised(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.total_raised)
    }

    /// How much more the fund accepts before it closes.
    pub fn remaining_amount(env: Env) -> Result<i128, Error> {
        let (config, state) = storage::load_fund(&env)?;
        Ok(config.remaining_amount(&state))
    }

    /// True until the target has been reached.
    pub fn is_open(env: Env) -> Result<bool, Error> {
        let (config, state) = storage::load_fund(&env)?;
        Ok(!config.is_closed(&state))
    }

    /// True once the target has been reached. Never reverts.
    pub fn is_closed(env: Env) -> Result<bool, Error> {
        let (config, state) = storage::load_fund(&env)?;
        Ok(config.is_closed(&state))
    }

    /// Whether the owner has already been paid.
    pub fn is_withdrawn(env: Env) -> Result<bool, Error> {
        Ok(storage::load_state(&env)?.withdrawn)
    }

    /// Whether `refund` would currently accept a caller with a non-zero
    /// contribution.
    pub fn is_refundable(env: Env) -> Result<bool, Error> {
        let (config, state) = storage::load_fund(&env)?;
        Ok(config.is_refundable(&state, env.ledger().timestamp()))
    }

    /// Lifecycle phase at the current ledger timestamp.
    pub fn status(env: Env) -> Result<FundStatus, Error> {
        let (config, state) = storage::load_fund(&env)?;
        Ok(config.status(&state, env.ledger().timestamp()))
    }

    /// `donor`'s current contribution; zero for unknown addresses and after
    /// a refund.
    pub fn donated_amount_from(env: Env, donor: Address) -> Result<i128, Error> {
        storage::load_config(&env)?;
        Ok(storage::get_contribution(&env, &donor))
    }
}

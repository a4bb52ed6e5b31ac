// contracts/charity_fund/src/types.rs
//
// The fund is split into an immutable config entry, written once by `init`,
// and a small mutable state entry that every donate/withdraw/refund rewrites.
// Per-donor amounts live in their own persistent entries (see storage.rs), so
// neither struct grows with the number of donors.

use soroban_sdk::{contracttype, Address, String};

/// Parameters fixed at construction.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundConfig {
    /// Receives the full target amount once the fund closes.
    pub owner: Address,
    /// SAC token the fund is denominated in.
    pub token: Address,
    /// Amount that closes the fund, in the token's smallest unit.
    pub target_amount: i128,
    /// Free text describing what the money is for. Returned verbatim.
    pub cause: String,
    /// Ledger timestamp after which donors may reclaim their money.
    pub deadline: u64,
}

/// Mutable bookkeeping.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LedgerState {
    /// Sum of all outstanding contributions. Never exceeds `target_amount`.
    pub total_raised: i128,
    /// Set once, before the owner is paid.
    pub withdrawn: bool,
}

/// Lifecycle view derived from config, state and the current ledger time.
/// Never stored.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FundStatus {
    /// Accepting donations; deadline not yet passed.
    Open,
    /// Deadline passed without reaching the target; donors may refund.
    Refundable,
    /// Target reached; waiting for the owner to withdraw.
    Closed,
    /// Target reached and paid out to the owner.
    Drained,
}

impl FundConfig {
    /// Target reached. Permanent: nothing can lower `total_raised` once closed.
    pub fn is_closed(&self, state: &LedgerState) -> bool {
        state.total_raised == self.target_amount
    }

    pub fn remaining_amount(&self, state: &LedgerState) -> i128 {
        self.target_amount - state.total_raised
    }

    /// The target check always dominates the deadline check.
    pub fn is_refundable(&self, state: &LedgerState, now: u64) -> bool {
        !self.is_closed(state) && now > self.deadline
    }

    pub fn status(&self, state: &LedgerState, now: u64) -> FundStatus {
        if state.withdrawn {
            FundStatus::Drained
        } else if self.is_closed(state) {
            FundStatus::Closed
        } else if now > self.deadline {
            FundStatus::Refundable
        } else {
            FundStatus::Open
        }
    }
}

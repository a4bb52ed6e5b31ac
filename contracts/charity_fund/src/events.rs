use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundCreated {
    pub owner: Address,
    pub token: Address,
    pub target_amount: i128,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub amount: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundClosed {
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationRefunded {
    pub donor: Address,
    pub amount: i128,
}

pub fn emit_fund_created(
    env: &Env,
    owner: Address,
    token: Address,
    target_amount: i128,
    deadline: u64,
) {
    let topics = (symbol_short!("created"),);
    let data = FundCreated {
        owner,
        token,
        target_amount,
        deadline,
    };
    env.events().publish(topics, data);
}

pub fn emit_donation_received(env: &Env, donor: Address, amount: i128, total_raised: i128) {
    let topics = (symbol_short!("donated"), donor.clone());
    let data = DonationReceived {
        donor,
        amount,
        total_raised,
    };
    env.events().publish(topics, data);
}

pub fn emit_fund_closed(env: &Env, total_raised: i128) {
    let topics = (symbol_short!("closed"),);
    env.events().publish(topics, FundClosed { total_raised });
}

pub fn emit_funds_withdrawn(env: &Env, owner: Address, amount: i128) {
    let topics = (symbol_short!("withdrawn"), owner.clone());
    env.events().publish(topics, FundsWithdrawn { owner, amount });
}

pub fn emit_donation_refunded(env: &Env, donor: Address, amount: i128) {
    let topics = (symbol_short!("refunded"), donor.clone());
    env.events().publish(topics, DonationRefunded { donor, amount });
}

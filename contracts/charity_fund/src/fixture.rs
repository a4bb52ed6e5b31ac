// Shared setup for the contract's test modules.

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::{CharityFund, CharityFundClient};

pub const START: u64 = 1_700_000_000;
pub const ONE_DAY: u64 = 24 * 60 * 60;
pub const ONE_GWEI: i128 = 1_000_000_000;
pub const CAUSE: &str = "Any fund cause";

pub struct Fixture {
    pub env: Env,
    pub fund: CharityFundClient<'static>,
    pub token: token::Client<'static>,
    pub token_admin: token::StellarAssetClient<'static>,
    pub owner: Address,
}

pub fn setup_env() -> Env {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);
    env
}

pub fn create_token(env: &Env) -> (token::Client<'static>, token::StellarAssetClient<'static>) {
    let admin = Address::generate(env);
    let sac = env.register_stellar_asset_contract_v2(admin);
    (
        token::Client::new(env, &sac.address()),
        token::StellarAssetClient::new(env, &sac.address()),
    )
}

pub fn deploy(env: &Env) -> CharityFundClient<'static> {
    let contract_id = env.register(CharityFund, ());
    CharityFundClient::new(env, &contract_id)
}

pub fn cause(env: &Env) -> String {
    String::from_str(env, CAUSE)
}

impl Fixture {
    /// A deployed but uninitialised fund plus a token to fund it with.
    pub fn bare() -> Self {
        let env = setup_env();
        let (token, token_admin) = create_token(&env);
        let fund = deploy(&env);
        let owner = Address::generate(&env);
        Fixture {
            env,
            fund,
            token,
            token_admin,
            owner,
        }
    }

    /// A fund initialised with `target` and a deadline `window` seconds from now.
    pub fn new(target: i128, window: u64) -> Self {
        let fixture = Self::bare();
        fixture.fund.init(
            &fixture.owner,
            &fixture.token.address,
            &target,
            &cause(&fixture.env),
            &(START + window),
        );
        fixture
    }

    /// The default fund: one gwei target, two days to raise it.
    pub fn standard() -> Self {
        Self::new(ONE_GWEI, 2 * ONE_DAY)
    }

    /// A fresh address holding `balance` of the fund's token.
    pub fn donor(&self, balance: i128) -> Address {
        let donor = Address::generate(&self.env);
        self.token_admin.mint(&donor, &balance);
        donor
    }

    pub fn fund_balance(&self) -> i128 {
        self.token.balance(&self.fund.address)
    }

    pub fn pass_deadline(&self) {
        self.env.ledger().set_timestamp(self.fund.timeframe() + 1);
    }
}

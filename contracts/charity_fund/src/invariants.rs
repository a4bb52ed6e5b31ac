// Property tests: random sequences of donate/refund/withdraw/time-travel
// against a small fund, checking the ledger invariants after every step.

use proptest::prelude::*;
use soroban_sdk::{testutils::Ledger, Address};

use crate::fixture::{Fixture, ONE_DAY};
use crate::Error;

const TARGET: i128 = 1_000;
const DONORS: usize = 3;

#[derive(Clone, Debug)]
enum Op {
    Donate { donor: usize, amount: i128 },
    Refund { donor: usize },
    Withdraw,
    PassDeadline,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..DONORS, 1..=TARGET + 50).prop_map(|(donor, amount)| Op::Donate { donor, amount }),
        2 => (0..DONORS).prop_map(|donor| Op::Refund { donor }),
        1 => Just(Op::Withdraw),
        1 => Just(Op::PassDeadline),
    ]
}

fn check_invariants(f: &Fixture, donors: &[Address]) {
    let total = f.fund.total_raised();
    let sum: i128 = donors.iter().map(|d| f.fund.donated_amount_from(d)).sum();

    assert_eq!(total, sum, "total_raised must equal the sum of contributions");
    assert!(total >= 0 && total <= TARGET, "total_raised out of range: {total}");
    assert_eq!(f.fund.remaining_amount(), TARGET - total);
    assert_eq!(f.fund.is_closed(), total == TARGET);
    assert_eq!(f.fund.is_open(), !f.fund.is_closed());

    let expected_balance = if f.fund.is_withdrawn() { 0 } else { total };
    assert_eq!(f.fund_balance(), expected_balance);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ledger_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let f = Fixture::new(TARGET, 2 * ONE_DAY);
        let donors: std::vec::Vec<Address> = (0..DONORS).map(|_| f.donor(10 * TARGET)).collect();
        let mut was_closed = false;

        for op in ops {
            let total_before = f.fund.total_raised();
            match op {
                Op::Donate { donor, amount } => {
                    let remaining = f.fund.remaining_amount();
                    let result = f.fund.try_donate(&donors[donor], &amount);
                    if was_closed {
                        prop_assert_eq!(result, Err(Ok(Error::CharityIsFinished)));
                    } else if amount > remaining {
                        prop_assert_eq!(result, Err(Ok(Error::FundTargetExceeded)));
                        prop_assert_eq!(f.fund.total_raised(), total_before);
                    } else {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(f.fund.total_raised(), total_before + amount);
                    }
                }
                Op::Refund { donor } => {
                    let owed = f.fund.donated_amount_from(&donors[donor]);
                    let refundable = f.fund.is_refundable();
                    let result = f.fund.try_refund(&donors[donor]);
                    if was_closed {
                        prop_assert_eq!(result, Err(Ok(Error::CharityIsFinished)));
                    } else if !refundable {
                        prop_assert_eq!(result, Err(Ok(Error::RefundIsNotYetAllowed)));
                    } else if owed == 0 {
                        prop_assert_eq!(result, Err(Ok(Error::NothingToRefund)));
                    } else {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(f.fund.donated_amount_from(&donors[donor]), 0);
                        prop_assert_eq!(f.fund.total_raised(), total_before - owed);
                    }
                }
                Op::Withdraw => {
                    let withdrawn = f.fund.is_withdrawn();
                    let result = f.fund.try_withdraw(&f.owner);
                    if !was_closed {
                        prop_assert_eq!(result, Err(Ok(Error::CharityIsNotFinished)));
                    } else if withdrawn {
                        prop_assert_eq!(result, Err(Ok(Error::AlreadyWithdrawn)));
                    } else {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(f.token.balance(&f.owner), TARGET);
                    }
                }
                Op::PassDeadline => {
                    let now = f.env.ledger().timestamp();
                    f.env.ledger().set_timestamp(now.max(f.fund.timeframe()) + 1);
                }
            }

            check_invariants(&f, &donors);

            // Closure is permanent.
            if was_closed {
                prop_assert!(f.fund.is_closed());
            }
            was_closed = f.fund.is_closed();
        }
    }
}

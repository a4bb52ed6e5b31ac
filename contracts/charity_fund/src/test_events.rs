use soroban_sdk::{
    symbol_short,
    testutils::Events,
    vec, IntoVal, TryIntoVal, Val,
};

use crate::events::{DonationReceived, DonationRefunded, FundClosed, FundCreated, FundsWithdrawn};
use crate::fixture::{Fixture, ONE_DAY, START};

fn last_events(f: &Fixture, n: usize) -> std::vec::Vec<(soroban_sdk::Address, soroban_sdk::Vec<Val>, Val)> {
    let all = f.env.events().all();
    let len = all.len();
    (len - n as u32..len).map(|i| all.get_unchecked(i)).collect()
}

#[test]
fn test_fund_created_event() {
    let f = Fixture::new(1_000, 2 * ONE_DAY);

    let event = f.env.events().all().last().expect("No events found");
    assert_eq!(event.0, f.fund.address);
    assert_eq!(event.1, vec![&f.env, symbol_short!("created").into_val(&f.env)]);

    let data: FundCreated = event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        data,
        FundCreated {
            owner: f.owner.clone(),
            token: f.token.address.clone(),
            target_amount: 1_000,
            deadline: START + 2 * ONE_DAY,
        }
    );
}

#[test]
fn test_donation_received_event() {
    let f = Fixture::new(1_000, 2 * ONE_DAY);
    let donor = f.donor(1_000);
    f.fund.donate(&donor, &400);

    let event = f.env.events().all().last().expect("No events found");
    assert_eq!(event.0, f.fund.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("donated").into_val(&f.env),
        donor.into_val(&f.env),
    ];
    assert_eq!(event.1, expected_topics);

    let data: DonationReceived = event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        data,
        DonationReceived {
            donor: donor.clone(),
            amount: 400,
            total_raised: 400,
        }
    );
}

#[test]
fn test_closing_donation_emits_closed_event() {
    let f = Fixture::new(1_000, 2 * ONE_DAY);
    let donor = f.donor(1_000);
    f.fund.donate(&donor, &600);
    f.fund.donate(&donor, &400);

    let events = last_events(&f, 2);

    let donated: DonationReceived = events[0].2.try_into_val(&f.env).unwrap();
    assert_eq!(donated.total_raised, 1_000);

    assert_eq!(events[1].1, vec![&f.env, symbol_short!("closed").into_val(&f.env)]);
    let closed: FundClosed = events[1].2.try_into_val(&f.env).unwrap();
    assert_eq!(closed, FundClosed { total_raised: 1_000 });
}

#[test]
fn test_partial_donation_does_not_emit_closed_event() {
    let f = Fixture::new(1_000, 2 * ONE_DAY);
    let donor = f.donor(1_000);
    f.fund.donate(&donor, &999);

    let event = f.env.events().all().last().expect("No events found");
    let topic: soroban_sdk::Symbol = event.1.get_unchecked(0).try_into_val(&f.env).unwrap();
    assert_eq!(topic, symbol_short!("donated"));
}

#[test]
fn test_funds_withdrawn_event() {
    let f = Fixture::new(1_000, 2 * ONE_DAY);
    let donor = f.donor(1_000);
    f.fund.donate(&donor, &1_000);
    f.fund.withdraw(&f.owner);

    let event = f.env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &f.env,
        symbol_short!("withdrawn").into_val(&f.env),
        f.owner.into_val(&f.env),
    ];
    assert_eq!(event.1, expected_topics);

    let data: FundsWithdrawn = event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        data,
        FundsWithdrawn {
            owner: f.owner.clone(),
            amount: 1_000,
        }
    );
}

#[test]
fn test_donation_refunded_event() {
    let f = Fixture::new(1_000, 2 * ONE_DAY);
    let donor = f.donor(250);
    f.fund.donate(&donor, &250);
    f.pass_deadline();
    f.fund.refund(&donor);

    let event = f.env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &f.env,
        symbol_short!("refunded").into_val(&f.env),
        donor.into_val(&f.env),
    ];
    assert_eq!(event.1, expected_topics);

    let data: DonationRefunded = event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        data,
        DonationRefunded {
            donor: donor.clone(),
            amount: 250,
        }
    );
}

extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, TryIntoVal, Vec,
};

use crate::events::{
    CapSet, PaymentRefunded, RefundsFinalized, SaleFinalized, TokensClaimed, TokensIssued,
};
use crate::{SaleConfig, TokenSale, TokenSaleClient};

// ── Helpers ─────────────────────────────────────────────────────────

const DAY: u64 = 86_400;
const RATE: i128 = 1_000;
const MAX_TOKENS_SOLD: i128 = 1_000_000_000;

fn setup() -> (Env, TokenSaleClient<'static>, Address, SaleConfig) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(TokenSale, ());
    let client = TokenSaleClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let recipient = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sale_asset = env.register_stellar_asset_contract_v2(token_admin.clone());
    token::StellarAssetClient::new(&env, &sale_asset.address()).set_admin(&contract_id);
    let payment_asset = env.register_stellar_asset_contract_v2(token_admin);

    let now = env.ledger().timestamp();
    let config = SaleConfig {
        funding_recipient: recipient,
        sale_token: sale_asset.address(),
        payment_token: payment_asset.address(),
        start_time: now + 1_000,
        end_time: now + 1_000 + 30 * DAY,
        refund_end_time: now + 1_000 + 210 * DAY,
        exchange_rate: RATE,
        max_tokens_sold: MAX_TOKENS_SOLD,
        restricted_duration: DAY,
    };
    client.init(&owner, &config, &Vec::new(&env), &0);
    (env, client, owner, config)
}

fn funded_participant(env: &Env, config: &SaleConfig, amount: i128) -> Address {
    let participant = Address::generate(env);
    token::StellarAssetClient::new(env, &config.payment_token).mint(&participant, &amount);
    participant
}

fn open_unrestricted(env: &Env, config: &SaleConfig) {
    env.ledger()
        .with_mut(|li| li.timestamp = config.start_time + config.restricted_duration + 1);
}

fn finalize_after_end(env: &Env, config: &SaleConfig, client: &TokenSaleClient) {
    env.ledger()
        .with_mut(|li| li.timestamp = config.end_time + 1);
    client.finalize();
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn test_tokens_issued_event() {
    let (env, client, _owner, config) = setup();
    let participant = funded_participant(&env, &config, 100);
    open_unrestricted(&env, &config);

    client.contribute(&participant, &100);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("issued"), participant)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("issued").into_val(&env),
        participant.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    // Data: TokensIssued struct
    let event_data: TokensIssued = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        TokensIssued {
            participant: participant.clone(),
            tokens: 100 * RATE,
            contribution: 100,
        }
    );
}

#[test]
fn test_cap_set_event() {
    let (env, client, owner, _config) = setup();
    let participant = Address::generate(&env);

    client.set_restricted_participation_cap(&owner, &vec![&env, participant.clone()], &5_000);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("cap_set").into_val(&env),
        participant.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CapSet = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CapSet {
            participant: participant.clone(),
            cap: 5_000,
        }
    );
}

#[test]
fn test_tokens_claimed_event() {
    let (env, client, _owner, config) = setup();
    let participant = funded_participant(&env, &config, 100);
    open_unrestricted(&env, &config);
    client.contribute(&participant, &100);
    finalize_after_end(&env, &config, &client);

    client.claim_tokens(&participant, &(40 * RATE));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("claimed").into_val(&env),
        participant.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: TokensClaimed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        TokensClaimed {
            participant: participant.clone(),
            tokens: 40 * RATE,
        }
    );
}

#[test]
fn test_payment_refunded_event() {
    let (env, client, _owner, config) = setup();
    let participant = funded_participant(&env, &config, 100);
    open_unrestricted(&env, &config);
    client.contribute(&participant, &100);
    finalize_after_end(&env, &config, &client);

    client.refund_payment(&participant, &25);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("refunded").into_val(&env),
        participant.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: PaymentRefunded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        PaymentRefunded {
            participant: participant.clone(),
            amount: 25,
        }
    );
}

#[test]
fn test_sale_finalized_event() {
    let (env, client, _owner, config) = setup();
    let participant = funded_participant(&env, &config, 100);
    open_unrestricted(&env, &config);
    client.contribute(&participant, &100);

    finalize_after_end(&env, &config, &client);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("finalized").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: SaleFinalized = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        SaleFinalized {
            tokens_sold: 100 * RATE,
            unsold_tokens: MAX_TOKENS_SOLD - 100 * RATE,
        }
    );
}

#[test]
fn test_refunds_finalized_event() {
    let (env, client, _owner, config) = setup();
    let participant = funded_participant(&env, &config, 100);
    open_unrestricted(&env, &config);
    client.contribute(&participant, &100);
    finalize_after_end(&env, &config, &client);

    env.ledger()
        .with_mut(|li| li.timestamp = config.refund_end_time + 1);
    client.finalize_refunds();

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("ref_final").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RefundsFinalized = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, RefundsFinalized { swept: 100 });
}

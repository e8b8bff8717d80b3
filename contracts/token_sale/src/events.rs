use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensIssued {
    pub participant: Address,
    pub tokens: i128,
    pub contribution: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensClaimed {
    pub participant: Address,
    pub tokens: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentRefunded {
    pub participant: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapSet {
    pub participant: Address,
    pub cap: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleFinalized {
    pub tokens_sold: i128,
    pub unsold_tokens: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundsFinalized {
    pub swept: i128,
}

pub fn emit_tokens_issued(env: &Env, participant: Address, tokens: i128, contribution: i128) {
    let topics = (symbol_short!("issued"), participant.clone());
    let data = TokensIssued {
        participant,
        tokens,
        contribution,
    };
    env.events().publish(topics, data);
}

pub fn emit_tokens_claimed(env: &Env, participant: Address, tokens: i128) {
    let topics = (symbol_short!("claimed"), participant.clone());
    let data = TokensClaimed { participant, tokens };
    env.events().publish(topics, data);
}

pub fn emit_payment_refunded(env: &Env, participant: Address, amount: i128) {
    let topics = (symbol_short!("refunded"), participant.clone());
    let data = PaymentRefunded { participant, amount };
    env.events().publish(topics, data);
}

pub fn emit_cap_set(env: &Env, participant: Address, cap: i128) {
    let topics = (symbol_short!("cap_set"), participant.clone());
    let data = CapSet { participant, cap };
    env.events().publish(topics, data);
}

pub fn emit_sale_finalized(env: &Env, tokens_sold: i128, unsold_tokens: i128) {
    let topics = (symbol_short!("finalized"),);
    let data = SaleFinalized {
        tokens_sold,
        unsold_tokens,
    };
    env.events().publish(topics, data);
}

pub fn emit_refunds_finalized(env: &Env, swept: i128) {
    let topics = (symbol_short!("ref_final"),);
    let data = RefundsFinalized { swept };
    env.events().publish(topics, data);
}

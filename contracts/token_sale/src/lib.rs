//! # Token Sale Contract
//!
//! This is the root crate of a capped, refundable token sale. It exposes
//! the single Soroban contract `TokenSale` whose entry points cover the
//! full sale lifecycle:
//!
//! | Phase         | Entry Point(s)                                     |
//! |---------------|----------------------------------------------------|
//! | Bootstrap     | [`TokenSale::init`]                                |
//! | Whitelisting  | `set_restricted_participation_cap`, `transfer_ownership` |
//! | Contribution  | [`TokenSale::contribute`]                          |
//! | Settlement    | `claim_tokens`, `claim_all_tokens`, `refund_payment`, `refund_all_payment` |
//! | Finalization  | [`TokenSale::finalize`], [`TokenSale::finalize_refunds`] |
//! | Recovery      | `reclaim_token`                                    |
//! | Queries       | `get_config`, `get_state`, `phase`, per-participant getters |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`access`]. Storage access is fully
//! delegated to [`storage`]. This file contains **only** the public entry
//! points, the ledger arithmetic, and event emissions.
//!
//! Every entry point validates all of its preconditions before touching
//! storage, applies its effects, and performs token interactions last, so
//! a panic never leaves the sale partially mutated.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, Vec,
};

pub mod access;
pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod test_events;

use storage::{
    get_participation_cap, load_config, load_participant, load_state, save_config,
    save_participant, save_state, set_participation_cap,
};
pub use types::{ParticipantRecord, SaleConfig, SalePhase, SaleState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    InvalidConfig = 2,
    NotOwner = 3,
    InvalidAmount = 4,
    InvalidContribution = 5,
    CapExceeded = 6,
    ClaimExceeded = 7,
    SaleNotFinalized = 8,
    SaleNotEnded = 9,
    AlreadyFinalized = 10,
    RefundWindowClosed = 11,
    RefundWindowOpen = 12,
    AlreadyFinalizedRefund = 13,
    Overflow = 14,
    TokenNotReclaimable = 15,
}

#[contract]
pub struct TokenSale;

#[contractimpl]
impl TokenSale {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the sale and set its owner.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    ///
    /// - `owner` is the only address allowed to assign participation caps
    ///   and reclaim stray tokens; it must sign the transaction.
    /// - `config` must satisfy `now < start_time < end_time <
    ///   refund_end_time`, with the restricted period fitting inside the
    ///   sale window, a positive exchange rate, and a positive cap.
    /// - Each address in `strategic_partners` is granted
    ///   `partner_allocation` sale tokens up front. The list must not
    ///   contain duplicates; an empty list skips the grants.
    ///
    /// The contract must already be the admin of `config.sale_token`, as
    /// contributions and finalization mint against it.
    pub fn init(
        env: Env,
        owner: Address,
        config: SaleConfig,
        strategic_partners: Vec<Address>,
        partner_allocation: i128,
    ) {
        owner.require_auth();

        if storage::has_config(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }

        let now = env.ledger().timestamp();
        if config.exchange_rate <= 0 || config.max_tokens_sold <= 0 {
            panic_with_error!(&env, Error::InvalidConfig);
        }
        if now >= config.start_time
            || config.end_time <= config.start_time
            || config.refund_end_time <= config.end_time
        {
            panic_with_error!(&env, Error::InvalidConfig);
        }
        // The restricted period must end no later than the sale itself.
        match config.start_time.checked_add(config.restricted_duration) {
            Some(restricted_end) if restricted_end <= config.end_time => {}
            _ => panic_with_error!(&env, Error::InvalidConfig),
        }
        if partner_allocation < 0 {
            panic_with_error!(&env, Error::InvalidConfig);
        }

        // Check for duplicate partner pools
        for i in 0..strategic_partners.len() {
            let p_i = strategic_partners.get(i).unwrap();
            for j in (i + 1)..strategic_partners.len() {
                if p_i == strategic_partners.get(j).unwrap() {
                    panic_with_error!(&env, Error::InvalidConfig);
                }
            }
        }

        access::init_owner(&env, &owner);
        save_config(&env, &config);
        save_state(
            &env,
            &SaleState {
                tokens_sold: 0,
                total_claimable: 0,
                finalized: false,
                finalized_refund: false,
            },
        );

        if partner_allocation > 0 {
            let sale_token = token::StellarAssetClient::new(&env, &config.sale_token);
            for pool in strategic_partners.iter() {
                sale_token.mint(&pool, &partner_allocation);
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Ownership
    // ─────────────────────────────────────────────────────────

    /// Transfer ownership to `new_owner`.
    ///
    /// - `current` must authorize and be the current owner.
    pub fn transfer_ownership(env: Env, current: Address, new_owner: Address) {
        current.require_auth();
        access::transfer_ownership(&env, &current, &new_owner);
    }

    /// Return the current owner address.
    pub fn owner(env: Env) -> Address {
        access::get_owner(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Whitelisting
    // ─────────────────────────────────────────────────────────

    /// Set the restricted-period participation cap for a batch of
    /// participants.
    ///
    /// - `caller` must be the owner.
    /// - `cap` applies uniformly to the batch and overwrites any previous
    ///   value; repeat calls may raise or lower caps at any time.
    /// - Each participant is updated independently; the empty batch is a
    ///   no-op.
    ///
    /// Addresses the owner never lists keep the default cap of 0 and are
    /// locked out for the whole restricted period.
    pub fn set_restricted_participation_cap(
        env: Env,
        caller: Address,
        participants: Vec<Address>,
        cap: i128,
    ) {
        caller.require_auth();
        access::require_owner(&env, &caller);

        if cap < 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        for participant in participants.iter() {
            set_participation_cap(&env, &participant, cap);
            events::emit_cap_set(&env, participant, cap);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Contribution
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` payment units and receive a claimable token
    /// allocation. Returns the number of tokens issued.
    ///
    /// During the restricted period the accepted contribution is clamped
    /// to the participant's remaining cap headroom; a participant with no
    /// headroom fails with `Error::CapExceeded` and nothing changes.
    /// The accepted amount is further clamped so that issuance never
    /// exceeds `max_tokens_sold` — only the payment backing the tokens
    /// actually issued is pulled from the participant.
    ///
    /// The sale never finalizes itself: once this call drives
    /// `tokens_sold` to the cap, anyone may call [`TokenSale::finalize`].
    pub fn contribute(env: Env, participant: Address, amount: i128) -> i128 {
        participant.require_auth();

        let config = load_config(&env);
        let mut state = load_state(&env);
        let now = env.ledger().timestamp();

        if now < config.start_time || now >= config.end_time {
            panic_with_error!(&env, Error::InvalidContribution);
        }
        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidContribution);
        }
        if state.tokens_sold >= config.max_tokens_sold {
            panic_with_error!(&env, Error::InvalidContribution);
        }

        let mut record = load_participant(&env, &participant);
        let restricted = now <= config.restricted_end();

        let allowed = if restricted {
            let cap = get_participation_cap(&env, &participant);
            let headroom = cap - record.participation_history;
            if headroom <= 0 {
                panic_with_error!(&env, Error::CapExceeded);
            }
            amount.min(headroom)
        } else {
            amount
        };

        let tokens = match allowed.checked_mul(config.exchange_rate) {
            Some(tokens) => tokens,
            None => panic_with_error!(&env, Error::Overflow),
        };
        let issued = tokens.min(config.max_tokens_sold - state.tokens_sold);
        // The payment actually retained; the remainder of `amount` never
        // leaves the participant.
        let accepted = issued / config.exchange_rate;

        state.tokens_sold += issued;
        state.total_claimable += issued;
        record.claimable_tokens += issued;
        record.refundable_payment += accepted;
        if restricted {
            record.participation_history += accepted;
        }
        save_state(&env, &state);
        save_participant(&env, &participant, &record);

        // Mint the issued tokens into the sale's custody and pull only the
        // accepted payment.
        token::StellarAssetClient::new(&env, &config.sale_token)
            .mint(&env.current_contract_address(), &issued);
        token::Client::new(&env, &config.payment_token).transfer(
            &participant,
            &env.current_contract_address(),
            &accepted,
        );

        events::emit_tokens_issued(&env, participant, issued, accepted);

        issued
    }

    // ─────────────────────────────────────────────────────────
    // Claims
    // ─────────────────────────────────────────────────────────

    /// Claim `amount` tokens after the sale has ended and been finalized.
    ///
    /// Claiming releases the matching payment (`amount / exchange_rate`,
    /// floored) to the funding recipient while the refund window is still
    /// open; afterwards the payment was already swept and only tokens
    /// move.
    pub fn claim_tokens(env: Env, participant: Address, amount: i128) {
        participant.require_auth();
        Self::apply_claim(&env, &participant, amount);
    }

    /// Claim the participant's entire remaining token allocation.
    /// Fails with `Error::ClaimExceeded` when nothing is left to claim.
    /// Returns the number of tokens claimed.
    pub fn claim_all_tokens(env: Env, participant: Address) -> i128 {
        participant.require_auth();
        let amount = load_participant(&env, &participant).claimable_tokens;
        if amount <= 0 {
            panic_with_error!(&env, Error::ClaimExceeded);
        }
        Self::apply_claim(&env, &participant, amount);
        amount
    }

    // ─────────────────────────────────────────────────────────
    // Refunds
    // ─────────────────────────────────────────────────────────

    /// Return `amount` payment units to the participant during the refund
    /// window, forfeiting the matching tokens to the funding recipient.
    pub fn refund_payment(env: Env, participant: Address, amount: i128) {
        participant.require_auth();
        Self::apply_refund(&env, &participant, amount);
    }

    /// Refund the participant's entire remaining payment balance.
    /// Fails with `Error::ClaimExceeded` when nothing is left to refund.
    /// Returns the payment amount refunded.
    pub fn refund_all_payment(env: Env, participant: Address) -> i128 {
        participant.require_auth();
        let amount = load_participant(&env, &participant).refundable_payment;
        if amount <= 0 {
            panic_with_error!(&env, Error::ClaimExceeded);
        }
        Self::apply_refund(&env, &participant, amount);
        amount
    }

    // ─────────────────────────────────────────────────────────
    // Finalization
    // ─────────────────────────────────────────────────────────

    /// Finalize the sale, allocating the unsold remainder to the funding
    /// recipient.
    ///
    /// Callable by anyone once the sale window has passed or the cap has
    /// been reached, and exactly once.
    pub fn finalize(env: Env) {
        let config = load_config(&env);
        let mut state = load_state(&env);
        let now = env.ledger().timestamp();

        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        if now <= config.end_time && state.tokens_sold < config.max_tokens_sold {
            panic_with_error!(&env, Error::SaleNotEnded);
        }

        state.finalized = true;
        let unsold = config.max_tokens_sold - state.tokens_sold;
        save_state(&env, &state);

        if unsold > 0 {
            token::StellarAssetClient::new(&env, &config.sale_token)
                .mint(&config.funding_recipient, &unsold);
        }

        events::emit_sale_finalized(&env, state.tokens_sold, unsold);
    }

    /// Close the refund window, sweeping the sale's remaining payment
    /// balance to the funding recipient.
    ///
    /// Callable by anyone once the refund window has passed, and exactly
    /// once. Terminal: afterwards refunds are permanently closed and
    /// claims move tokens only.
    pub fn finalize_refunds(env: Env) {
        let config = load_config(&env);
        let mut state = load_state(&env);
        let now = env.ledger().timestamp();

        if !state.finalized {
            panic_with_error!(&env, Error::SaleNotFinalized);
        }
        if state.finalized_refund {
            panic_with_error!(&env, Error::AlreadyFinalizedRefund);
        }
        if now <= config.refund_end_time {
            panic_with_error!(&env, Error::RefundWindowOpen);
        }

        state.finalized_refund = true;
        save_state(&env, &state);

        let payment = token::Client::new(&env, &config.payment_token);
        let balance = payment.balance(&env.current_contract_address());
        if balance > 0 {
            payment.transfer(
                &env.current_contract_address(),
                &config.funding_recipient,
                &balance,
            );
        }

        events::emit_refunds_finalized(&env, balance);
    }

    // ─────────────────────────────────────────────────────────
    // Recovery
    // ─────────────────────────────────────────────────────────

    /// Recover tokens accidentally sent to the sale contract. Returns the
    /// amount recovered.
    ///
    /// - `caller` must be the owner.
    /// - For the sale token, only the surplus above `total_claimable` is
    ///   recoverable — the claim reserve is untouchable.
    /// - The payment token cannot be reclaimed at all; its balance is the
    ///   refund pool until `finalize_refunds` sweeps it.
    ///
    /// Repeat calls are no-ops once the surplus is drained.
    pub fn reclaim_token(env: Env, caller: Address, reclaimed_token: Address) -> i128 {
        caller.require_auth();
        access::require_owner(&env, &caller);

        let config = load_config(&env);
        if reclaimed_token == config.payment_token {
            panic_with_error!(&env, Error::TokenNotReclaimable);
        }

        let client = token::Client::new(&env, &reclaimed_token);
        let balance = client.balance(&env.current_contract_address());
        let reclaimable = if reclaimed_token == config.sale_token {
            balance - load_state(&env).total_claimable
        } else {
            balance
        };

        if reclaimable > 0 {
            client.transfer(&env.current_contract_address(), &caller, &reclaimable);
            reclaimable
        } else {
            0
        }
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Return the immutable sale configuration.
    pub fn get_config(env: Env) -> SaleConfig {
        load_config(&env)
    }

    /// Return the mutable sale totals and lifecycle flags.
    pub fn get_state(env: Env) -> SaleState {
        load_state(&env)
    }

    /// Return the lifecycle phase at the current ledger time.
    pub fn phase(env: Env) -> SalePhase {
        let config = load_config(&env);
        let state = load_state(&env);
        config.phase(&state, env.ledger().timestamp())
    }

    /// Return the restricted-period cap for `participant` (0 by default).
    pub fn participation_cap(env: Env, participant: Address) -> i128 {
        get_participation_cap(&env, &participant)
    }

    /// Return the payment accepted from `participant` during the
    /// restricted period.
    pub fn participation_history(env: Env, participant: Address) -> i128 {
        load_participant(&env, &participant).participation_history
    }

    /// Return the tokens issued to `participant` and not yet claimed.
    pub fn claimable_tokens(env: Env, participant: Address) -> i128 {
        load_participant(&env, &participant).claimable_tokens
    }

    /// Return the payment held for `participant` and not yet refunded or
    /// released.
    pub fn refundable_payment(env: Env, participant: Address) -> i128 {
        load_participant(&env, &participant).refundable_payment
    }

    /// Return the cumulative tokens issued through contributions.
    pub fn tokens_sold(env: Env) -> i128 {
        load_state(&env).tokens_sold
    }

    /// Return the sum of all outstanding claimable token balances.
    pub fn total_claimable_tokens(env: Env) -> i128 {
        load_state(&env).total_claimable
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn apply_claim(env: &Env, participant: &Address, amount: i128) {
        let config = load_config(env);
        let mut state = load_state(env);
        let now = env.ledger().timestamp();

        if !state.finalized {
            panic_with_error!(env, Error::SaleNotFinalized);
        }
        if now <= config.end_time {
            panic_with_error!(env, Error::SaleNotEnded);
        }
        if amount <= 0 {
            panic_with_error!(env, Error::InvalidAmount);
        }

        let mut record = load_participant(env, participant);
        if amount > record.claimable_tokens {
            panic_with_error!(env, Error::ClaimExceeded);
        }

        // The payment backing this claim. Floor division can only
        // undershoot what was retained for the participant, so the
        // subtraction below never underflows.
        let claim_value = amount / config.exchange_rate;

        record.claimable_tokens -= amount;
        record.refundable_payment -= claim_value;
        state.total_claimable -= amount;
        save_state(env, &state);
        save_participant(env, participant, &record);

        token::Client::new(env, &config.sale_token).transfer(
            &env.current_contract_address(),
            participant,
            &amount,
        );
        // A claim inside the refund window confirms the sale and releases
        // the funds; after the window the sweep already moved them.
        if now <= config.refund_end_time && claim_value > 0 {
            token::Client::new(env, &config.payment_token).transfer(
                &env.current_contract_address(),
                &config.funding_recipient,
                &claim_value,
            );
        }

        events::emit_tokens_claimed(env, participant.clone(), amount);
    }

    fn apply_refund(env: &Env, participant: &Address, amount: i128) {
        let config = load_config(env);
        let mut state = load_state(env);
        let now = env.ledger().timestamp();

        if state.finalized_refund {
            panic_with_error!(env, Error::RefundWindowClosed);
        }
        if now <= config.end_time || now > config.refund_end_time {
            panic_with_error!(env, Error::RefundWindowClosed);
        }
        if amount <= 0 {
            panic_with_error!(env, Error::InvalidAmount);
        }

        let mut record = load_participant(env, participant);
        let forfeited = match amount.checked_mul(config.exchange_rate) {
            Some(forfeited) => forfeited,
            None => panic_with_error!(env, Error::Overflow),
        };
        if amount > record.refundable_payment || forfeited > record.claimable_tokens {
            panic_with_error!(env, Error::ClaimExceeded);
        }

        record.refundable_payment -= amount;
        record.claimable_tokens -= forfeited;
        state.total_claimable -= forfeited;
        save_state(env, &state);
        save_participant(env, participant, &record);

        // Refunded positions hand their tokens to the funding recipient.
        token::Client::new(env, &config.sale_token).transfer(
            &env.current_contract_address(),
            &config.funding_recipient,
            &forfeited,
        );
        token::Client::new(env, &config.payment_token).transfer(
            &env.current_contract_address(),
            participant,
            &amount,
        );

        events::emit_payment_refunded(env, participant.clone(), amount);
    }
}

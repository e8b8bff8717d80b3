//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the
//! sale:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key      | Type         | Description                         |
//! |----------|--------------|-------------------------------------|
//! | `Config` | `SaleConfig` | Immutable sale configuration        |
//! | `State`  | `SaleState`  | Mutable totals and lifecycle flags  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                 | Type                | Description                      |
//! |---------------------|---------------------|----------------------------------|
//! | `Cap(addr)`         | `i128`              | Restricted-period cap, default 0 |
//! | `Participant(addr)` | `ParticipantRecord` | Balances, created lazily         |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! ## Why split Cap and Participant?
//!
//! Caps are written in owner batches before the sale opens; records are
//! written by every contribution, claim, and refund. Keeping them apart
//! means a batch cap update never rewrites balance entries, and the hot
//! money path never rewrites the cap.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{ParticipantRecord, SaleConfig, SaleState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys (`Config`, `State`) live as long as the contract and
/// are extended together. Persistent-tier keys (`Cap`, `Participant`) hold
/// per-address data with independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable sale configuration (Instance).
    Config,
    /// Mutable sale totals and flags (Instance).
    State,
    /// Restricted-period participation cap keyed by address (Persistent).
    Cap(Address),
    /// Participant balances keyed by address (Persistent).
    Participant(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Return true once `init` has stored a configuration.
pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Store the immutable sale configuration. Called once from `init`.
pub fn save_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Load the sale configuration. Panics if the sale was never initialized.
pub fn load_config(env: &Env) -> SaleConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("sale not initialized")
}

/// Store the mutable sale totals.
pub fn save_state(env: &Env, state: &SaleState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

/// Load the mutable sale totals. Panics if the sale was never initialized.
pub fn load_state(env: &Env) -> SaleState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("sale not initialized")
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Retrieve the restricted-period cap for `participant`, defaulting to 0
/// for addresses the owner never whitelisted.
pub fn get_participation_cap(env: &Env, participant: &Address) -> i128 {
    let key = DataKey::Cap(participant.clone());
    match env.storage().persistent().get(&key) {
        Some(cap) => {
            bump_persistent(env, &key);
            cap
        }
        None => 0,
    }
}

/// Set the restricted-period cap for `participant`, overwriting any
/// previous value.
pub fn set_participation_cap(env: &Env, participant: &Address, cap: i128) {
    let key = DataKey::Cap(participant.clone());
    env.storage().persistent().set(&key, &cap);
    bump_persistent(env, &key);
}

/// Load the balances for `participant`, returning an empty record for
/// addresses that have never contributed.
pub fn load_participant(env: &Env, participant: &Address) -> ParticipantRecord {
    let key = DataKey::Participant(participant.clone());
    match env.storage().persistent().get(&key) {
        Some(record) => {
            bump_persistent(env, &key);
            record
        }
        None => ParticipantRecord::empty(),
    }
}

/// Store the balances for `participant`. Records are created on the first
/// accepted contribution and persist after they drain to zero.
pub fn save_participant(env: &Env, participant: &Address, record: &ParticipantRecord) {
    let key = DataKey::Participant(participant.clone());
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}

//! # Access — owner authorization
//!
//! The sale has a single privileged address: the owner, who assigns
//! restricted-period participation caps and may reclaim stray tokens.
//! Everything else — contributing, claiming, refunding, finalizing — is
//! permissionless once its preconditions hold.
//!
//! ## Storage layout
//!
//! - `AccessKey::Owner` → `Address` — the current owner.
//!
//! ## Event emissions
//!
//! Every ownership change emits an on-chain event so off-chain indexers
//! can reconstruct the full audit trail:
//!
//! | Event topic prefix | Trigger |
//! |--------------------|---------|
//! | `own_set`          | Owner set at init or transferred |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessKey {
    /// The current owner address.
    Owner,
}

/// Set the initial owner. Must be called exactly once during contract
/// initialization. Panics with `Error::AlreadyInitialized` if called again.
pub fn init_owner(env: &Env, owner: &Address) {
    if env.storage().instance().has(&AccessKey::Owner) {
        panic_with_error_access(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&AccessKey::Owner, owner);
    emit_owner_set(env, owner, None);
}

/// Read the owner address. Panics if the sale was never initialized.
pub fn get_owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&AccessKey::Owner)
        .expect("sale not initialized")
}

/// Assert that `caller` is the current owner.
/// Panics with `Error::NotOwner` on failure.
pub fn require_owner(env: &Env, caller: &Address) {
    if *caller != get_owner(env) {
        panic_with_error_access(env, Error::NotOwner);
    }
}

/// Transfer ownership to `new_owner`.
///
/// - `current` must authorize and must be the current owner.
/// - The previous owner loses all privileges immediately.
pub fn transfer_ownership(env: &Env, current: &Address, new_owner: &Address) {
    require_owner(env, current);
    env.storage().instance().set(&AccessKey::Owner, new_owner);
    emit_owner_set(env, new_owner, Some(current.clone()));
}

/// Emit an ownership event.
/// Topic: `(own_set, owner_address)`
/// Data:  `Option<previous_owner>`
fn emit_owner_set(env: &Env, owner: &Address, by: Option<Address>) {
    env.events()
        .publish((symbol_short!("own_set"), owner.clone()), by);
}

/// Thin wrapper so we can call panic_with_error from inside access.rs
/// without importing the macro from the parent.
#[inline(always)]
fn panic_with_error_access(env: &Env, err: Error) -> ! {
    soroban_sdk::panic_with_error!(env, err)
}

//! # Types
//!
//! Shared data structures used across all modules of the token sale.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! The sale is internally stored as two separate ledger entries:
//!
//! - [`SaleConfig`] — written once at initialization; never mutated.
//! - [`SaleState`] — written on every contribution, claim, and refund.
//!
//! Per-participant data follows the same split: the restricted-period cap
//! is an owner-written entry of its own, while [`ParticipantRecord`] holds
//! the balances the money path mutates.
//!
//! ### Lifecycle as a derived Finite-State Machine
//!
//! [`SalePhase`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Pending ──► OpenRestricted ──► Open ──► Ended ──► Finalized ──► RefundFinalized
//!                       └────────────────────────────►┘
//! ```
//!
//! The phase is never stored. It is recomputed from `(SaleConfig,
//! SaleState, now)` on demand, so the stored flags and the clock cannot
//! drift apart. The `OpenRestricted ──► Finalized` shortcut covers a sale
//! that sells out before its end time.

use soroban_sdk::{contracttype, Address};

/// Current lifecycle phase of the sale, derived rather than stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SalePhase {
    /// Before `start_time`; no contributions accepted.
    Pending,
    /// Sale window open, restricted period active: only capped addresses
    /// may contribute, up to their individual cap.
    OpenRestricted,
    /// Sale window open, caps no longer apply.
    Open,
    /// Past `end_time`, awaiting finalization.
    Ended,
    /// Sale finalized; claims open, refunds open until `refund_end_time`.
    Finalized,
    /// Refund settlement swept; terminal.
    RefundFinalized,
}

/// Immutable sale configuration, written once at initialization.
///
/// Stored separately from the mutable totals so that the high-frequency
/// contribution path rewrites only the small [`SaleState`] entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    /// Receives confirmed-sale payments, forfeited tokens, the unsold
    /// remainder, and the final refund-window sweep.
    pub funding_recipient: Address,
    /// Stellar Asset Contract being sold. The sale contract must be its
    /// admin: tokens are minted on contribution and finalization.
    pub sale_token: Address,
    /// Asset contributions are denominated in.
    pub payment_token: Address,
    /// First ledger timestamp at which contributions are accepted.
    pub start_time: u64,
    /// Contributions stop at this timestamp (exclusive).
    pub end_time: u64,
    /// Refunds close at this timestamp (inclusive); fixed at construction.
    pub refund_end_time: u64,
    /// Sale tokens issued per payment unit. Strictly positive.
    pub exchange_rate: i128,
    /// Hard cap on cumulative issuance through contributions.
    pub max_tokens_sold: i128,
    /// Length of the restricted period after `start_time` during which
    /// per-participant caps apply.
    pub restricted_duration: u64,
}

/// Mutable sale totals, updated by every contribution, claim, and refund.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    /// Cumulative tokens issued through contributions. Never exceeds
    /// `max_tokens_sold`.
    pub tokens_sold: i128,
    /// Sum of `claimable_tokens` over all participants; the portion of the
    /// contract's sale-token balance that is reserved and cannot be
    /// reclaimed.
    pub total_claimable: i128,
    /// One-way flag set by `finalize`.
    pub finalized: bool,
    /// One-way flag set by `finalize_refunds`; requires `finalized`.
    pub finalized_refund: bool,
}

/// Per-participant balances, created lazily on the first accepted
/// contribution and never deleted — a drained record persists with zeroed
/// balances.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantRecord {
    /// Payment accepted during the restricted period. Monotonically
    /// non-decreasing while restricted; frozen once the period ends.
    pub participation_history: i128,
    /// Tokens issued to the participant and not yet claimed.
    pub claimable_tokens: i128,
    /// Payment held on the participant's behalf, returnable until refund
    /// finalization.
    pub refundable_payment: i128,
}

impl ParticipantRecord {
    pub fn empty() -> Self {
        ParticipantRecord {
            participation_history: 0,
            claimable_tokens: 0,
            refundable_payment: 0,
        }
    }
}

impl SaleConfig {
    /// Last timestamp (inclusive) at which the restricted period applies.
    pub fn restricted_end(&self) -> u64 {
        self.start_time + self.restricted_duration
    }

    /// Derive the lifecycle phase at `now`.
    ///
    /// Flags win over the clock: a sale that sold out and was finalized
    /// early reports `Finalized` even while `now < end_time`.
    pub fn phase(&self, state: &SaleState, now: u64) -> SalePhase {
        if state.finalized_refund {
            SalePhase::RefundFinalized
        } else if state.finalized {
            SalePhase::Finalized
        } else if now >= self.end_time {
            SalePhase::Ended
        } else if now < self.start_time {
            SalePhase::Pending
        } else if now <= self.restricted_end() {
            SalePhase::OpenRestricted
        } else {
            SalePhase::Open
        }
    }
}

//! Reseller Platform Core - Commission Engine
//!
//! Multi-tier reseller platform core with deterministic commission
//! resolution and settlement.
//!
//! Administrators, white-labels, distributors and retailers form a scheme
//! hierarchy; each tier may cap the commission percentage it passes down.
//! When an end transaction settles, this crate determines how much
//! commission every participant in the user's ownership chain earns,
//! honoring per-scheme, per-service ceilings configured at every ancestor
//! scheme.
//!
//! # Architecture
//!
//! - **models**: Domain types (Role, Scheme, User, CommissionPlan,
//!   Transaction, LedgerEntry, PlatformState)
//! - **engine**: Commission resolution and settlement (absolute-rate
//!   resolver, margin calculator, settlement engine)
//! - **platform**: Administrative operations, atomic transaction
//!   creation, audit events, snapshots
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents); rates are f64
//! 2. A transaction and its ledger entries commit together or not at all
//! 3. Role seniority is an explicit rank table, not declaration order
//! 4. Every tree walk is bounded: cyclic data fails, it never hangs

// Module declarations
pub mod engine;
pub mod models;
pub mod platform;

// Re-exports for convenience
pub use engine::{
    commission_amount, margins_from_absolute, resolve_absolute_rates, settle_commission,
    AbsoluteRates, CapStore, ResolveError, SchemeStore, SettlementError, UserStore,
};
pub use models::{
    CommissionKind, CommissionPlan, Event, EventLog, LedgerEntry, PlatformState, Role, RoleRates,
    Scheme, SchemeId, Service, ServiceId, Transaction, UnitOfWork, User, UserId,
};
pub use platform::{Platform, PlatformError, PlatformSnapshot, SnapshotError, ValidationError};

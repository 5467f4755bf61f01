//! Domain models for the reseller platform

pub mod commission;
pub mod event;
pub mod ledger;
pub mod role;
pub mod scheme;
pub mod service;
pub mod state;
pub mod transaction;
pub mod user;

/// Scheme identifier
pub type SchemeId = u64;

/// User identifier
pub type UserId = u64;

/// Service identifier
pub type ServiceId = u64;

// Re-exports
pub use commission::{CommissionKind, CommissionPlan, RoleRates};
pub use event::{Event, EventLog};
pub use ledger::LedgerEntry;
pub use role::Role;
pub use scheme::Scheme;
pub use service::Service;
pub use state::{PlatformState, UnitOfWork};
pub use transaction::Transaction;
pub use user::User;

//! Platform Layer
//!
//! The integration layer around the commission engine: administrative
//! operations (seeding, schemes, onboarding, cap configuration),
//! transaction creation inside an atomic unit of work, audit events and
//! state snapshots.
//!
//! The engine stays pure; the authorization and bookkeeping policy around
//! it lives here.

pub mod engine;
pub mod snapshot;
pub mod validation;

// Re-export public API
pub use engine::{Platform, PlatformError};
pub use snapshot::{compute_state_hash, PlatformSnapshot, SnapshotError};
pub use validation::{validate_commission_values, ValidationError};

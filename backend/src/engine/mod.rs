//! Commission Engine
//!
//! The commission resolution and settlement engine:
//! - `resolver`: walk the scheme chain and resolve one effective absolute
//!   rate per role (nearest-ancestor-wins)
//! - `margin`: convert absolute (cumulative) rates into non-overlapping
//!   per-role margins
//! - `settlement`: walk the user ownership chain and stage one ledger
//!   entry per participant with a positive margin
//!
//! The engine is pure with respect to storage: it reads through the store
//! traits below and stages writes into a `UnitOfWork`. Committing (or
//! dropping) the unit of work is the caller's decision, which keeps a
//! transaction and its ledger rows atomic.
//!
//! # Critical Invariants
//!
//! 1. **Margin non-overlap**: the margins staged for one transaction sum
//!    to the most senior configured absolute rate
//! 2. **Bounded walks**: both tree walks carry a visited set and fail with
//!    a configuration error instead of looping on cyclic data
//! 3. **All-or-nothing**: any resolution error aborts before anything is
//!    committed
//!
//! # Example
//!
//! ```rust
//! use reseller_core_rs::engine::settle_commission;
//! use reseller_core_rs::{
//!     CommissionKind, CommissionPlan, PlatformState, Role, RoleRates, Scheme, Transaction,
//!     UnitOfWork, User,
//! };
//!
//! let mut state = PlatformState::new();
//! state.add_scheme(Scheme::new(1, "Default".to_string(), None, 1, 0));
//! state.add_user(User::new(1, "Root".to_string(), Role::SuperAdmin, None, None, None, 0));
//! state.add_user(User::new(
//!     2, "Retailer".to_string(), Role::Retailer, Some(1), Some(1), Some(1), 0,
//! ));
//! state.add_plan(CommissionPlan::new(
//!     1, 1, CommissionKind::Percentage,
//!     RoleRates::new().with(Role::Retailer, 2.0),
//!     1, 0,
//! ));
//!
//! let tx = Transaction::new(2, 1, 1, 100_000, 10);
//! let mut uow = UnitOfWork::new();
//! uow.stage_transaction(tx.clone());
//!
//! let entries = settle_commission(&state, &mut uow, &tx, 10).unwrap();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].amount(), 2_000); // 2% of $1,000.00
//!
//! state.commit(uow);
//! assert_eq!(state.commission_total_for_transaction(tx.id()), 2_000);
//! ```

use crate::models::commission::CommissionPlan;
use crate::models::scheme::Scheme;
use crate::models::state::PlatformState;
use crate::models::user::User;
use crate::models::{SchemeId, ServiceId, UserId};

pub mod margin;
pub mod resolver;
pub mod settlement;

// Re-export public API
pub use margin::margins_from_absolute;
pub use resolver::{resolve_absolute_rates, AbsoluteRates, ResolveError};
pub use settlement::{commission_amount, settle_commission, SettlementError};

/// Read access to the scheme tree.
///
/// `parent_scheme` is the only traversal primitive the resolver uses; the
/// chain walk is id-by-id, never through object references.
pub trait SchemeStore {
    /// Look up a scheme by id
    fn scheme(&self, id: SchemeId) -> Option<&Scheme>;

    /// Resolve a scheme's parent, `None` for a root or unknown scheme
    fn parent_scheme(&self, id: SchemeId) -> Option<&Scheme>;
}

/// Read access to commission cap records.
pub trait CapStore {
    /// Look up the cap record for a (scheme, service) pair
    fn commission_plan(&self, scheme_id: SchemeId, service_id: ServiceId)
        -> Option<&CommissionPlan>;
}

/// Read access to the user tree.
pub trait UserStore {
    /// Look up a user by id
    fn user(&self, id: UserId) -> Option<&User>;

    /// Resolve a user's onboarding parent, `None` for the root
    /// administrator or an unknown user
    fn parent_user(&self, id: UserId) -> Option<&User>;
}

impl SchemeStore for PlatformState {
    fn scheme(&self, id: SchemeId) -> Option<&Scheme> {
        self.get_scheme(id)
    }

    fn parent_scheme(&self, id: SchemeId) -> Option<&Scheme> {
        PlatformState::parent_scheme(self, id)
    }
}

impl CapStore for PlatformState {
    fn commission_plan(
        &self,
        scheme_id: SchemeId,
        service_id: ServiceId,
    ) -> Option<&CommissionPlan> {
        self.get_plan(scheme_id, service_id)
    }
}

impl UserStore for PlatformState {
    fn user(&self, id: UserId) -> Option<&User> {
        self.get_user(id)
    }

    fn parent_user(&self, id: UserId) -> Option<&User> {
        PlatformState::parent_user(self, id)
    }
}

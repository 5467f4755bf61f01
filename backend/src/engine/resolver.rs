//! Absolute-Rate Resolver
//!
//! For a starting scheme and a service, resolves one effective *absolute*
//! commission rate per role by searching the ancestor chain:
//!
//! 1. Starting at the initiating user's scheme, walk parent links toward
//!    the root.
//! 2. At each scheme, look up the cap record for (scheme, service). The
//!    first non-null value found for a role is that role's resolved rate.
//! 3. A role no ancestor configures stays absent (it earns nothing).
//!
//! Nearest-ancestor-wins: the lowest scheme in the chain that bothered to
//! configure a role governs it. A child scheme tightens rates implicitly
//! by overriding with a lower value, and inherits by staying silent.
//!
//! Resolution is a pure read; it never mutates the store.

use crate::engine::{CapStore, SchemeStore};
use crate::models::commission::{CommissionKind, RoleRates};
use crate::models::role::Role;
use crate::models::{SchemeId, ServiceId};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during absolute-rate resolution.
///
/// `NoCommissionConfigured` is the only non-fatal variant: the settlement
/// engine converts it into a successful zero-entry settlement. Everything
/// else is a fatal configuration error that must abort settlement before
/// commit.
#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("no commission configured for service {service_id} anywhere in the scheme chain")]
    NoCommissionConfigured { service_id: ServiceId },

    #[error("scheme chain revisits scheme {scheme_id}")]
    CycleDetected { scheme_id: SchemeId },

    #[error("scheme {scheme_id} not found in scheme store")]
    UnknownScheme { scheme_id: SchemeId },

    #[error("commission kind mismatch at scheme {scheme_id}: found {found:?}, chain uses {expected:?}")]
    MixedCommissionKind {
        scheme_id: SchemeId,
        expected: CommissionKind,
        found: CommissionKind,
    },

    #[error("invalid rate {value} configured for {role:?} at scheme {scheme_id}")]
    InvalidRate {
        scheme_id: SchemeId,
        role: Role,
        value: f64,
    },
}

/// The result of resolution: one absolute rate per configured role, plus
/// the commission kind shared by every contributing cap record.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteRates {
    kind: CommissionKind,
    rates: RoleRates,
}

impl AbsoluteRates {
    /// Commission kind applying to every resolved rate
    pub fn kind(&self) -> CommissionKind {
        self.kind
    }

    /// Per-role resolved absolute rates
    pub fn rates(&self) -> &RoleRates {
        &self.rates
    }

    /// Resolved absolute rate for one role, if any
    pub fn get(&self, role: Role) -> Option<f64> {
        self.rates.get(role)
    }
}

/// Resolve the effective absolute commission rate per role for
/// (`start_scheme_id`, `service_id`).
///
/// Walks the scheme chain from `start_scheme_id` to its root, collecting
/// cap records for the service, then applies nearest-ancestor-wins per
/// role. The walk is bounded by a visited set: revisiting a scheme id is a
/// `CycleDetected` configuration error, never an infinite loop.
///
/// # Errors
///
/// - `NoCommissionConfigured` if no chain scheme has a cap record for the
///   service, or every record leaves every role null
/// - `UnknownScheme` if the chain references a scheme the store does not
///   know (dangling parent id)
/// - `CycleDetected` on a cyclic parent chain
/// - `MixedCommissionKind` if chain records disagree on the kind
/// - `InvalidRate` on a negative or non-finite configured value
pub fn resolve_absolute_rates<S>(
    store: &S,
    start_scheme_id: SchemeId,
    service_id: ServiceId,
) -> Result<AbsoluteRates, ResolveError>
where
    S: SchemeStore + CapStore,
{
    let mut visited: HashSet<SchemeId> = HashSet::new();
    let mut chain = Vec::new();
    let mut kind: Option<CommissionKind> = None;
    let mut current = Some(start_scheme_id);

    while let Some(scheme_id) = current {
        if !visited.insert(scheme_id) {
            return Err(ResolveError::CycleDetected { scheme_id });
        }

        let scheme = store
            .scheme(scheme_id)
            .ok_or(ResolveError::UnknownScheme { scheme_id })?;

        if let Some(plan) = store.commission_plan(scheme_id, service_id) {
            match kind {
                None => kind = Some(plan.kind()),
                Some(expected) if plan.kind() != expected => {
                    return Err(ResolveError::MixedCommissionKind {
                        scheme_id,
                        expected,
                        found: plan.kind(),
                    });
                }
                Some(_) => {}
            }

            for role in Role::COMMISSIONABLE {
                if let Some(value) = plan.rate_for(role) {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ResolveError::InvalidRate {
                            scheme_id,
                            role,
                            value,
                        });
                    }
                }
            }

            chain.push(plan);
        }

        current = scheme.parent_scheme_id();
    }

    // kind is None exactly when no chain scheme had a cap record
    let kind = match kind {
        Some(kind) => kind,
        None => return Err(ResolveError::NoCommissionConfigured { service_id }),
    };

    // Nearest-ancestor-wins, per role independently: `chain` is ordered
    // from the start scheme upward, so the first hit governs.
    let mut rates = RoleRates::new();
    for role in Role::COMMISSIONABLE {
        for plan in &chain {
            if let Some(value) = plan.rate_for(role) {
                rates.set(role, value);
                break;
            }
        }
    }

    if rates.is_empty() {
        return Err(ResolveError::NoCommissionConfigured { service_id });
    }

    Ok(AbsoluteRates { kind, rates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commission::CommissionPlan;
    use crate::models::scheme::Scheme;
    use crate::models::state::PlatformState;

    fn plan(scheme_id: SchemeId, rates: RoleRates) -> CommissionPlan {
        CommissionPlan::new(scheme_id, 1, CommissionKind::Percentage, rates, 1, 0)
    }

    #[test]
    fn test_single_scheme_resolution() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_plan(plan(
            1,
            RoleRates::new()
                .with(Role::Admin, 10.0)
                .with(Role::Retailer, 2.0),
        ));

        let resolved = resolve_absolute_rates(&state, 1, 1).unwrap();
        assert_eq!(resolved.get(Role::Admin), Some(10.0));
        assert_eq!(resolved.get(Role::Retailer), Some(2.0));
        assert_eq!(resolved.get(Role::Distributor), None);
        assert_eq!(resolved.kind(), CommissionKind::Percentage);
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        // root sets RETAILER=5, mid sets RETAILER=3, leaf unset:
        // resolving from leaf must yield 3, not 5.
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_scheme(Scheme::new(2, "Mid".to_string(), Some(1), 1, 0));
        state.add_scheme(Scheme::new(3, "Leaf".to_string(), Some(2), 1, 0));
        state.add_plan(plan(1, RoleRates::new().with(Role::Retailer, 5.0)));
        state.add_plan(plan(2, RoleRates::new().with(Role::Retailer, 3.0)));

        let resolved = resolve_absolute_rates(&state, 3, 1).unwrap();
        assert_eq!(resolved.get(Role::Retailer), Some(3.0));
    }

    #[test]
    fn test_roles_resolve_independently() {
        // Each role takes the nearest configured value for that role,
        // even if another role is configured closer.
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_scheme(Scheme::new(2, "Leaf".to_string(), Some(1), 1, 0));
        state.add_plan(plan(
            1,
            RoleRates::new()
                .with(Role::Admin, 10.0)
                .with(Role::Retailer, 5.0),
        ));
        state.add_plan(plan(2, RoleRates::new().with(Role::Retailer, 3.0)));

        let resolved = resolve_absolute_rates(&state, 2, 1).unwrap();
        assert_eq!(resolved.get(Role::Admin), Some(10.0)); // from root
        assert_eq!(resolved.get(Role::Retailer), Some(3.0)); // from leaf
    }

    #[test]
    fn test_unconfigured_role_is_absent() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_plan(plan(1, RoleRates::new().with(Role::Retailer, 2.0)));

        let resolved = resolve_absolute_rates(&state, 1, 1).unwrap();
        assert_eq!(resolved.get(Role::Distributor), None);
        assert_eq!(resolved.get(Role::Customer), None);
    }

    #[test]
    fn test_no_commission_configured_anywhere() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_scheme(Scheme::new(2, "Leaf".to_string(), Some(1), 1, 0));

        let err = resolve_absolute_rates(&state, 2, 1).unwrap_err();
        assert_eq!(err, ResolveError::NoCommissionConfigured { service_id: 1 });
    }

    #[test]
    fn test_all_null_records_count_as_unconfigured() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_plan(plan(1, RoleRates::new()));

        let err = resolve_absolute_rates(&state, 1, 1).unwrap_err();
        assert_eq!(err, ResolveError::NoCommissionConfigured { service_id: 1 });
    }

    #[test]
    fn test_cycle_detected() {
        // Cyclic fixture: 1 -> 2 -> 1. The CRUD layer forbids this, but
        // the resolver must terminate with an error rather than hang.
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "A".to_string(), Some(2), 1, 0));
        state.add_scheme(Scheme::new(2, "B".to_string(), Some(1), 1, 0));

        let err = resolve_absolute_rates(&state, 1, 1).unwrap_err();
        assert_eq!(err, ResolveError::CycleDetected { scheme_id: 1 });
    }

    #[test]
    fn test_dangling_parent_is_unknown_scheme() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Orphan".to_string(), Some(99), 1, 0));

        let err = resolve_absolute_rates(&state, 1, 1).unwrap_err();
        assert_eq!(err, ResolveError::UnknownScheme { scheme_id: 99 });
    }

    #[test]
    fn test_mixed_kind_is_fatal() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_scheme(Scheme::new(2, "Leaf".to_string(), Some(1), 1, 0));
        state.add_plan(CommissionPlan::new(
            1,
            1,
            CommissionKind::Flat,
            RoleRates::new().with(Role::Retailer, 5.0),
            1,
            0,
        ));
        state.add_plan(plan(2, RoleRates::new().with(Role::Retailer, 3.0)));

        let err = resolve_absolute_rates(&state, 2, 1).unwrap_err();
        assert!(matches!(err, ResolveError::MixedCommissionKind { .. }));
    }

    #[test]
    fn test_negative_rate_is_fatal() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_plan(plan(1, RoleRates::new().with(Role::Retailer, -2.0)));

        let err = resolve_absolute_rates(&state, 1, 1).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRate { .. }));
    }

    #[test]
    fn test_resolution_ignores_other_services() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Root".to_string(), None, 1, 0));
        state.add_plan(CommissionPlan::new(
            1,
            2, // different service
            CommissionKind::Percentage,
            RoleRates::new().with(Role::Retailer, 2.0),
            1,
            0,
        ));

        let err = resolve_absolute_rates(&state, 1, 1).unwrap_err();
        assert_eq!(err, ResolveError::NoCommissionConfigured { service_id: 1 });
    }
}

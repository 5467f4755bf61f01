//! Commission payload validation
//!
//! Rules enforced when an administrator configures a (scheme, service) cap
//! record:
//!
//! 1. Only SUPER_ADMIN / ADMIN / WHITE_LABEL may configure commissions
//! 2. A configuring user may only set values for roles strictly junior to
//!    their own (you cap what you pass down, never your own cut or above)
//! 3. When the parent scheme configures the same role for the same
//!    service, the child value must not exceed the parent value: child
//!    schemes tighten ceilings, never loosen them
//! 4. Values must be non-negative and finite
//!
//! Validation runs before the upsert; a violation leaves the existing
//! record untouched.

use crate::models::commission::{CommissionPlan, RoleRates};
use crate::models::role::Role;
use thiserror::Error;

/// Errors raised by commission payload validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("role {role:?} is not allowed to set commissions")]
    NotPermitted { role: Role },

    #[error("cannot set commission for {role:?}: not junior to {actor_role:?}")]
    RoleNotJunior { actor_role: Role, role: Role },

    #[error(
        "{role:?} commission {value} cannot exceed parent scheme limit {parent_value}"
    )]
    ExceedsParentCap {
        role: Role,
        value: f64,
        parent_value: f64,
    },

    #[error("commission for {role:?} cannot be negative or non-finite (got {value})")]
    InvalidValue { role: Role, value: f64 },
}

/// Validate a commission configuration payload.
///
/// `parent_plan` is the parent scheme's cap record for the same service,
/// when one exists. Roles absent from `values` are ignored: an upsert
/// only touches configured roles.
pub fn validate_commission_values(
    actor_role: Role,
    values: &RoleRates,
    parent_plan: Option<&CommissionPlan>,
) -> Result<(), ValidationError> {
    if !actor_role.can_configure_commission() {
        return Err(ValidationError::NotPermitted { role: actor_role });
    }

    for role in Role::COMMISSIONABLE {
        let value = match values.get(role) {
            Some(value) => value,
            None => continue,
        };

        // Can only set strictly junior roles
        if role.rank() <= actor_role.rank() {
            return Err(ValidationError::RoleNotJunior { actor_role, role });
        }

        // Parent cap enforcement
        if let Some(parent) = parent_plan {
            if let Some(parent_value) = parent.rate_for(role) {
                if value > parent_value {
                    return Err(ValidationError::ExceedsParentCap {
                        role,
                        value,
                        parent_value,
                    });
                }
            }
        }

        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidValue { role, value });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commission::CommissionKind;

    fn parent_plan(rates: RoleRates) -> CommissionPlan {
        CommissionPlan::new(1, 1, CommissionKind::Percentage, rates, 1, 0)
    }

    #[test]
    fn test_retailer_cannot_configure() {
        let values = RoleRates::new().with(Role::Customer, 1.0);
        let err = validate_commission_values(Role::Retailer, &values, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPermitted {
                role: Role::Retailer
            }
        );
    }

    #[test]
    fn test_cannot_set_own_or_senior_role() {
        let own = RoleRates::new().with(Role::WhiteLabel, 5.0);
        let err = validate_commission_values(Role::WhiteLabel, &own, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RoleNotJunior {
                actor_role: Role::WhiteLabel,
                role: Role::WhiteLabel
            }
        );

        let senior = RoleRates::new().with(Role::Admin, 5.0);
        let err = validate_commission_values(Role::WhiteLabel, &senior, None).unwrap_err();
        assert!(matches!(err, ValidationError::RoleNotJunior { .. }));
    }

    #[test]
    fn test_super_admin_may_set_any_commissionable_role() {
        let values = RoleRates::new()
            .with(Role::Admin, 10.0)
            .with(Role::Customer, 0.5);
        assert!(validate_commission_values(Role::SuperAdmin, &values, None).is_ok());
    }

    #[test]
    fn test_child_cannot_exceed_parent_cap() {
        let parent = parent_plan(RoleRates::new().with(Role::Retailer, 3.0));
        let values = RoleRates::new().with(Role::Retailer, 5.0);

        let err = validate_commission_values(Role::Admin, &values, Some(&parent)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ExceedsParentCap {
                role: Role::Retailer,
                value: 5.0,
                parent_value: 3.0
            }
        );
    }

    #[test]
    fn test_child_at_or_below_parent_cap_is_allowed() {
        let parent = parent_plan(RoleRates::new().with(Role::Retailer, 3.0));

        let equal = RoleRates::new().with(Role::Retailer, 3.0);
        assert!(validate_commission_values(Role::Admin, &equal, Some(&parent)).is_ok());

        let below = RoleRates::new().with(Role::Retailer, 2.0);
        assert!(validate_commission_values(Role::Admin, &below, Some(&parent)).is_ok());
    }

    #[test]
    fn test_role_unconstrained_by_parent_passes() {
        // Parent configures nothing for DISTRIBUTOR: any child value goes
        let parent = parent_plan(RoleRates::new().with(Role::Retailer, 3.0));
        let values = RoleRates::new().with(Role::Distributor, 50.0);
        assert!(validate_commission_values(Role::Admin, &values, Some(&parent)).is_ok());
    }

    #[test]
    fn test_negative_value_rejected() {
        let values = RoleRates::new().with(Role::Retailer, -1.0);
        let err = validate_commission_values(Role::Admin, &values, None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let values = RoleRates::new().with(Role::Retailer, f64::NAN);
        let err = validate_commission_values(Role::Admin, &values, None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }
}

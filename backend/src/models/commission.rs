//! Commission cap records
//!
//! A commission cap (`CommissionPlan`) is keyed uniquely by
//! (scheme, service) and stores one *absolute* ceiling per role. Absolute
//! values are cumulative-from-root semantics: the value configured for a
//! role is the maximum total commission payable to that role and everything
//! below it, not an isolated share. The commission engine converts absolute
//! values into non-overlapping margins at settlement time.
//!
//! Per-role values are resolved through one explicit, exhaustive match per
//! role (`RoleRates::get` / `RoleRates::set`): there is no dynamic
//! field-name dispatch anywhere.
//!
//! CRITICAL: rates are f64 (percent or flat currency value); money is i64
//! cents and never stored here.

use crate::models::role::Role;
use crate::models::{SchemeId, ServiceId, UserId};
use serde::{Deserialize, Serialize};

/// How the configured values of a cap record are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionKind {
    /// Values are percentages of the transaction amount.
    Percentage,

    /// Values are flat currency amounts, independent of the transaction.
    Flat,
}

/// Per-role nullable rate values.
///
/// `None` for a role means "not constrained here, defer to the ancestor
/// scheme". There is no slot for SUPER_ADMIN: the platform owner never
/// carries a configured commission value.
///
/// # Example
/// ```
/// use reseller_core_rs::{Role, RoleRates};
///
/// let rates = RoleRates::new()
///     .with(Role::Distributor, 4.0)
///     .with(Role::Retailer, 2.0);
///
/// assert_eq!(rates.get(Role::Distributor), Some(4.0));
/// assert_eq!(rates.get(Role::Admin), None);
/// assert_eq!(rates.get(Role::SuperAdmin), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleRates {
    admin: Option<f64>,
    white_label: Option<f64>,
    master_distributor: Option<f64>,
    distributor: Option<f64>,
    retailer: Option<f64>,
    customer: Option<f64>,
}

impl RoleRates {
    /// Create an empty rate set (every role unconstrained).
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the configured value for a role.
    ///
    /// SUPER_ADMIN always resolves to `None`: it has no slot.
    pub fn get(&self, role: Role) -> Option<f64> {
        match role {
            Role::SuperAdmin => None,
            Role::Admin => self.admin,
            Role::WhiteLabel => self.white_label,
            Role::MasterDistributor => self.master_distributor,
            Role::Distributor => self.distributor,
            Role::Retailer => self.retailer,
            Role::Customer => self.customer,
        }
    }

    /// Set the value for a role.
    ///
    /// # Panics
    /// Panics if `role` is SUPER_ADMIN, which has no commission slot.
    pub fn set(&mut self, role: Role, value: f64) {
        let slot = match role {
            Role::SuperAdmin => panic!("SUPER_ADMIN has no commission slot"),
            Role::Admin => &mut self.admin,
            Role::WhiteLabel => &mut self.white_label,
            Role::MasterDistributor => &mut self.master_distributor,
            Role::Distributor => &mut self.distributor,
            Role::Retailer => &mut self.retailer,
            Role::Customer => &mut self.customer,
        };
        *slot = Some(value);
    }

    /// Set a role's value (builder pattern).
    ///
    /// # Panics
    /// Panics if `role` is SUPER_ADMIN.
    pub fn with(mut self, role: Role, value: f64) -> Self {
        self.set(role, value);
        self
    }

    /// Check whether no role has a configured value.
    pub fn is_empty(&self) -> bool {
        Role::COMMISSIONABLE.iter().all(|r| self.get(*r).is_none())
    }

    /// Number of roles with a configured value.
    pub fn len(&self) -> usize {
        Role::COMMISSIONABLE
            .iter()
            .filter(|r| self.get(**r).is_some())
            .count()
    }

    /// Configured (role, value) pairs ordered most-senior-first.
    ///
    /// Ordering follows the explicit rank ladder, which is what the margin
    /// calculator depends on.
    pub fn configured(&self) -> Vec<(Role, f64)> {
        Role::COMMISSIONABLE
            .iter()
            .filter_map(|role| self.get(*role).map(|value| (*role, value)))
            .collect()
    }

    /// Overlay another rate set onto this one.
    ///
    /// Roles configured in `other` overwrite; roles absent from `other`
    /// are left untouched. This is the upsert merge used when an
    /// administrator re-configures a (scheme, service) pair.
    pub fn merge_from(&mut self, other: &RoleRates) {
        for role in Role::COMMISSIONABLE {
            if let Some(value) = other.get(role) {
                self.set(role, value);
            }
        }
    }
}

/// A commission cap record for one (scheme, service) pair.
///
/// Created and updated by administrators before any transaction references
/// it; read-only during settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionPlan {
    /// Scheme the cap applies to
    scheme_id: SchemeId,

    /// Service the cap applies to
    service_id: ServiceId,

    /// Interpretation of every value in this record
    kind: CommissionKind,

    /// Absolute per-role ceilings (nullable per role)
    rates: RoleRates,

    /// User who last configured this record
    set_by: UserId,

    /// Creation timestamp (seconds, caller-supplied clock)
    created_at: u64,

    /// Last update timestamp
    updated_at: u64,
}

impl CommissionPlan {
    /// Create a new cap record.
    pub fn new(
        scheme_id: SchemeId,
        service_id: ServiceId,
        kind: CommissionKind,
        rates: RoleRates,
        set_by: UserId,
        now: u64,
    ) -> Self {
        Self {
            scheme_id,
            service_id,
            kind,
            rates,
            set_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Scheme this record belongs to
    pub fn scheme_id(&self) -> SchemeId {
        self.scheme_id
    }

    /// Service this record belongs to
    pub fn service_id(&self) -> ServiceId {
        self.service_id
    }

    /// Commission kind applying to the whole record
    pub fn kind(&self) -> CommissionKind {
        self.kind
    }

    /// Per-role absolute ceilings
    pub fn rates(&self) -> &RoleRates {
        &self.rates
    }

    /// Configured absolute value for one role, if any
    pub fn rate_for(&self, role: Role) -> Option<f64> {
        self.rates.get(role)
    }

    /// User who last configured this record
    pub fn set_by(&self) -> UserId {
        self.set_by
    }

    /// Creation timestamp
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Last update timestamp
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Apply an administrator update: overlay configured values, refresh
    /// kind, attribution and update timestamp.
    pub fn apply_update(
        &mut self,
        kind: CommissionKind,
        values: &RoleRates,
        set_by: UserId,
        now: u64,
    ) {
        self.rates.merge_from(values);
        self.kind = kind;
        self.set_by = set_by;
        self.updated_at = now;
    }
}

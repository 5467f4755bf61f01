//! Role ladder
//!
//! Every user carries exactly one of seven fixed roles, strictly ranked by
//! seniority. The ranking drives two things:
//! - margin ordering in the commission engine (senior roles are settled
//!   against the absolute rates of their nearest configured junior)
//! - authorization rules in the platform layer (onboarding, cap setup)
//!
//! # Critical Invariants
//!
//! 1. Seniority is an explicit rank table (`Role::rank`), never the
//!    declaration order of the enum
//! 2. The role set is fixed at compile time and never changes at runtime
//! 3. Only the six roles below SUPER_ADMIN can carry a commission value

use serde::{Deserialize, Serialize};

/// One of the seven fixed seniority tiers.
///
/// # Example
/// ```
/// use reseller_core_rs::Role;
///
/// assert!(Role::Admin.rank() < Role::Retailer.rank());
/// assert!(Role::Distributor.can_onboard(Role::Retailer));
/// assert!(!Role::Retailer.can_onboard(Role::Distributor));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    WhiteLabel,
    MasterDistributor,
    Distributor,
    Retailer,
    Customer,
}

impl Role {
    /// All roles ordered most-senior-first.
    ///
    /// Seniority comparisons and margin ordering iterate this ladder (or
    /// compare `rank()` values); they never rely on declaration order.
    pub const LADDER: [Role; 7] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::WhiteLabel,
        Role::MasterDistributor,
        Role::Distributor,
        Role::Retailer,
        Role::Customer,
    ];

    /// Roles that can carry a configured commission value.
    ///
    /// SUPER_ADMIN has no commission column on a cap record: commission
    /// is always distributed below the platform owner.
    pub const COMMISSIONABLE: [Role; 6] = [
        Role::Admin,
        Role::WhiteLabel,
        Role::MasterDistributor,
        Role::Distributor,
        Role::Retailer,
        Role::Customer,
    ];

    /// Seniority rank: 1 = most senior (SUPER_ADMIN), 7 = least (CUSTOMER).
    pub fn rank(&self) -> u8 {
        match self {
            Role::SuperAdmin => 1,
            Role::Admin => 2,
            Role::WhiteLabel => 3,
            Role::MasterDistributor => 4,
            Role::Distributor => 5,
            Role::Retailer => 6,
            Role::Customer => 7,
        }
    }

    /// Check whether this role may carry a configured commission value.
    pub fn is_commissionable(&self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }

    /// Check whether a user of this role may onboard a user of `child` role.
    ///
    /// A user can only onboard strictly junior roles. Nobody can onboard
    /// a SUPER_ADMIN (no role is senior to it).
    pub fn can_onboard(&self, child: Role) -> bool {
        self.rank() < child.rank()
    }

    /// Check whether this role may create schemes and configure commission
    /// caps. Only the top three tiers administer schemes.
    pub fn can_configure_commission(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::WhiteLabel)
    }

    /// Check whether this role may initiate transactions.
    ///
    /// SUPER_ADMIN and ADMIN administer the platform; they never appear as
    /// the initiating end of a transaction.
    pub fn can_initiate_transactions(&self) -> bool {
        !matches!(self, Role::SuperAdmin | Role::Admin)
    }

    /// Stable display name matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::WhiteLabel => "WHITE_LABEL",
            Role::MasterDistributor => "MASTER_DISTRIBUTOR",
            Role::Distributor => "DISTRIBUTOR",
            Role::Retailer => "RETAILER",
            Role::Customer => "CUSTOMER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_total_and_strict() {
        let mut seen = std::collections::HashSet::new();
        for role in Role::LADDER {
            assert!(seen.insert(role.rank()), "duplicate rank for {:?}", role);
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_ladder_is_ordered_by_rank() {
        for pair in Role::LADDER.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_super_admin_not_commissionable() {
        assert!(!Role::SuperAdmin.is_commissionable());
        for role in Role::COMMISSIONABLE {
            assert!(role.is_commissionable());
        }
    }

    #[test]
    fn test_onboarding_is_strictly_downward() {
        assert!(Role::SuperAdmin.can_onboard(Role::Admin));
        assert!(Role::SuperAdmin.can_onboard(Role::Customer));
        assert!(Role::Retailer.can_onboard(Role::Customer));

        // Equal or senior roles are rejected
        assert!(!Role::Admin.can_onboard(Role::Admin));
        assert!(!Role::Retailer.can_onboard(Role::Distributor));

        // Nobody can onboard a SUPER_ADMIN
        for role in Role::LADDER {
            assert!(!role.can_onboard(Role::SuperAdmin));
        }
    }

    #[test]
    fn test_transaction_initiation_guard() {
        assert!(!Role::SuperAdmin.can_initiate_transactions());
        assert!(!Role::Admin.can_initiate_transactions());
        assert!(Role::Retailer.can_initiate_transactions());
        assert!(Role::Customer.can_initiate_transactions());
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&Role::MasterDistributor).unwrap();
        assert_eq!(json, "\"MASTER_DISTRIBUTOR\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::MasterDistributor);
    }
}

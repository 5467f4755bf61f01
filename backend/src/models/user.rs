//! User model
//!
//! A platform member: identity, role, the user who onboarded them
//! (parent), and an optional scheme assignment.
//!
//! The user tree is distinct from the scheme tree. A user inherits rate
//! configuration through their *scheme*, but the settlement payout chain
//! follows user → parent-user links. The two walks never share code.

use crate::models::role::Role;
use crate::models::{SchemeId, UserId};
use serde::{Deserialize, Serialize};

/// A platform member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    id: UserId,

    /// Display name
    name: String,

    /// Seniority tier (exactly one, fixed at onboarding)
    role: Role,

    /// User who onboarded this user, `None` for the root administrator
    parent_user_id: Option<UserId>,

    /// Scheme assignment, `None` when not yet assigned
    scheme_id: Option<SchemeId>,

    /// User who created this record
    created_by: Option<UserId>,

    /// Active flag
    is_active: bool,

    /// Creation timestamp (seconds, caller-supplied clock)
    created_at: u64,
}

impl User {
    /// Create a new active user.
    pub fn new(
        id: UserId,
        name: String,
        role: Role,
        parent_user_id: Option<UserId>,
        scheme_id: Option<SchemeId>,
        created_by: Option<UserId>,
        now: u64,
    ) -> Self {
        Self {
            id,
            name,
            role,
            parent_user_id,
            scheme_id,
            created_by,
            is_active: true,
            created_at: now,
        }
    }

    /// Get user id
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Get display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Get the onboarding parent's id (`None` for the root administrator)
    pub fn parent_user_id(&self) -> Option<UserId> {
        self.parent_user_id
    }

    /// Get the scheme assignment
    pub fn scheme_id(&self) -> Option<SchemeId> {
        self.scheme_id
    }

    /// Get the creator's id
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Get active flag
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Get creation timestamp
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Assign or move the user to a scheme
    pub fn assign_scheme(&mut self, scheme_id: SchemeId) {
        self.scheme_id = Some(scheme_id);
    }

    /// Deactivate the user (soft delete)
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

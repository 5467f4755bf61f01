//! Scheme model
//!
//! A scheme is a configuration-tenancy node forming a tree: commission caps
//! attach to (scheme, service) pairs and are inherited down the tree unless
//! a closer scheme overrides them.
//!
//! Schemes reference their parent by id only. Traversal goes through the
//! platform state's parent lookup, never through object back-references,
//! which keeps the chain walk bounded and cycle-checkable.

use crate::models::{SchemeId, UserId};
use serde::{Deserialize, Serialize};

/// A node in the scheme tree. Absence of a parent means this is a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    /// Unique scheme identifier
    id: SchemeId,

    /// Display name (unique across the platform)
    name: String,

    /// Parent scheme, `None` for a root scheme
    parent_scheme_id: Option<SchemeId>,

    /// User who created this scheme
    created_by: UserId,

    /// Active flag
    is_active: bool,

    /// Creation timestamp (seconds, caller-supplied clock)
    created_at: u64,
}

impl Scheme {
    /// Create a new active scheme.
    pub fn new(
        id: SchemeId,
        name: String,
        parent_scheme_id: Option<SchemeId>,
        created_by: UserId,
        now: u64,
    ) -> Self {
        Self {
            id,
            name,
            parent_scheme_id,
            created_by,
            is_active: true,
            created_at: now,
        }
    }

    /// Get scheme id
    pub fn id(&self) -> SchemeId {
        self.id
    }

    /// Get scheme name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get parent scheme id (`None` for a root)
    pub fn parent_scheme_id(&self) -> Option<SchemeId> {
        self.parent_scheme_id
    }

    /// Check whether this is a root scheme
    pub fn is_root(&self) -> bool {
        self.parent_scheme_id.is_none()
    }

    /// Get the creator's user id
    pub fn created_by(&self) -> UserId {
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

    /// Deactivate the scheme (soft delete)
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

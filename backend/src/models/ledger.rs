//! Commission ledger model
//!
//! One ledger entry records one participant's earned commission for one
//! transaction. Entries are append-only and owned by their transaction:
//! deleting a transaction deletes its entries in the same operation.
//!
//! Role and scheme are snapshots taken at settlement time, not live
//! lookups: a later role change or scheme move never rewrites history.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::commission::CommissionKind;
use crate::models::role::Role;
use crate::models::{SchemeId, ServiceId, UserId};
use serde::{Deserialize, Serialize};

/// An immutable record of one user's earned commission for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier (UUID)
    id: String,

    /// Owning transaction
    transaction_id: String,

    /// Earning participant
    user_id: UserId,

    /// Participant's role at settlement time (snapshot)
    role: Role,

    /// Participant's scheme at settlement time (snapshot; the root
    /// administrator carries none)
    scheme_id: Option<SchemeId>,

    /// Service the owning transaction was routed through
    service_id: ServiceId,

    /// How `value` is interpreted
    kind: CommissionKind,

    /// The margin value applied: a percentage for PERCENTAGE, a flat
    /// currency value for FLAT
    value: f64,

    /// Computed monetary amount (i64 cents)
    amount: i64,

    /// Settlement timestamp (seconds, caller-supplied clock)
    created_at: u64,
}

impl LedgerEntry {
    /// Create a new ledger entry with a fresh UUID.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transaction_id: String,
        user_id: UserId,
        role: Role,
        scheme_id: Option<SchemeId>,
        service_id: ServiceId,
        kind: CommissionKind,
        value: f64,
        amount: i64,
        now: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            transaction_id,
            user_id,
            role,
            scheme_id,
            service_id,
            kind,
            value,
            amount,
            created_at: now,
        }
    }

    /// Get entry id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get owning transaction id
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Get earning participant's user id
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Get role snapshot
    pub fn role(&self) -> Role {
        self.role
    }

    /// Get scheme snapshot
    pub fn scheme_id(&self) -> Option<SchemeId> {
        self.scheme_id
    }

    /// Get service id
    pub fn service_id(&self) -> ServiceId {
        self.service_id
    }

    /// Get commission kind
    pub fn kind(&self) -> CommissionKind {
        self.kind
    }

    /// Get the applied margin value (percent or flat)
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the computed monetary amount (i64 cents)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Get settlement timestamp
    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

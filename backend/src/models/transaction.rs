//! Transaction model
//!
//! Represents one end transaction (a recharge, a payment) initiated by a
//! user. Each transaction snapshots the initiating user's scheme at
//! creation time; settlement derives commission ledger entries from that
//! snapshot inside the same unit of work.
//!
//! Transactions are immutable once committed. The only later mutation the
//! platform performs is cascade deletion together with the ledger rows.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::{SchemeId, ServiceId, UserId};
use serde::{Deserialize, Serialize};

/// One settled end transaction.
///
/// # Example
/// ```
/// use reseller_core_rs::Transaction;
///
/// let tx = Transaction::new(
///     42,      // initiating user
///     7,       // scheme snapshot
///     1,       // service
///     100_000, // $1,000.00 in cents
///     1_700_000_000,
/// );
/// assert_eq!(tx.amount(), 100_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier (UUID)
    id: String,

    /// Initiating user
    user_id: UserId,

    /// The initiating user's scheme at creation time (snapshot)
    scheme_id: SchemeId,

    /// Service the transaction was routed through
    service_id: ServiceId,

    /// Transaction amount (i64 cents)
    amount: i64,

    /// Creation timestamp (seconds, caller-supplied clock)
    created_at: u64,
}

impl Transaction {
    /// Create a new transaction with a fresh UUID.
    ///
    /// # Panics
    /// Panics if `amount <= 0`.
    pub fn new(
        user_id: UserId,
        scheme_id: SchemeId,
        service_id: ServiceId,
        amount: i64,
        now: u64,
    ) -> Self {
        assert!(amount > 0, "amount must be positive");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            scheme_id,
            service_id,
            amount,
            created_at: now,
        }
    }

    /// Get transaction id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the initiating user's id
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Get the scheme snapshot taken at creation time
    pub fn scheme_id(&self) -> SchemeId {
        self.scheme_id
    }

    /// Get the service id
    pub fn service_id(&self) -> ServiceId {
        self.service_id
    }

    /// Get the amount (i64 cents)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Get creation timestamp
    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

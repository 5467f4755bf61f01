//! Snapshot - Save/Load Platform State
//!
//! Enables serialization and deserialization of the complete platform
//! state for backup and transfer.
//!
//! Snapshots carry a SHA-256 integrity hash over a canonical JSON
//! rendering of the state; restore recomputes and verifies it, rejecting
//! tampered or corrupted snapshots.
//!
//! The audit event log is deliberately not part of a snapshot: it is an
//! account of what happened, not state needed to continue operating.
//!
//! # Critical Invariants
//!
//! - **Determinism**: capturing the same state twice yields byte-identical
//!   snapshots (collections are sorted by id)
//! - **Ledger Ownership**: restore re-commits rows through the unit of
//!   work, so a snapshot with orphaned ledger entries cannot load

use crate::models::commission::CommissionPlan;
use crate::models::ledger::LedgerEntry;
use crate::models::scheme::Scheme;
use crate::models::service::Service;
use crate::models::state::{PlatformState, UnitOfWork};
use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::models::{SchemeId, ServiceId, UserId};
use crate::platform::engine::Platform;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur when capturing or restoring a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot serialization failed: {0}")]
    Serialization(String),

    #[error("snapshot hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: String, computed: String },
}

/// Complete platform state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    pub schemes: Vec<Scheme>,
    pub users: Vec<User>,
    pub services: Vec<Service>,
    pub plans: Vec<CommissionPlan>,
    pub transactions: Vec<Transaction>,
    pub ledger: Vec<LedgerEntry>,
    pub next_scheme_id: SchemeId,
    pub next_user_id: UserId,
    pub next_service_id: ServiceId,

    /// SHA-256 over the canonical JSON of everything above
    pub state_hash: String,
}

/// The hashed portion of a snapshot (everything except the hash itself).
#[derive(Serialize)]
struct HashBody<'a> {
    schemes: &'a [Scheme],
    users: &'a [User],
    services: &'a [Service],
    plans: &'a [CommissionPlan],
    transactions: &'a [Transaction],
    ledger: &'a [LedgerEntry],
    next_scheme_id: SchemeId,
    next_user_id: UserId,
    next_service_id: ServiceId,
}

/// Compute a canonical SHA-256 hash of any serializable value.
///
/// Serializes to `serde_json::Value`, recursively sorts all object keys,
/// then hashes the resulting JSON string. Canonicalization guarantees
/// deterministic hashing regardless of map iteration order.
pub fn compute_state_hash<T: Serialize>(body: &T) -> Result<String, SnapshotError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(body)
        .map_err(|e| SnapshotError::Serialization(format!("state serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical = canonicalize(value);
    let json = serde_json::to_string(&canonical)
        .map_err(|e| SnapshotError::Serialization(format!("state serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(format!("{:x}", result))
}

impl Platform {
    /// Capture a snapshot of the complete platform state.
    pub fn snapshot(&self) -> Result<PlatformSnapshot, SnapshotError> {
        let state = self.state();

        let mut schemes: Vec<Scheme> = state.schemes().values().cloned().collect();
        schemes.sort_by_key(|s| s.id());

        let mut users: Vec<User> = state.users().values().cloned().collect();
        users.sort_by_key(|u| u.id());

        let mut services: Vec<Service> = state.services().values().cloned().collect();
        services.sort_by_key(|s| s.id());

        let mut plans: Vec<CommissionPlan> = state.plans().values().cloned().collect();
        plans.sort_by_key(|p| (p.scheme_id(), p.service_id()));

        let mut transactions: Vec<Transaction> = state.transactions().values().cloned().collect();
        transactions.sort_by(|a, b| a.id().cmp(b.id()));

        let ledger: Vec<LedgerEntry> = state.ledger().to_vec();

        let (next_scheme_id, next_user_id, next_service_id) = self.id_watermarks();

        let state_hash = compute_state_hash(&HashBody {
            schemes: &schemes,
            users: &users,
            services: &services,
            plans: &plans,
            transactions: &transactions,
            ledger: &ledger,
            next_scheme_id,
            next_user_id,
            next_service_id,
        })?;

        Ok(PlatformSnapshot {
            schemes,
            users,
            services,
            plans,
            transactions,
            ledger,
            next_scheme_id,
            next_user_id,
            next_service_id,
            state_hash,
        })
    }

    /// Restore a platform from a snapshot, verifying its integrity hash.
    ///
    /// The transaction rows and ledger entries are re-committed through
    /// the unit of work, so the restored state satisfies the same
    /// invariants as a live one.
    pub fn restore(snapshot: &PlatformSnapshot) -> Result<Platform, SnapshotError> {
        let computed = compute_state_hash(&HashBody {
            schemes: &snapshot.schemes,
            users: &snapshot.users,
            services: &snapshot.services,
            plans: &snapshot.plans,
            transactions: &snapshot.transactions,
            ledger: &snapshot.ledger,
            next_scheme_id: snapshot.next_scheme_id,
            next_user_id: snapshot.next_user_id,
            next_service_id: snapshot.next_service_id,
        })?;
        if computed != snapshot.state_hash {
            return Err(SnapshotError::HashMismatch {
                stored: snapshot.state_hash.clone(),
                computed,
            });
        }

        let mut state = PlatformState::new();
        for scheme in &snapshot.schemes {
            state.add_scheme(scheme.clone());
        }
        for user in &snapshot.users {
            state.add_user(user.clone());
        }
        for service in &snapshot.services {
            state.add_service(service.clone());
        }
        for plan in &snapshot.plans {
            state.add_plan(plan.clone());
        }
        for transaction in &snapshot.transactions {
            let mut uow = UnitOfWork::new();
            uow.stage_transaction(transaction.clone());
            state.commit(uow);
        }
        let mut ledger_uow = UnitOfWork::new();
        for entry in &snapshot.ledger {
            ledger_uow.stage_ledger_entry(entry.clone());
        }
        state.commit(ledger_uow);

        Ok(Platform::from_parts(
            state,
            snapshot.next_scheme_id,
            snapshot.next_user_id,
            snapshot.next_service_id,
        ))
    }
}

//! Platform state
//!
//! Represents the complete in-memory state of the reseller platform:
//! scheme tree, user tree, service catalog, commission cap records,
//! transactions and the commission ledger.
//!
//! Hierarchies are stored as flat id-keyed arenas. Parent links are plain
//! ids resolved through `parent_scheme` / `parent_user`; there are no
//! object graphs with back-references, so every walk is bounded and
//! cycle-checkable by the caller.
//!
//! # Critical Invariants
//!
//! 1. **Id Uniqueness**: each scheme/user/service/transaction id appears
//!    exactly once (insertion asserts)
//! 2. **Plan Uniqueness**: at most one commission plan per
//!    (scheme, service) pair
//! 3. **Ledger Ownership**: every ledger entry references a transaction in
//!    the transactions map; cascade deletion preserves this
//! 4. **Atomic Settlement**: a transaction and its ledger entries become
//!    visible together via `commit`, or not at all

use crate::models::commission::{CommissionKind, CommissionPlan, RoleRates};
use crate::models::ledger::LedgerEntry;
use crate::models::scheme::Scheme;
use crate::models::service::Service;
use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::models::{SchemeId, ServiceId, UserId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Staging buffer for one atomic unit of work.
///
/// The settlement engine stages a transaction and its derived ledger
/// entries here; `PlatformState::commit` applies everything at once.
/// Dropping an uncommitted unit of work discards all staged rows: that
/// is the rollback path.
///
/// # Example
/// ```
/// use reseller_core_rs::{PlatformState, Transaction, UnitOfWork};
///
/// let mut state = PlatformState::new();
/// let mut uow = UnitOfWork::new();
/// uow.stage_transaction(Transaction::new(1, 1, 1, 100_000, 0));
/// state.commit(uow);
/// assert_eq!(state.num_transactions(), 1);
/// ```
#[derive(Debug, Default)]
pub struct UnitOfWork {
    transaction: Option<Transaction>,
    ledger_entries: Vec<LedgerEntry>,
}

impl UnitOfWork {
    /// Create an empty unit of work
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the transaction row.
    ///
    /// # Panics
    /// Panics if a transaction is already staged (one unit of work settles
    /// exactly one transaction).
    pub fn stage_transaction(&mut self, transaction: Transaction) {
        assert!(
            self.transaction.is_none(),
            "unit of work already holds a transaction"
        );
        self.transaction = Some(transaction);
    }

    /// Get the staged transaction, if any
    pub fn staged_transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    /// Stage one ledger entry
    pub fn stage_ledger_entry(&mut self, entry: LedgerEntry) {
        self.ledger_entries.push(entry);
    }

    /// Get the staged ledger entries
    pub fn staged_ledger_entries(&self) -> &[LedgerEntry] {
        &self.ledger_entries
    }
}

/// Complete platform state.
#[derive(Debug, Clone, Default)]
pub struct PlatformState {
    /// Scheme tree, indexed by id
    schemes: HashMap<SchemeId, Scheme>,

    /// User tree, indexed by id
    users: HashMap<UserId, User>,

    /// Service catalog, indexed by id
    services: HashMap<ServiceId, Service>,

    /// Commission cap records, one per (scheme, service) pair
    plans: HashMap<(SchemeId, ServiceId), CommissionPlan>,

    /// All committed transactions, indexed by transaction id
    transactions: HashMap<String, Transaction>,

    /// Append-only commission ledger
    ledger: Vec<LedgerEntry>,
}

impl PlatformState {
    /// Create an empty platform state
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Schemes
    // ------------------------------------------------------------------

    /// Get a scheme by id
    pub fn get_scheme(&self, id: SchemeId) -> Option<&Scheme> {
        self.schemes.get(&id)
    }

    /// Get a mutable scheme by id
    pub fn get_scheme_mut(&mut self, id: SchemeId) -> Option<&mut Scheme> {
        self.schemes.get_mut(&id)
    }

    /// Resolve a scheme's parent, `None` for a root or unknown scheme
    pub fn parent_scheme(&self, id: SchemeId) -> Option<&Scheme> {
        self.schemes
            .get(&id)
            .and_then(|scheme| scheme.parent_scheme_id())
            .and_then(|parent_id| self.schemes.get(&parent_id))
    }

    /// Add a scheme to the tree
    ///
    /// # Panics
    /// Panics if the scheme id already exists
    pub fn add_scheme(&mut self, scheme: Scheme) {
        let id = scheme.id();
        assert!(
            !self.schemes.contains_key(&id),
            "Scheme id {} already exists",
            id
        );
        self.schemes.insert(id, scheme);
    }

    /// Look up a scheme by name
    pub fn find_scheme_by_name(&self, name: &str) -> Option<&Scheme> {
        self.schemes.values().find(|s| s.name() == name)
    }

    /// Get all schemes
    pub fn schemes(&self) -> &HashMap<SchemeId, Scheme> {
        &self.schemes
    }

    /// Get number of schemes
    pub fn num_schemes(&self) -> usize {
        self.schemes.len()
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Get a user by id
    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Get a mutable user by id
    pub fn get_user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    /// Resolve a user's onboarding parent, `None` for the root
    /// administrator or an unknown user
    pub fn parent_user(&self, id: UserId) -> Option<&User> {
        self.users
            .get(&id)
            .and_then(|user| user.parent_user_id())
            .and_then(|parent_id| self.users.get(&parent_id))
    }

    /// Add a user
    ///
    /// # Panics
    /// Panics if the user id already exists
    pub fn add_user(&mut self, user: User) {
        let id = user.id();
        assert!(!self.users.contains_key(&id), "User id {} already exists", id);
        self.users.insert(id, user);
    }

    /// Get all users
    pub fn users(&self) -> &HashMap<UserId, User> {
        &self.users
    }

    /// Get number of users
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    /// Get a service by id
    pub fn get_service(&self, id: ServiceId) -> Option<&Service> {
        self.services.get(&id)
    }

    /// Look up a service by its unique code
    pub fn find_service_by_code(&self, code: &str) -> Option<&Service> {
        self.services.values().find(|s| s.code() == code)
    }

    /// Add a service
    ///
    /// # Panics
    /// Panics if the service id already exists
    pub fn add_service(&mut self, service: Service) {
        let id = service.id();
        assert!(
            !self.services.contains_key(&id),
            "Service id {} already exists",
            id
        );
        self.services.insert(id, service);
    }

    /// Get all services
    pub fn services(&self) -> &HashMap<ServiceId, Service> {
        &self.services
    }

    // ------------------------------------------------------------------
    // Commission plans
    // ------------------------------------------------------------------

    /// Get the commission plan for a (scheme, service) pair
    pub fn get_plan(&self, scheme_id: SchemeId, service_id: ServiceId) -> Option<&CommissionPlan> {
        self.plans.get(&(scheme_id, service_id))
    }

    /// Get a mutable commission plan for a (scheme, service) pair
    pub fn get_plan_mut(
        &mut self,
        scheme_id: SchemeId,
        service_id: ServiceId,
    ) -> Option<&mut CommissionPlan> {
        self.plans.get_mut(&(scheme_id, service_id))
    }

    /// Insert a new commission plan
    ///
    /// # Panics
    /// Panics if a plan for the (scheme, service) pair already exists;
    /// create-or-update flows go through `upsert_plan`.
    pub fn add_plan(&mut self, plan: CommissionPlan) {
        let key = (plan.scheme_id(), plan.service_id());
        assert!(
            !self.plans.contains_key(&key),
            "Commission plan for scheme {} / service {} already exists",
            key.0,
            key.1
        );
        self.plans.insert(key, plan);
    }

    /// Insert or update the commission plan for a (scheme, service) pair.
    ///
    /// An existing record is overlaid (configured values overwrite, absent
    /// values stay); otherwise a fresh record is created.
    pub fn upsert_plan(
        &mut self,
        scheme_id: SchemeId,
        service_id: ServiceId,
        kind: CommissionKind,
        values: &RoleRates,
        set_by: UserId,
        now: u64,
    ) {
        match self.plans.entry((scheme_id, service_id)) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().apply_update(kind, values, set_by, now);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CommissionPlan::new(
                    scheme_id,
                    service_id,
                    kind,
                    values.clone(),
                    set_by,
                    now,
                ));
            }
        }
    }

    /// Get all commission plans
    pub fn plans(&self) -> &HashMap<(SchemeId, ServiceId), CommissionPlan> {
        &self.plans
    }

    // ------------------------------------------------------------------
    // Transactions and ledger
    // ------------------------------------------------------------------

    /// Get a transaction by id
    pub fn get_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    /// Get all transactions
    pub fn transactions(&self) -> &HashMap<String, Transaction> {
        &self.transactions
    }

    /// Get number of committed transactions
    pub fn num_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// Get the full commission ledger
    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    /// Get the ledger entries for one transaction
    pub fn ledger_for_transaction(&self, tx_id: &str) -> Vec<&LedgerEntry> {
        self.ledger
            .iter()
            .filter(|e| e.transaction_id() == tx_id)
            .collect()
    }

    /// Total commission distributed for one transaction (i64 cents)
    pub fn commission_total_for_transaction(&self, tx_id: &str) -> i64 {
        self.ledger
            .iter()
            .filter(|e| e.transaction_id() == tx_id)
            .map(|e| e.amount())
            .sum()
    }

    /// Apply a unit of work: the staged transaction and its ledger entries
    /// become visible together.
    ///
    /// # Panics
    /// Panics if the staged transaction id already exists (duplicate
    /// settlement must be deduplicated by the caller) or if a staged
    /// ledger entry references neither the staged nor a committed
    /// transaction.
    pub fn commit(&mut self, uow: UnitOfWork) {
        let UnitOfWork {
            transaction,
            ledger_entries,
        } = uow;

        if let Some(tx) = &transaction {
            assert!(
                !self.transactions.contains_key(tx.id()),
                "Transaction id {} already exists",
                tx.id()
            );
        }
        for entry in &ledger_entries {
            let owned_by_staged = transaction
                .as_ref()
                .map(|tx| tx.id() == entry.transaction_id())
                .unwrap_or(false);
            assert!(
                owned_by_staged || self.transactions.contains_key(entry.transaction_id()),
                "Ledger entry references unknown transaction {}",
                entry.transaction_id()
            );
        }

        if let Some(tx) = transaction {
            self.transactions.insert(tx.id().to_string(), tx);
        }
        self.ledger.extend(ledger_entries);
    }

    /// Remove a transaction and cascade-delete its ledger entries.
    ///
    /// Returns the removed transaction and the number of ledger entries
    /// deleted, or `None` if the transaction does not exist.
    pub fn remove_transaction(&mut self, tx_id: &str) -> Option<(Transaction, usize)> {
        let transaction = self.transactions.remove(tx_id)?;
        let before = self.ledger.len();
        self.ledger.retain(|e| e.transaction_id() != tx_id);
        Some((transaction, before - self.ledger.len()))
    }
}

//! Settlement Engine
//!
//! Converts one completed transaction into zero or more commission ledger
//! entries:
//!
//! 1. Resolve the initiating user's scheme (no scheme ⇒ fail fast, before
//!    anything is staged)
//! 2. Resolve absolute rates over the scheme chain
//! 3. Convert absolute rates into per-role margins, once per transaction
//! 4. Walk the *user* ownership chain (parent-user links, a different tree
//!    than the scheme chain) and stage one ledger entry per participant
//!    whose role carries a positive margin
//!
//! The engine stages into a caller-supplied `UnitOfWork` and never commits
//! itself: the transaction row and the ledger rows become durable together
//! or not at all. It is not idempotent: invoking it twice for the same
//! transaction identity stages two full sets of entries; deduplication is
//! the caller's responsibility.
//!
//! The margin mapping is fixed at step 3 and never recomputed per
//! hierarchy level: every eligible role earns its full margin share for
//! this transaction no matter where in the chain its user sits.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::engine::margin::margins_from_absolute;
use crate::engine::resolver::{resolve_absolute_rates, ResolveError};
use crate::engine::{CapStore, SchemeStore, UserStore};
use crate::models::commission::CommissionKind;
use crate::models::ledger::LedgerEntry;
use crate::models::state::UnitOfWork;
use crate::models::transaction::Transaction;
use crate::models::UserId;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during commission settlement.
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("user {user_id} is not assigned to any scheme")]
    MissingSchemeAssignment { user_id: UserId },

    #[error("user {user_id} not found in user store")]
    UnknownUser { user_id: UserId },

    #[error("user ownership chain revisits user {user_id}")]
    UserCycleDetected { user_id: UserId },

    #[error("rate resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}

/// Compute the monetary commission amount in cents.
///
/// - PERCENTAGE: `amount × value / 100`, rounded to the nearest cent
/// - FLAT: the configured value is a currency amount in major units,
///   converted to cents with the same rounding
///
/// # Example
/// ```
/// use reseller_core_rs::engine::commission_amount;
/// use reseller_core_rs::CommissionKind;
///
/// // 2% of $1,000.00
/// assert_eq!(commission_amount(100_000, 2.0, CommissionKind::Percentage), 2_000);
/// // flat $1.50, independent of the transaction amount
/// assert_eq!(commission_amount(100_000, 1.5, CommissionKind::Flat), 150);
/// ```
pub fn commission_amount(amount: i64, value: f64, kind: CommissionKind) -> i64 {
    let cents = match kind {
        CommissionKind::Percentage => (amount as f64) * value / 100.0,
        CommissionKind::Flat => value * 100.0,
    };
    cents.round() as i64
}

/// Settle commission for one transaction.
///
/// Stages one ledger entry into `uow` per user in the initiating user's
/// ownership chain whose role carries a positive margin, and returns the
/// staged entries in chain order (initiator outward). Users whose role has
/// no margin are skipped, not errors.
///
/// When no ancestor scheme configures any commission for the service the
/// settlement succeeds with zero entries: the transaction proceeds with
/// no commission distributed.
///
/// Must be invoked exactly once per transaction, inside the same unit of
/// work that stages the transaction row; the caller commits both together.
///
/// # Errors
///
/// - `MissingSchemeAssignment` if the initiating user has no scheme
///   (nothing is staged; the caller must reject the transaction)
/// - `UnknownUser` on a dangling user reference
/// - `UserCycleDetected` on a cyclic ownership chain
/// - `Resolve` for fatal resolution errors (cycle, unknown scheme, mixed
///   kinds, invalid rates)
pub fn settle_commission<S>(
    store: &S,
    uow: &mut UnitOfWork,
    transaction: &Transaction,
    now: u64,
) -> Result<Vec<LedgerEntry>, SettlementError>
where
    S: SchemeStore + CapStore + UserStore,
{
    let initiator = store
        .user(transaction.user_id())
        .ok_or(SettlementError::UnknownUser {
            user_id: transaction.user_id(),
        })?;

    let scheme_id = initiator
        .scheme_id()
        .ok_or(SettlementError::MissingSchemeAssignment {
            user_id: initiator.id(),
        })?;

    let absolute = match resolve_absolute_rates(store, scheme_id, transaction.service_id()) {
        Ok(absolute) => absolute,
        // Zero commission distributed is a successful settlement
        Err(ResolveError::NoCommissionConfigured { .. }) => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    // Fixed once per transaction; not recomputed per hierarchy level
    let margins = margins_from_absolute(absolute.rates());

    let mut entries = Vec::new();
    let mut visited: HashSet<UserId> = HashSet::new();
    let mut current = Some(initiator.id());

    while let Some(user_id) = current {
        if !visited.insert(user_id) {
            return Err(SettlementError::UserCycleDetected { user_id });
        }

        let user = store
            .user(user_id)
            .ok_or(SettlementError::UnknownUser { user_id })?;

        // margins holds strictly positive values only; anything absent is
        // a skip, not an error
        if let Some(value) = margins.get(user.role()) {
            let amount = commission_amount(transaction.amount(), value, absolute.kind());
            let entry = LedgerEntry::new(
                transaction.id().to_string(),
                user.id(),
                user.role(),
                user.scheme_id(),
                transaction.service_id(),
                absolute.kind(),
                value,
                amount,
                now,
            );
            uow.stage_ledger_entry(entry.clone());
            entries.push(entry);
        }

        current = user.parent_user_id();
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commission::{CommissionPlan, RoleRates};
    use crate::models::role::Role;
    use crate::models::scheme::Scheme;
    use crate::models::state::PlatformState;
    use crate::models::user::User;

    /// Root admin (1) <- distributor (2) <- retailer (3), all on scheme 1
    fn chain_fixture(rates: RoleRates) -> PlatformState {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Default".to_string(), None, 1, 0));
        state.add_user(User::new(
            1,
            "Root".to_string(),
            Role::SuperAdmin,
            None,
            None,
            None,
            0,
        ));
        state.add_user(User::new(
            2,
            "Distributor".to_string(),
            Role::Distributor,
            Some(1),
            Some(1),
            Some(1),
            0,
        ));
        state.add_user(User::new(
            3,
            "Retailer".to_string(),
            Role::Retailer,
            Some(2),
            Some(1),
            Some(2),
            0,
        ));
        state.add_plan(CommissionPlan::new(
            1,
            1,
            CommissionKind::Percentage,
            rates,
            1,
            0,
        ));
        state
    }

    #[test]
    fn test_settlement_totals() {
        // absolute {DISTRIBUTOR: 5, RETAILER: 3} -> margins {2, 3}:
        // amounts for a $1,000.00 transaction are $20.00 and $30.00
        let state = chain_fixture(
            RoleRates::new()
                .with(Role::Distributor, 5.0)
                .with(Role::Retailer, 3.0),
        );
        let tx = Transaction::new(3, 1, 1, 100_000, 10);
        let mut uow = UnitOfWork::new();
        uow.stage_transaction(tx.clone());

        let entries = settle_commission(&state, &mut uow, &tx, 10).unwrap();

        assert_eq!(entries.len(), 2);
        // chain order: initiator (retailer) first
        assert_eq!(entries[0].user_id(), 3);
        assert_eq!(entries[0].role(), Role::Retailer);
        assert_eq!(entries[0].value(), 3.0);
        assert_eq!(entries[0].amount(), 3_000);
        assert_eq!(entries[1].user_id(), 2);
        assert_eq!(entries[1].role(), Role::Distributor);
        assert_eq!(entries[1].value(), 2.0);
        assert_eq!(entries[1].amount(), 2_000);
    }

    #[test]
    fn test_users_without_margin_are_skipped() {
        // Only RETAILER configured: the distributor and root admin in the
        // chain produce no entries.
        let state = chain_fixture(RoleRates::new().with(Role::Retailer, 2.0));
        let tx = Transaction::new(3, 1, 1, 100_000, 10);
        let mut uow = UnitOfWork::new();
        uow.stage_transaction(tx.clone());

        let entries = settle_commission(&state, &mut uow, &tx, 10).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id(), 3);
    }

    #[test]
    fn test_no_commission_configured_is_empty_success() {
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Default".to_string(), None, 1, 0));
        state.add_user(User::new(
            1,
            "Retailer".to_string(),
            Role::Retailer,
            None,
            Some(1),
            None,
            0,
        ));
        let tx = Transaction::new(1, 1, 1, 100_000, 10);
        let mut uow = UnitOfWork::new();
        uow.stage_transaction(tx.clone());

        let entries = settle_commission(&state, &mut uow, &tx, 10).unwrap();

        assert!(entries.is_empty());
        assert!(uow.staged_ledger_entries().is_empty());
    }

    #[test]
    fn test_missing_scheme_fails_fast() {
        let mut state = PlatformState::new();
        state.add_user(User::new(
            1,
            "Unassigned".to_string(),
            Role::Retailer,
            None,
            None,
            None,
            0,
        ));
        let tx = Transaction::new(1, 1, 1, 100_000, 10);
        let mut uow = UnitOfWork::new();

        let err = settle_commission(&state, &mut uow, &tx, 10).unwrap_err();

        assert_eq!(err, SettlementError::MissingSchemeAssignment { user_id: 1 });
        assert!(uow.staged_ledger_entries().is_empty());
    }

    #[test]
    fn test_user_chain_cycle_is_detected() {
        // Cyclic ownership fixture: 2 <-> 3. Entries staged before the
        // cycle is discovered stay in the unit of work, which the caller
        // must drop: nothing becomes durable.
        let mut state = PlatformState::new();
        state.add_scheme(Scheme::new(1, "Default".to_string(), None, 1, 0));
        state.add_user(User::new(
            2,
            "A".to_string(),
            Role::Distributor,
            Some(3),
            Some(1),
            None,
            0,
        ));
        state.add_user(User::new(
            3,
            "B".to_string(),
            Role::Retailer,
            Some(2),
            Some(1),
            None,
            0,
        ));
        state.add_plan(CommissionPlan::new(
            1,
            1,
            CommissionKind::Percentage,
            RoleRates::new().with(Role::Retailer, 2.0),
            1,
            0,
        ));
        let tx = Transaction::new(3, 1, 1, 100_000, 10);
        let mut uow = UnitOfWork::new();

        let err = settle_commission(&state, &mut uow, &tx, 10).unwrap_err();

        assert_eq!(err, SettlementError::UserCycleDetected { user_id: 3 });
    }

    #[test]
    fn test_flat_kind_produces_constant_amounts() {
        let mut state = chain_fixture(RoleRates::new());
        // replace the percentage plan for service 2 with a flat one
        state.add_plan(CommissionPlan::new(
            1,
            2,
            CommissionKind::Flat,
            RoleRates::new()
                .with(Role::Distributor, 3.5)
                .with(Role::Retailer, 1.5),
            1,
            0,
        ));
        let tx = Transaction::new(3, 1, 2, 5_000, 10);
        let mut uow = UnitOfWork::new();
        uow.stage_transaction(tx.clone());

        let entries = settle_commission(&state, &mut uow, &tx, 10).unwrap();

        assert_eq!(entries.len(), 2);
        // retailer keeps 1.5 flat = $1.50; distributor margin 3.5-1.5 = $2.00
        assert_eq!(entries[0].amount(), 150);
        assert_eq!(entries[1].amount(), 200);
        assert_eq!(entries[0].kind(), CommissionKind::Flat);
    }

    #[test]
    fn test_rounding_to_cents() {
        // 2.5% of $0.33 = 0.825 cents, rounds to 1 cent
        assert_eq!(commission_amount(33, 2.5, CommissionKind::Percentage), 1);
        // 1.234 flat rounds to 123 cents
        assert_eq!(commission_amount(1, 1.234, CommissionKind::Flat), 123);
    }
}

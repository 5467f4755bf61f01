//! Platform façade
//!
//! Integrates the domain stores with the commission engine and enforces
//! the administrative rules around them:
//! - seeding (service catalog, root administrator)
//! - scheme creation (who may create, where in the tree)
//! - user onboarding (strict-seniority rule, single root administrator)
//! - commission configuration (ownership, payload validation, upsert)
//! - transaction creation with commission settlement in one atomic unit
//!   of work
//! - transaction deletion with ledger cascade
//!
//! Every operation takes an explicit `now` timestamp so the platform stays
//! deterministic and testable; no operation reads a wall clock.

use crate::engine::settlement::{settle_commission, SettlementError};
use crate::models::commission::{CommissionKind, RoleRates};
use crate::models::event::{Event, EventLog};
use crate::models::ledger::LedgerEntry;
use crate::models::role::Role;
use crate::models::scheme::Scheme;
use crate::models::service::Service;
use crate::models::state::{PlatformState, UnitOfWork};
use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::models::{SchemeId, ServiceId, UserId};
use crate::platform::validation::{validate_commission_values, ValidationError};
use thiserror::Error;

/// Errors surfaced by platform operations.
#[derive(Debug, Error, PartialEq)]
pub enum PlatformError {
    #[error("role {role:?} is not allowed to perform this operation")]
    RoleNotPermitted { role: Role },

    #[error("user {user_id} not found")]
    UnknownUser { user_id: UserId },

    #[error("user {user_id} is not assigned to any scheme")]
    MissingSchemeAssignment { user_id: UserId },

    #[error("scheme {scheme_id} not found")]
    UnknownScheme { scheme_id: SchemeId },

    #[error("scheme name '{name}' already exists")]
    DuplicateSchemeName { name: String },

    #[error("scheme {scheme_id} is not administered by user {user_id}")]
    SchemeNotOwned { scheme_id: SchemeId, user_id: UserId },

    #[error("a SUPER_ADMIN already exists")]
    SuperAdminAlreadyExists,

    #[error("{actor_role:?} cannot onboard a user with role {child_role:?}")]
    OnboardingNotAllowed { actor_role: Role, child_role: Role },

    #[error("service {service_id} not found")]
    UnknownService { service_id: ServiceId },

    #[error("transaction {tx_id} not found")]
    UnknownTransaction { tx_id: String },

    #[error("transaction amount must be positive (got {amount})")]
    InvalidAmount { amount: i64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

/// The reseller platform: state, audit log and id allocation.
///
/// # Example
/// ```
/// use reseller_core_rs::{Platform, Role, RoleRates, CommissionKind};
///
/// let mut platform = Platform::new();
/// let root = platform.seed_core_data(0);
///
/// let scheme = platform.create_scheme(root, "Default".to_string(), 10).unwrap();
/// let retailer = platform
///     .onboard_user(root, "Shop".to_string(), Role::Retailer, Some(scheme), 20)
///     .unwrap();
///
/// let mobile = platform.state().find_service_by_code("MOBILE").unwrap().id();
/// platform
///     .set_commission(
///         root, scheme, mobile, CommissionKind::Percentage,
///         &RoleRates::new().with(Role::Retailer, 2.0),
///         30,
///     )
///     .unwrap();
///
/// let (tx_id, entries) = platform
///     .create_transaction(retailer, mobile, 100_000, 40)
///     .unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(platform.state().commission_total_for_transaction(&tx_id), 2_000);
/// ```
#[derive(Debug, Default)]
pub struct Platform {
    state: PlatformState,
    events: EventLog,
    next_scheme_id: SchemeId,
    next_user_id: UserId,
    next_service_id: ServiceId,
}

impl Platform {
    /// Create an empty platform
    pub fn new() -> Self {
        Self {
            state: PlatformState::new(),
            events: EventLog::new(),
            next_scheme_id: 0,
            next_user_id: 0,
            next_service_id: 0,
        }
    }

    /// Get the platform state
    pub fn state(&self) -> &PlatformState {
        &self.state
    }

    /// Get the audit event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    fn alloc_scheme_id(&mut self) -> SchemeId {
        self.next_scheme_id += 1;
        self.next_scheme_id
    }

    fn alloc_user_id(&mut self) -> UserId {
        self.next_user_id += 1;
        self.next_user_id
    }

    fn alloc_service_id(&mut self) -> ServiceId {
        self.next_service_id += 1;
        self.next_service_id
    }

    /// Seed the stock service catalog and the root SUPER_ADMIN.
    ///
    /// Idempotent: services already present (by code) and an existing root
    /// administrator are left alone. Returns the root administrator's id.
    pub fn seed_core_data(&mut self, now: u64) -> UserId {
        const SERVICES: [(&str, &str, &str); 4] = [
            ("Recharge", "MOBILE", "Mobile Recharge"),
            ("Recharge", "DTH", "DTH Recharge"),
            ("Banking", "AEPS", "AEPS Service"),
            ("Banking", "DMT", "DMT Service"),
        ];

        for (category, code, name) in SERVICES {
            if self.state.find_service_by_code(code).is_none() {
                let id = self.alloc_service_id();
                self.state.add_service(Service::new(
                    id,
                    category.to_string(),
                    code.to_string(),
                    name.to_string(),
                ));
            }
        }

        if let Some(root) = self.find_super_admin() {
            return root;
        }

        let id = self.alloc_user_id();
        self.state.add_user(User::new(
            id,
            "Super Admin".to_string(),
            Role::SuperAdmin,
            None,
            None,
            None,
            now,
        ));
        self.events.log(Event::UserOnboarded {
            at: now,
            user_id: id,
            role: Role::SuperAdmin,
            parent_user_id: None,
            scheme_id: None,
        });
        id
    }

    fn find_super_admin(&self) -> Option<UserId> {
        self.state
            .users()
            .values()
            .find(|u| u.role() == Role::SuperAdmin)
            .map(|u| u.id())
    }

    /// Create a scheme.
    ///
    /// SUPER_ADMIN creates root schemes; ADMIN and WHITE_LABEL create
    /// children of their own scheme (and must therefore have one). Other
    /// roles may not create schemes. Scheme names are unique.
    pub fn create_scheme(
        &mut self,
        actor_id: UserId,
        name: String,
        now: u64,
    ) -> Result<SchemeId, PlatformError> {
        let actor = self
            .state
            .get_user(actor_id)
            .ok_or(PlatformError::UnknownUser { user_id: actor_id })?;

        if !actor.role().can_configure_commission() {
            return Err(PlatformError::RoleNotPermitted { role: actor.role() });
        }

        let parent_scheme_id = if actor.role() == Role::SuperAdmin {
            None
        } else {
            Some(
                actor
                    .scheme_id()
                    .ok_or(PlatformError::MissingSchemeAssignment { user_id: actor_id })?,
            )
        };

        if self.state.find_scheme_by_name(&name).is_some() {
            return Err(PlatformError::DuplicateSchemeName { name });
        }

        let id = self.alloc_scheme_id();
        self.state
            .add_scheme(Scheme::new(id, name, parent_scheme_id, actor_id, now));
        self.events.log(Event::SchemeCreated {
            at: now,
            scheme_id: id,
            parent_scheme_id,
            created_by: actor_id,
        });
        Ok(id)
    }

    /// Onboard a user under the acting user.
    ///
    /// The actor becomes the new user's parent in the ownership chain.
    /// Only strictly junior roles can be onboarded, and the platform holds
    /// at most one SUPER_ADMIN.
    pub fn onboard_user(
        &mut self,
        actor_id: UserId,
        name: String,
        role: Role,
        scheme_id: Option<SchemeId>,
        now: u64,
    ) -> Result<UserId, PlatformError> {
        let actor = self
            .state
            .get_user(actor_id)
            .ok_or(PlatformError::UnknownUser { user_id: actor_id })?;
        let actor_role = actor.role();

        if role == Role::SuperAdmin && self.find_super_admin().is_some() {
            return Err(PlatformError::SuperAdminAlreadyExists);
        }

        if !actor_role.can_onboard(role) {
            return Err(PlatformError::OnboardingNotAllowed {
                actor_role,
                child_role: role,
            });
        }

        if let Some(scheme_id) = scheme_id {
            if self.state.get_scheme(scheme_id).is_none() {
                return Err(PlatformError::UnknownScheme { scheme_id });
            }
        }

        let id = self.alloc_user_id();
        self.state.add_user(User::new(
            id,
            name,
            role,
            Some(actor_id),
            scheme_id,
            Some(actor_id),
            now,
        ));
        self.events.log(Event::UserOnboarded {
            at: now,
            user_id: id,
            role,
            parent_user_id: Some(actor_id),
            scheme_id,
        });
        Ok(id)
    }

    /// Configure (upsert) the commission cap record for a
    /// (scheme, service) pair.
    ///
    /// The actor must have created the scheme. The payload is validated
    /// against the actor's role and the parent scheme's record before
    /// anything is written; configured values overwrite, absent values are
    /// left as they were.
    pub fn set_commission(
        &mut self,
        actor_id: UserId,
        scheme_id: SchemeId,
        service_id: ServiceId,
        kind: CommissionKind,
        values: &RoleRates,
        now: u64,
    ) -> Result<(), PlatformError> {
        let actor = self
            .state
            .get_user(actor_id)
            .ok_or(PlatformError::UnknownUser { user_id: actor_id })?;
        let actor_role = actor.role();

        let scheme = self
            .state
            .get_scheme(scheme_id)
            .ok_or(PlatformError::UnknownScheme { scheme_id })?;
        if scheme.created_by() != actor_id {
            return Err(PlatformError::SchemeNotOwned {
                scheme_id,
                user_id: actor_id,
            });
        }

        if self.state.get_service(service_id).is_none() {
            return Err(PlatformError::UnknownService { service_id });
        }

        let parent_plan = scheme
            .parent_scheme_id()
            .and_then(|parent_id| self.state.get_plan(parent_id, service_id));

        validate_commission_values(actor_role, values, parent_plan)?;

        self.state
            .upsert_plan(scheme_id, service_id, kind, values, actor_id, now);

        self.events.log(Event::CommissionConfigured {
            at: now,
            scheme_id,
            service_id,
            set_by: actor_id,
        });
        Ok(())
    }

    /// Create a transaction and settle its commission atomically.
    ///
    /// SUPER_ADMIN and ADMIN never initiate transactions; the initiating
    /// user must be assigned to a scheme. The transaction row and its
    /// ledger entries are committed together: any settlement error rolls
    /// back the whole unit of work and nothing becomes visible.
    ///
    /// Returns the transaction id and the created ledger entries (empty
    /// when no ancestor scheme configures commission for the service).
    pub fn create_transaction(
        &mut self,
        actor_id: UserId,
        service_id: ServiceId,
        amount: i64,
        now: u64,
    ) -> Result<(String, Vec<LedgerEntry>), PlatformError> {
        if amount <= 0 {
            return Err(PlatformError::InvalidAmount { amount });
        }

        let actor = self
            .state
            .get_user(actor_id)
            .ok_or(PlatformError::UnknownUser { user_id: actor_id })?;

        if !actor.role().can_initiate_transactions() {
            return Err(PlatformError::RoleNotPermitted { role: actor.role() });
        }

        let scheme_id = actor
            .scheme_id()
            .ok_or(PlatformError::MissingSchemeAssignment { user_id: actor_id })?;

        if self.state.get_service(service_id).is_none() {
            return Err(PlatformError::UnknownService { service_id });
        }

        let transaction = Transaction::new(actor_id, scheme_id, service_id, amount, now);
        let tx_id = transaction.id().to_string();

        let mut uow = UnitOfWork::new();
        uow.stage_transaction(transaction.clone());

        // Any error here drops the unit of work: full rollback, the
        // transaction row is never visible without its ledger rows.
        let entries = settle_commission(&self.state, &mut uow, &transaction, now)?;

        self.state.commit(uow);

        self.events.log(Event::TransactionCreated {
            at: now,
            tx_id: tx_id.clone(),
            user_id: actor_id,
            scheme_id,
            service_id,
            amount,
        });
        if entries.is_empty() {
            self.events.log(Event::SettlementSkipped {
                at: now,
                tx_id: tx_id.clone(),
                service_id,
            });
        } else {
            self.events.log(Event::CommissionSettled {
                at: now,
                tx_id: tx_id.clone(),
                entries: entries.len(),
                total_amount: entries.iter().map(|e| e.amount()).sum(),
            });
        }

        Ok((tx_id, entries))
    }

    /// Delete a transaction, cascading to its ledger entries.
    ///
    /// Returns the number of ledger entries removed.
    pub fn delete_transaction(&mut self, tx_id: &str, now: u64) -> Result<usize, PlatformError> {
        let (_, entries_removed) =
            self.state
                .remove_transaction(tx_id)
                .ok_or_else(|| PlatformError::UnknownTransaction {
                    tx_id: tx_id.to_string(),
                })?;
        self.events.log(Event::TransactionDeleted {
            at: now,
            tx_id: tx_id.to_string(),
            entries_removed,
        });
        Ok(entries_removed)
    }

    /// Rebuild a platform from restored parts (snapshot support).
    ///
    /// The audit log is not part of a snapshot and starts empty.
    pub(crate) fn from_parts(
        state: PlatformState,
        next_scheme_id: SchemeId,
        next_user_id: UserId,
        next_service_id: ServiceId,
    ) -> Self {
        Self {
            state,
            events: EventLog::new(),
            next_scheme_id,
            next_user_id,
            next_service_id,
        }
    }

    /// Current id allocation watermarks (snapshot support)
    pub(crate) fn id_watermarks(&self) -> (SchemeId, UserId, ServiceId) {
        (self.next_scheme_id, self.next_user_id, self.next_service_id)
    }
}

//! Event logging for auditing platform activity.
//!
//! This module defines the Event enum which captures all significant state
//! changes on the platform. Events enable:
//! - Auditing (who configured what, what settled where)
//! - Debugging (understand what happened and when)
//! - Analysis (extract commission metrics per transaction or scheme)
//!
//! Events are recorded by the platform layer as operations commit; the
//! commission engine itself stays pure and emits nothing.

use crate::models::role::Role;
use crate::models::{SchemeId, ServiceId, UserId};

/// Platform event capturing a state change.
///
/// All events include a timestamp for temporal ordering. Events are logged
/// in the order they occur.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A scheme was created
    SchemeCreated {
        at: u64,
        scheme_id: SchemeId,
        parent_scheme_id: Option<SchemeId>,
        created_by: UserId,
    },

    /// A user was onboarded
    UserOnboarded {
        at: u64,
        user_id: UserId,
        role: Role,
        parent_user_id: Option<UserId>,
        scheme_id: Option<SchemeId>,
    },

    /// A commission cap record was created or updated
    CommissionConfigured {
        at: u64,
        scheme_id: SchemeId,
        service_id: ServiceId,
        set_by: UserId,
    },

    /// A transaction was created and committed
    TransactionCreated {
        at: u64,
        tx_id: String,
        user_id: UserId,
        scheme_id: SchemeId,
        service_id: ServiceId,
        amount: i64,
    },

    /// Commission was settled for a transaction
    CommissionSettled {
        at: u64,
        tx_id: String,
        entries: usize,
        total_amount: i64,
    },

    /// Settlement produced no ledger entries because no ancestor scheme
    /// configures commission for the service
    SettlementSkipped {
        at: u64,
        tx_id: String,
        service_id: ServiceId,
    },

    /// A transaction and its ledger entries were deleted
    TransactionDeleted {
        at: u64,
        tx_id: String,
        entries_removed: usize,
    },
}

impl Event {
    /// Get the timestamp when this event occurred
    pub fn at(&self) -> u64 {
        match self {
            Event::SchemeCreated { at, .. } => *at,
            Event::UserOnboarded { at, .. } => *at,
            Event::CommissionConfigured { at, .. } => *at,
            Event::TransactionCreated { at, .. } => *at,
            Event::CommissionSettled { at, .. } => *at,
            Event::SettlementSkipped { at, .. } => *at,
            Event::TransactionDeleted { at, .. } => *at,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SchemeCreated { .. } => "SchemeCreated",
            Event::UserOnboarded { .. } => "UserOnboarded",
            Event::CommissionConfigured { .. } => "CommissionConfigured",
            Event::TransactionCreated { .. } => "TransactionCreated",
            Event::CommissionSettled { .. } => "CommissionSettled",
            Event::SettlementSkipped { .. } => "SettlementSkipped",
            Event::TransactionDeleted { .. } => "TransactionDeleted",
        }
    }

    /// Get transaction id if the event relates to a specific transaction
    pub fn tx_id(&self) -> Option<&str> {
        match self {
            Event::TransactionCreated { tx_id, .. } => Some(tx_id),
            Event::CommissionSettled { tx_id, .. } => Some(tx_id),
            Event::SettlementSkipped { tx_id, .. } => Some(tx_id),
            Event::TransactionDeleted { tx_id, .. } => Some(tx_id),
            _ => None,
        }
    }
}

/// Event log for storing and querying platform events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific transaction
    pub fn events_for_tx(&self, tx_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.tx_id() == Some(tx_id))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

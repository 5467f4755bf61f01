//! Service catalog model
//!
//! A service is something a transaction is routed through (mobile recharge,
//! DTH, AEPS, DMT, ...). Commission caps are configured per (scheme,
//! service) pair.

use crate::models::ServiceId;
use serde::{Deserialize, Serialize};

/// A catalog entry for a billable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service identifier
    id: ServiceId,

    /// Category label, e.g. "Recharge" or "Banking"
    category: String,

    /// Stable unique code, e.g. "MOBILE"
    code: String,

    /// Display name
    name: String,
}

impl Service {
    /// Create a new service entry.
    pub fn new(id: ServiceId, category: String, code: String, name: String) -> Self {
        Self {
            id,
            category,
            code,
            name,
        }
    }

    /// Get service id
    pub fn id(&self) -> ServiceId {
        self.id
    }

    /// Get category label
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get unique code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

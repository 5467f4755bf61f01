//! Margin Calculator
//!
//! Converts a per-role *absolute* rate mapping into per-role *margin*
//! earnings. Absolute rates are cumulative ceilings ("RETAILER may earn up
//! to 8% total, of which the DISTRIBUTOR above already claims up to 5%");
//! margins are the non-overlapping share each role actually keeps.
//!
//! For each configured role, ordered most-senior-first by the explicit
//! rank ladder:
//!
//! ```text
//! margin(role) = absolute(role) - absolute(nearest configured junior role)
//! ```
//!
//! with 0 substituted when no junior role is configured. Only strictly
//! positive margins are emitted.
//!
//! A role configured at or below its nearest configured junior earns
//! nothing: that is a data inconsistency introduced at configuration
//! time, not a runtime error.

use crate::models::commission::RoleRates;

/// Convert absolute (cumulative) rates into non-overlapping margins.
///
/// Pure function; the result contains only strictly positive margins.
///
/// For a seniority-consistent configuration (senior rates >= junior
/// rates), the emitted margins sum to the most senior configured absolute
/// rate.
///
/// # Example
/// ```
/// use reseller_core_rs::engine::margins_from_absolute;
/// use reseller_core_rs::{Role, RoleRates};
///
/// let absolute = RoleRates::new()
///     .with(Role::Admin, 10.0)
///     .with(Role::Distributor, 4.0)
///     .with(Role::Retailer, 2.0);
///
/// let margins = margins_from_absolute(&absolute);
/// assert_eq!(margins.get(Role::Admin), Some(6.0));
/// assert_eq!(margins.get(Role::Distributor), Some(2.0));
/// assert_eq!(margins.get(Role::Retailer), Some(2.0));
/// ```
pub fn margins_from_absolute(absolute: &RoleRates) -> RoleRates {
    let configured = absolute.configured(); // most-senior-first
    let mut margins = RoleRates::new();

    for (i, (role, value)) in configured.iter().enumerate() {
        let next_junior = configured.get(i + 1).map(|(_, v)| *v).unwrap_or(0.0);
        let margin = value - next_junior;
        if margin > 0.0 {
            margins.set(*role, margin);
        }
    }

    margins
}

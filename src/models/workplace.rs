//! Workplace model.

use serde::{Deserialize, Serialize};

/// A workplace (store/site) employees check in to.
///
/// Two views of this type exist in a session: the identity's single
/// selected workplace, and - for the owner role only - the full set of
/// owned workplaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workplace {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Check-in geofence radius in meters.
    pub radius_m: f64,
    /// Allowed length of a single break, in minutes.
    pub break_duration_min: u32,
    pub max_break_count: u32,
    pub current_break_count: u32,
    /// Payroll penalty amounts in minor currency units.
    pub late_penalty: i64,
    pub absence_penalty: i64,
    pub overtime_multiplier: f64,
    pub active: bool,
}

//! Panel readings and fleet-wide aggregate metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Power threshold below which a producing panel is flagged as warning (W).
pub const WARNING_POWER_W: f64 = 10.0;

/// Operational status of a single panel.
///
/// Status is a pure function of power: a faulted panel always reports zero
/// power; otherwise panels producing under [`WARNING_POWER_W`] are warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    /// Producing normally
    Normal,
    /// Producing, but below the warning threshold
    Warning,
    /// Fault injected - panel reports zero power
    Fault,
}

impl PanelStatus {
    /// Classify a non-faulted panel from its current power output.
    pub fn from_power(power: f64) -> Self {
        if power < WARNING_POWER_W {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Warning => write!(f, "warning"),
            Self::Fault => write!(f, "fault"),
        }
    }
}

/// One simulated panel's current telemetry.
///
/// Invariant: `current == power / voltage` when `power > 0`, else `0`.
/// Only the tick simulator mutates readings after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelReading {
    /// Fleet-unique identifier, stable for the process lifetime (e.g. "P07")
    pub id: String,
    /// Instantaneous power output in Watts (>= 0)
    pub power: f64,
    /// Terminal voltage in Volts (> 0)
    pub voltage: f64,
    /// Output current in Amps, derived from power and voltage
    pub current: f64,
    /// Panel temperature in Celsius
    pub temperature: f64,
    /// Operational status derived from power
    pub status: PanelStatus,
    /// When this reading was last updated
    pub last_update: DateTime<Utc>,
}

impl PanelReading {
    /// Current derived from the power/voltage invariant.
    pub fn derived_current(power: f64, voltage: f64) -> f64 {
        if power > 0.0 {
            power / voltage
        } else {
            0.0
        }
    }
}

/// Per-status panel counts. Always sums to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelCounts {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub fault: usize,
}

/// Fleet-wide summary derived from a fleet snapshot.
///
/// Never stored - recomputed on demand. Boundary precision: total power is
/// rounded to 2 decimals, the three averages to 1 decimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    /// Sum of panel power in Watts
    pub total_power: f64,
    /// Mean voltage in Volts
    pub avg_voltage: f64,
    /// Mean current in Amps
    pub avg_current: f64,
    /// Mean temperature in Celsius
    pub avg_temperature: f64,
    /// Counts by status
    pub panel_counts: PanelCounts,
}

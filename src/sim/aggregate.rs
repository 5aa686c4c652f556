//! Fleet-wide aggregation.

use crate::sim::FleetState;
use crate::types::{AggregateMetrics, PanelCounts, PanelStatus};

/// Round to `places` decimal digits for the external interface.
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Derive fleet-wide summary metrics from the current fleet state.
///
/// Averages are defined as 0 for an empty fleet. Total power carries 2
/// decimals, the averages 1, matching the external contract.
pub fn summarize(fleet: &FleetState) -> AggregateMetrics {
    let readings = fleet.readings();
    let n = readings.len();

    let mut total_power = 0.0;
    let mut sum_voltage = 0.0;
    let mut sum_current = 0.0;
    let mut sum_temperature = 0.0;
    let mut counts = PanelCounts {
        total: n,
        ..PanelCounts::default()
    };

    for panel in readings {
        total_power += panel.power;
        sum_voltage += panel.voltage;
        sum_current += panel.current;
        sum_temperature += panel.temperature;
        match panel.status {
            PanelStatus::Normal => counts.normal += 1,
            PanelStatus::Warning => counts.warning += 1,
            PanelStatus::Fault => counts.fault += 1,
        }
    }

    // Divide-by-zero guard for the (normally pre-populated) empty fleet.
    let avg = |sum: f64| if n == 0 { 0.0 } else { sum / n as f64 };

    AggregateMetrics {
        total_power: round_to(total_power, 2),
        avg_voltage: round_to(avg(sum_voltage), 1),
        avg_current: round_to(avg(sum_current), 1),
        avg_temperature: round_to(avg(sum_temperature), 1),
        panel_counts: counts,
    }
}

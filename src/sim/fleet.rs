//! Fleet state store and tick simulator.
//!
//! Holds the current readings for N simulated panels and advances them one
//! synthetic interval at a time. Ticks are stateless-random: each tick only
//! depends on the previous tick through the power value, everything else is
//! redrawn (sensor noise, not drift).

use chrono::Utc;
use tracing::debug;

use crate::sim::UniformSource;
use crate::types::{PanelReading, PanelStatus};

/// Default fleet size when none is configured.
pub const DEFAULT_PANEL_COUNT: usize = 30;

/// Per-tick power delta is drawn uniformly from [-5, +5) Watts.
const POWER_DELTA_HALF_RANGE_W: f64 = 5.0;
/// Power is clamped to [0, 60] Watts after applying the delta.
const POWER_MAX_W: f64 = 60.0;
/// Probability per panel per tick of a forced fault (power drops to zero).
const FAULT_PROBABILITY: f64 = 0.05;

// Initial-value draw ranges.
const INITIAL_POWER_MAX_W: f64 = 50.0;
const VOLTAGE_MIN_V: f64 = 30.0;
const VOLTAGE_RANGE_V: f64 = 10.0;
const TEMPERATURE_MIN_C: f64 = 20.0;
const TEMPERATURE_RANGE_C: f64 = 30.0;

/// The fixed-size collection of simulated panels.
///
/// Owned exclusively by the simulation context; only [`initialize`] and
/// [`advance`] mutate it.
///
/// [`initialize`]: FleetState::initialize
/// [`advance`]: FleetState::advance
#[derive(Debug, Default)]
pub struct FleetState {
    panels: Vec<PanelReading>,
}

impl FleetState {
    pub fn new() -> Self {
        Self { panels: Vec::new() }
    }

    /// Populate the fleet with `n` panels carrying randomized plausible
    /// initial values. Idempotent: a second call on a populated store is a
    /// no-op, whatever `n` it is given.
    ///
    /// Draw order per panel: power, voltage, temperature (three draws).
    pub fn initialize(&mut self, n: usize, rng: &mut dyn UniformSource) {
        if !self.panels.is_empty() {
            debug!("Fleet already initialized, ignoring initialize({})", n);
            return;
        }
        let now = Utc::now();
        self.panels.reserve(n);
        for i in 1..=n {
            let power = rng.next_uniform() * INITIAL_POWER_MAX_W;
            let voltage = VOLTAGE_MIN_V + rng.next_uniform() * VOLTAGE_RANGE_V;
            let temperature = TEMPERATURE_MIN_C + rng.next_uniform() * TEMPERATURE_RANGE_C;
            self.panels.push(PanelReading {
                id: format!("P{i:02}"),
                power,
                voltage,
                current: PanelReading::derived_current(power, voltage),
                temperature,
                status: PanelStatus::from_power(power),
                last_update: now,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Borrow the readings for aggregation.
    pub fn readings(&self) -> &[PanelReading] {
        &self.panels
    }

    /// Immutable copy of all readings. Tick application is atomic with
    /// respect to snapshots because both run under the same state lock.
    pub fn snapshot(&self) -> Vec<PanelReading> {
        self.panels.clone()
    }

    /// Advance every panel by one synthetic interval.
    ///
    /// Per panel, in order:
    /// 1. power += uniform [-5, +5), clamped to [0, 60]
    /// 2. with probability 0.05: fault - power forced to 0
    /// 3. else status from the power < 10 warning rule
    /// 4. voltage redrawn uniform [30, 40)
    /// 5. current recomputed from the invariant
    /// 6. temperature redrawn uniform [20, 50)
    /// 7. last_update stamped
    ///
    /// Draw order per panel: delta, fault roll, voltage, temperature
    /// (four draws). Panels are independent; no error conditions.
    pub fn advance(&mut self, rng: &mut dyn UniformSource) {
        let now = Utc::now();
        for panel in &mut self.panels {
            let delta = rng.next_uniform() * (2.0 * POWER_DELTA_HALF_RANGE_W)
                - POWER_DELTA_HALF_RANGE_W;
            panel.power = (panel.power + delta).clamp(0.0, POWER_MAX_W);

            if rng.next_uniform() < FAULT_PROBABILITY {
                panel.power = 0.0;
                panel.status = PanelStatus::Fault;
            } else {
                panel.status = PanelStatus::from_power(panel.power);
            }

            panel.voltage = VOLTAGE_MIN_V + rng.next_uniform() * VOLTAGE_RANGE_V;
            panel.current = PanelReading::derived_current(panel.power, panel.voltage);
            panel.temperature = TEMPERATURE_MIN_C + rng.next_uniform() * TEMPERATURE_RANGE_C;
            panel.last_update = now;
        }
    }
}

//! Recorded solar data records replayed by the playback source.

use serde::{Deserialize, Serialize};

/// One row of previously recorded solar data.
///
/// Immutable once loaded. `id` is the 1-based sequence index assigned at
/// load time; `timestamp` is carried as recorded and restamped with the
/// current wall clock when pushed to stream subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    /// 1-based sequence index within the loaded data set
    pub id: usize,
    /// Recorded timestamp, as found in the source
    pub timestamp: String,
    /// Active power in Watts
    pub power: f64,
    /// Current in Amps
    pub current: f64,
    /// Voltage in Volts
    pub voltage: f64,
    /// Solar irradiance in W/m^2
    pub irradiance: f64,
    /// Ambient temperature in Celsius
    pub temperature: f64,
}

/// A playback record augmented with replay progress.
///
/// `current_index` is the 1-based position of the record just returned, so
/// a 3-record source yields indices 1, 2, 3, then wraps back to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackFrame {
    #[serde(flatten)]
    pub record: PlaybackRecord,
    pub current_index: usize,
    pub total_points: usize,
}

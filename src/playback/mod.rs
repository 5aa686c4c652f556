//! Recorded solar data replay.
//!
//! Loads an ordered CSV of recorded readings once at startup and replays it
//! through an advancing cursor that wraps at the end. Absence of playback
//! data is never fatal: a missing or empty file yields an empty source and
//! the panel simulation runs unaffected.
//!
//! Expected columns (header row required, extra columns ignored):
//! `timestamp, ActivePowerL3, CurrentL3, VoltageL3, IRRADIATION, temp`.
//! Malformed or missing numeric cells normalize to 0.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::types::{PlaybackFrame, PlaybackRecord};

// ============================================================================
// CSV Quote-Aware Parsing
// ============================================================================

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

// ============================================================================
// Column Mapping
// ============================================================================

/// Maps the recorded-data CSV header to column indices.
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    timestamp: Option<usize>,
    power: Option<usize>,
    current: Option<usize>,
    voltage: Option<usize>,
    irradiance: Option<usize>,
    temperature: Option<usize>,
}

impl ColumnMap {
    fn from_header(fields: &[String]) -> Self {
        let mut map = Self::default();
        for (idx, name) in fields.iter().enumerate() {
            match name.trim() {
                "timestamp" => map.timestamp = Some(idx),
                "ActivePowerL3" => map.power = Some(idx),
                "CurrentL3" => map.current = Some(idx),
                "VoltageL3" => map.voltage = Some(idx),
                "IRRADIATION" => map.irradiance = Some(idx),
                "temp" => map.temperature = Some(idx),
                _ => {}
            }
        }
        map
    }
}

/// Parse one numeric cell; malformed or absent cells normalize to 0.
fn numeric_cell(fields: &[String], idx: Option<usize>) -> f64 {
    idx.and_then(|i| fields.get(i))
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

// ============================================================================
// Playback Source
// ============================================================================

/// Ordered, finite sequence of recorded readings with a wrapping cursor.
///
/// Loaded once, read-only thereafter except for cursor advance.
#[derive(Debug, Default)]
pub struct PlaybackSource {
    records: Vec<PlaybackRecord>,
    cursor: usize,
}

impl PlaybackSource {
    /// An empty source: `next_frame()` returns the "no data" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a source from already-parsed records (tests, synthetic data).
    pub fn from_records(records: Vec<PlaybackRecord>) -> Self {
        Self { records, cursor: 0 }
    }

    /// Load recorded data from a CSV file.
    ///
    /// Never fails past this boundary: a missing file, unreadable file, or
    /// file with zero data rows logs a warning and yields an empty source.
    pub fn load(path: &Path) -> Self {
        let source = match Self::parse_file(path) {
            Ok(source) => source,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read playback CSV, continuing without playback data");
                return Self::empty();
            }
        };
        if source.is_empty() {
            warn!(path = %path.display(), "Playback CSV contained no data rows, continuing without playback data");
        } else {
            info!(path = %path.display(), records = source.len(), "Loaded playback data");
        }
        source
    }

    fn parse_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let columns = match lines.next() {
            Some(header) => ColumnMap::from_header(&csv_split(&header?)),
            None => return Ok(Self::empty()),
        };

        let mut records = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = csv_split(&line);
            let timestamp = columns
                .timestamp
                .and_then(|i| fields.get(i))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| Utc::now().to_rfc3339());
            records.push(PlaybackRecord {
                id: records.len() + 1,
                timestamp,
                power: numeric_cell(&fields, columns.power),
                current: numeric_cell(&fields, columns.current),
                voltage: numeric_cell(&fields, columns.voltage),
                irradiance: numeric_cell(&fields, columns.irradiance),
                temperature: numeric_cell(&fields, columns.temperature),
            });
        }
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The 0-based cursor: index of the next record to be returned.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// First `n` records, for the sample endpoint.
    pub fn sample(&self, n: usize) -> &[PlaybackRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Return the record at the cursor augmented with replay progress, then
    /// advance the cursor mod length. Empty source returns `None`.
    pub fn next_frame(&mut self) -> Option<PlaybackFrame> {
        let total = self.records.len();
        if total == 0 {
            return None;
        }
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % total;
        if self.cursor == 0 && total > 1 {
            info!("Reached end of playback data, looping back to start");
        }
        Some(PlaybackFrame {
            record: self.records[index].clone(),
            current_index: index + 1,
            total_points: total,
        })
    }
}

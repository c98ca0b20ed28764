//! Telemetry record construction
//!
//! This module defines the value type sent to the collector and the fixed
//! priority policy that resolves one [`SensorSample`] into a record:
//! - `temperature`: environmental sensor first, contact sensor as fallback
//! - `humidity`: contact sensor first, environmental sensor as fallback
//! - `bodyTemperature`: infrared object temperature only
//!
//! Sources are never averaged. A record always carries at least one value;
//! when every source is absent, [`TelemetryRecord::from_sample`] returns
//! `None` and the cycle produces nothing.

use crate::error::TransportError;
use crate::sensors::SensorSample;
use chrono::Utc;
use serde::Serialize;

/// One timestamped bundle of sensor-derived values for the collector
///
/// Immutable once constructed. Field names mirror the collector's JSON
/// schema; absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    /// Ambient or surface temperature in degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Non-contact object temperature in degrees Celsius
    #[serde(rename = "bodyTemperature")]
    pub body_temperature: Option<f64>,
    /// Stable ASCII node identifier
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// ISO-8601 UTC timestamp, second resolution
    pub timestamp: String,
}

impl TelemetryRecord {
    /// Resolve a sampling cycle into a record, timestamped now
    ///
    /// Returns `None` when all three outputs would be absent; the caller
    /// must not invoke delivery in that case.
    pub fn from_sample(sample: &SensorSample, device_id: &str) -> Option<Self> {
        let temperature = sample
            .environmental
            .map(|e| e.temperature)
            .or_else(|| sample.contact.map(|c| c.temperature));
        let humidity = sample
            .contact
            .map(|c| c.humidity)
            .or_else(|| sample.environmental.map(|e| e.humidity));
        let body_temperature = sample.infrared.map(|i| i.object);

        if temperature.is_none() && humidity.is_none() && body_temperature.is_none() {
            return None;
        }

        Some(Self {
            temperature,
            humidity,
            body_temperature,
            device_id: device_id.to_string(),
            timestamp: now_iso8601(),
        })
    }

    /// Replace the timestamp (deterministic fixtures)
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Serialize to the collector wire body
    pub fn to_json(&self) -> Result<String, TransportError> {
        serde_json::to_string(self).map_err(|e| TransportError::Serialize {
            reason: e.to_string(),
        })
    }
}

/// Current UTC time as ISO-8601 with second resolution
fn now_iso8601() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

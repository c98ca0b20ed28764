//! Error types for criblink
//!
//! This module defines all error types used throughout the library.
//! Everything below [`TelemetryError::Fatal`] is absorbed by the pipeline
//! and converted into buffering or retry behavior; only fatal conditions
//! ever stop the sampling loop.

use thiserror::Error;

/// Result type alias for criblink operations
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for criblink operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    /// Bus-level I/O failure while reading a sensor
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// Transport-level failure while delivering a record
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Unexpected unrecoverable condition; the operator restarts the
    /// node and buffered records are lost
    #[error("Fatal: {0}")]
    Fatal(String),
}

/// Errors at the two-wire bus boundary
///
/// Sensor collaborators report these; the [`SensorHub`](crate::SensorHub)
/// converts them to absent readings rather than propagating them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BusError {
    /// No device acknowledged at the given address
    #[error("No device at address 0x{address:02x}")]
    NoDevice { address: u8 },

    /// Transaction started but did not complete in time
    #[error("Bus timeout at address 0x{address:02x} after {timeout_ms}ms")]
    Timeout { address: u8, timeout_ms: u64 },

    /// Device responded with an unusable payload
    #[error("Invalid response from 0x{address:02x}: {reason}")]
    InvalidResponse { address: u8, reason: String },
}

/// Errors while sending a record to the collector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Collector answered with a status other than 201 Created
    #[error("Unexpected status {status} from collector")]
    UnexpectedStatus { status: u16 },

    /// Round trip failed below the HTTP layer
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// Record could not be serialized for the wire
    #[error("Serialization failed: {reason}")]
    Serialize { reason: String },
}

//! # Criblink - Offline-Resilient Sensor Telemetry
//!
//! The telemetry core of a crib-monitoring node: sample three environmental
//! sensors, resolve the readings into one record, and deliver it to a remote
//! collector over an intermittent wireless link without losing data while
//! the link is down.
//!
//! ## Key Properties
//!
//! - **Bounded buffering**: a fixed-capacity ring buffer absorbs records
//!   while offline, sacrificing the oldest data first
//! - **Ordered drainage**: buffered records drain oldest-first ahead of the
//!   live record once connectivity returns
//! - **Re-push-and-stop**: the first failed drain send re-buffers everything
//!   still pending, in order, and yields until the next cycle
//! - **Absorbing faults**: sensor and send failures become absent readings
//!   and buffered records, never loop-stopping errors
//!
//! ## Quick Start
//!
//! ```rust
//! use criblink::{
//!     ContactReading, DeliveryEngine, MemoryConnectivity, MemoryTransport, RingBuffer,
//!     SensorSample, TelemetryRecord,
//! };
//! use std::time::Duration;
//!
//! let sample = SensorSample {
//!     contact: Some(ContactReading { temperature: 21.0, humidity: 48.0 }),
//!     ..Default::default()
//! };
//! let record = TelemetryRecord::from_sample(&sample, "crib-node-01").unwrap();
//!
//! // The link is down: the engine buffers instead of sending
//! let mut engine = DeliveryEngine::with_pacing(RingBuffer::new(50), Duration::ZERO);
//! let mut link = MemoryConnectivity::new(false);
//! let mut transport = MemoryTransport::new();
//! engine.deliver(record, &mut link, &mut transport);
//! assert_eq!(engine.pending(), 1);
//! assert_eq!(transport.sent_count(), 0);
//!
//! // Link restored: the buffered record drains ahead of the live one
//! link.up = true;
//! let live = TelemetryRecord::from_sample(&sample, "crib-node-01").unwrap();
//! engine.deliver(live, &mut link, &mut transport);
//! assert_eq!(transport.sent_count(), 2);
//! assert_eq!(engine.pending(), 0);
//! ```
//!
//! ## Modules
//!
//! - [`sensors`]: sensor collaborator traits and the sampling façade
//! - [`record`]: telemetry record and priority resolution
//! - [`buffer`]: bounded overwrite-oldest ring buffer
//! - [`delivery`]: connectivity-aware ordered delivery engine
//! - [`transport`]: collector transport (HTTP and in-memory)
//! - [`config`]: node configuration surface
//! - [`pipeline`]: the timer-driven sample-format-deliver loop

// Modules
pub mod buffer;
pub mod config;
pub mod delivery;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod sensors;
pub mod transport;

// Re-exports for convenient access
pub use buffer::RingBuffer;
pub use config::NodeConfig;
pub use delivery::{DeliveryEngine, DeliveryStatus};
pub use error::{BusError, Result, TelemetryError, TransportError};
pub use pipeline::{CycleOutcome, Pipeline};
pub use record::TelemetryRecord;
pub use sensors::{
    ContactReading, ContactSensor, EnvironmentalReading, EnvironmentalSensor, I2cBus,
    InfraredReading, InfraredSensor, SensorHub, SensorSample,
};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{Connectivity, MemoryConnectivity, MemoryTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default ring buffer capacity in records
pub const DEFAULT_BUFFER_CAPACITY: usize = 50;

/// Default pause between consecutive drained sends, in milliseconds
pub const DRAIN_PACING_MS: u64 = 500;

/// Default collector round-trip timeout, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_defaults_are_consistent() {
        let config = NodeConfig::default();
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(config.drain_pacing.as_millis() as u64, DRAIN_PACING_MS);
        assert_eq!(config.http_timeout.as_secs(), DEFAULT_HTTP_TIMEOUT_SECS);
    }
}

// Criblink - Offline-resilient sensor telemetry core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Delivery engine
//!
//! Orchestrates one delivery attempt per sampling cycle: connectivity
//! check, ordered buffer drain, then the live record. Anything that cannot
//! be sent goes back into the buffer in its original relative order, and a
//! failed drain stops immediately rather than hammering a link that just
//! proved degraded. Broader retry happens naturally on the next cycle.

use crate::buffer::RingBuffer;
use crate::record::TelemetryRecord;
use crate::transport::{Connectivity, Transport};
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

/// Outcome of one [`DeliveryEngine::deliver`] call, describing the live record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The live record reached the collector
    Sent,
    /// Link down; the record was buffered without any transport call
    BufferedOffline,
    /// The send failed; the record was buffered for a later cycle
    BufferedAfterFailure,
}

impl DeliveryStatus {
    /// True when the live record was buffered instead of delivered
    pub fn is_buffered(&self) -> bool {
        matches!(self, Self::BufferedOffline | Self::BufferedAfterFailure)
    }
}

/// Orchestrates buffering and ordered delivery of telemetry records
///
/// The engine exclusively owns the ring buffer; nothing else ever touches
/// it. Connectivity and transport are collaborators handed in per call so
/// the engine itself stays free of link state.
pub struct DeliveryEngine {
    buffer: RingBuffer<TelemetryRecord>,
    /// Pause between consecutive drained sends, respecting collector rate
    /// limits
    drain_pacing: Duration,
}

impl DeliveryEngine {
    /// Create an engine owning the given buffer, with default pacing
    pub fn new(buffer: RingBuffer<TelemetryRecord>) -> Self {
        Self::with_pacing(buffer, Duration::from_millis(crate::DRAIN_PACING_MS))
    }

    /// Create an engine with custom drain pacing (zero disables it)
    pub fn with_pacing(buffer: RingBuffer<TelemetryRecord>, drain_pacing: Duration) -> Self {
        Self {
            buffer,
            drain_pacing,
        }
    }

    /// Number of records waiting in the buffer
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Deliver one freshly built record
    ///
    /// With the link down the record is buffered and no transport call is
    /// made. Otherwise the buffer drains oldest-first through the
    /// transport; on the first drain failure the failed record and every
    /// remaining one are re-buffered in order and draining stops. The live
    /// record is attempted regardless of how the drain went.
    pub fn deliver(
        &mut self,
        record: TelemetryRecord,
        connectivity: &mut dyn Connectivity,
        transport: &mut dyn Transport,
    ) -> DeliveryStatus {
        if !connectivity.is_connected() {
            self.buffer.push(record);
            debug!("link down, buffered record ({} pending)", self.buffer.len());
            return DeliveryStatus::BufferedOffline;
        }

        if !self.buffer.is_empty() {
            self.drain_buffer(transport);
        }

        match transport.send(&record) {
            Ok(()) => {
                debug!("live record sent");
                DeliveryStatus::Sent
            }
            Err(e) => {
                warn!("live send failed, buffering: {}", e);
                self.buffer.push(record);
                DeliveryStatus::BufferedAfterFailure
            }
        }
    }

    /// Send buffered records oldest-first until one fails
    fn drain_buffer(&mut self, transport: &mut dyn Transport) {
        let mut drained: VecDeque<TelemetryRecord> = self.buffer.drain_all().into();
        let total = drained.len();
        let mut sent = 0usize;

        while let Some(item) = drained.pop_front() {
            match transport.send(&item) {
                Ok(()) => {
                    sent += 1;
                    if !self.drain_pacing.is_zero() {
                        thread::sleep(self.drain_pacing);
                    }
                }
                Err(e) => {
                    // Re-buffer the failed record and everything behind it,
                    // keeping relative order; the link just proved flaky, so
                    // stop instead of reordering on further retries.
                    warn!(
                        "drain stopped after {}/{} records: {}",
                        sent, total, e
                    );
                    self.buffer.push(item);
                    for rest in drained.drain(..) {
                        self.buffer.push(rest);
                    }
                    return;
                }
            }
        }

        info!("drained {} buffered records", total);
    }
}

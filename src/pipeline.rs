// Criblink - Offline-resilient sensor telemetry core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Sampling pipeline
//!
//! The fixed-period cycle that ties the layers together: sample the
//! sensors, resolve a record, hand it to the delivery engine. One cycle
//! runs to completion before the next begins; the only cancellation point
//! is the shutdown flag checked between cycles. Sensor faults and send
//! failures are absorbed below this level; only fatal conditions stop the
//! loop.

use crate::buffer::RingBuffer;
use crate::config::NodeConfig;
use crate::delivery::{DeliveryEngine, DeliveryStatus};
use crate::error::Result;
use crate::record::TelemetryRecord;
use crate::sensors::SensorHub;
use crate::transport::{Connectivity, Transport};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of the shutdown check while idling between cycles
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// Outcome of one sampling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every source was absent; nothing was built and delivery was not
    /// invoked
    NoRecord,
    /// A record was built and handed to the delivery engine
    Delivered(DeliveryStatus),
}

/// Timer-driven sample-format-deliver loop
///
/// Owns the sensor hub, the delivery engine (and through it the ring
/// buffer), and the link collaborators. Single thread of control; nothing
/// here needs locking.
pub struct Pipeline<C: Connectivity, T: Transport> {
    config: NodeConfig,
    hub: SensorHub,
    engine: DeliveryEngine,
    connectivity: C,
    transport: T,
}

impl<C: Connectivity, T: Transport> Pipeline<C, T> {
    /// Assemble a pipeline from its collaborators
    ///
    /// The ring buffer is created here with the configured capacity and
    /// handed to the delivery engine as its sole owner.
    pub fn new(config: NodeConfig, hub: SensorHub, connectivity: C, transport: T) -> Self {
        let buffer = RingBuffer::new(config.buffer_capacity);
        let engine = DeliveryEngine::with_pacing(buffer, config.drain_pacing);
        Self {
            config,
            hub,
            engine,
            connectivity,
            transport,
        }
    }

    /// Run one sample-format-deliver cycle
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let sample = self.hub.sample();
        match TelemetryRecord::from_sample(&sample, &self.config.device_id) {
            None => {
                debug!("no source produced a reading this cycle");
                CycleOutcome::NoRecord
            }
            Some(record) => {
                let status =
                    self.engine
                        .deliver(record, &mut self.connectivity, &mut self.transport);
                CycleOutcome::Delivered(status)
            }
        }
    }

    /// Run cycles at the configured interval until `shutdown` is set
    ///
    /// A cycle in progress always runs to completion. On exit, any records
    /// still buffered are reported to the operator before being lost with
    /// the process.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        info!(
            "telemetry loop started, interval {:?}, buffer capacity {}",
            self.config.send_interval, self.config.buffer_capacity
        );

        while !shutdown.load(Ordering::SeqCst) {
            self.run_cycle();
            self.idle(shutdown);
        }

        let pending = self.engine.pending();
        if pending > 0 {
            warn!(
                "shutting down with {} buffered records; they are not persisted and will be lost",
                pending
            );
        }
        info!("telemetry loop stopped");
        Ok(())
    }

    /// Records currently waiting in the buffer
    pub fn pending(&self) -> usize {
        self.engine.pending()
    }

    /// The transport collaborator
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport collaborator
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Mutable access to the connectivity collaborator
    pub fn connectivity_mut(&mut self) -> &mut C {
        &mut self.connectivity
    }

    /// Wait out the send interval, waking early on shutdown
    fn idle(&self, shutdown: &AtomicBool) {
        let deadline = Instant::now() + self.config.send_interval;
        while Instant::now() < deadline {
            if shutdown.load(Ordering::SeqCst) {
                return;
            }
            thread::sleep(SHUTDOWN_POLL.min(self.config.send_interval));
        }
    }
}

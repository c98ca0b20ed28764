//! End-to-end tests for the telemetry pipeline
//!
//! Drives the public API the way the firmware shell does: a sensor hub
//! with scripted drivers, the delivery engine with in-memory link and
//! transport doubles, and outage/recovery sequences across cycles.

use criblink::*;
use std::time::Duration;

struct ScriptedContact {
    readings: Vec<Option<ContactReading>>,
}

impl ScriptedContact {
    fn always(temperature: f64, humidity: f64) -> Self {
        Self {
            readings: vec![Some(ContactReading {
                temperature,
                humidity,
            })],
        }
    }
}

impl ContactSensor for ScriptedContact {
    fn read(&mut self) -> Result<ContactReading, BusError> {
        let next = if self.readings.len() > 1 {
            self.readings.remove(0)
        } else {
            self.readings[0]
        };
        next.ok_or(BusError::Timeout {
            address: 0x00,
            timeout_ms: 100,
        })
    }
}

struct ScriptedEnvironmental {
    reading: Option<EnvironmentalReading>,
}

impl EnvironmentalSensor for ScriptedEnvironmental {
    fn read(&mut self) -> Result<EnvironmentalReading, BusError> {
        self.reading.ok_or(BusError::NoDevice {
            address: sensors::ENV_ADDR_PRIMARY,
        })
    }
}

struct ScriptedInfrared {
    reading: Option<InfraredReading>,
}

impl InfraredSensor for ScriptedInfrared {
    fn read(&mut self) -> Result<InfraredReading, BusError> {
        self.reading.ok_or(BusError::NoDevice {
            address: sensors::IR_ADDR,
        })
    }
}

fn config() -> NodeConfig {
    NodeConfig {
        drain_pacing: Duration::ZERO,
        ..NodeConfig::with_device_id("itest-node")
    }
}

fn full_hub() -> SensorHub {
    SensorHub::new()
        .with_contact(ScriptedContact::always(21.0, 55.0))
        .with_environmental(ScriptedEnvironmental {
            reading: Some(EnvironmentalReading {
                temperature: 20.0,
                humidity: 42.0,
                pressure: 1013.0,
            }),
        })
        .with_infrared(ScriptedInfrared {
            reading: Some(InfraredReading {
                ambient: 23.0,
                object: 36.6,
            }),
        })
}

#[test]
fn resolution_prefers_environmental_temperature_and_contact_humidity() {
    let mut pipeline = Pipeline::new(
        config(),
        full_hub(),
        MemoryConnectivity::new(true),
        MemoryTransport::new(),
    );

    let outcome = pipeline.run_cycle();
    assert_eq!(outcome, CycleOutcome::Delivered(DeliveryStatus::Sent));

    let record = &pipeline.transport().sent()[0];
    assert_eq!(record.temperature, Some(20.0));
    assert_eq!(record.humidity, Some(55.0));
    assert_eq!(record.body_temperature, Some(36.6));
    assert_eq!(record.device_id, "itest-node");
}

#[test]
fn dead_hub_never_invokes_delivery() {
    let hub = SensorHub::new()
        .with_contact(ScriptedContact {
            readings: vec![None],
        })
        .with_environmental(ScriptedEnvironmental { reading: None })
        .with_infrared(ScriptedInfrared { reading: None });
    let mut pipeline = Pipeline::new(
        config(),
        hub,
        MemoryConnectivity::new(true),
        MemoryTransport::new(),
    );

    for _ in 0..3 {
        assert_eq!(pipeline.run_cycle(), CycleOutcome::NoRecord);
    }
    assert_eq!(pipeline.transport().sent_count(), 0);
    assert_eq!(pipeline.pending(), 0);
}

#[test]
fn outage_then_recovery_preserves_order() {
    let mut pipeline = Pipeline::new(
        config(),
        full_hub(),
        MemoryConnectivity::new(true),
        MemoryTransport::new(),
    );

    // One clean cycle, then a four-cycle outage, then recovery.
    assert_eq!(
        pipeline.run_cycle(),
        CycleOutcome::Delivered(DeliveryStatus::Sent)
    );

    pipeline.connectivity_mut().up = false;
    for _ in 0..4 {
        assert_eq!(
            pipeline.run_cycle(),
            CycleOutcome::Delivered(DeliveryStatus::BufferedOffline)
        );
    }
    assert_eq!(pipeline.pending(), 4);
    assert_eq!(pipeline.transport().sent_count(), 1);

    pipeline.connectivity_mut().up = true;
    assert_eq!(
        pipeline.run_cycle(),
        CycleOutcome::Delivered(DeliveryStatus::Sent)
    );

    // 1 pre-outage + 4 drained + 1 live
    assert_eq!(pipeline.transport().sent_count(), 6);
    assert_eq!(pipeline.pending(), 0);
}

#[test]
fn long_outage_overwrites_oldest_records() {
    let mut pipeline = Pipeline::new(
        NodeConfig {
            buffer_capacity: 3,
            drain_pacing: Duration::ZERO,
            ..NodeConfig::with_device_id("itest-node")
        },
        full_hub(),
        MemoryConnectivity::new(false),
        MemoryTransport::new(),
    );

    // Five offline cycles against a capacity-3 buffer
    for _ in 0..5 {
        pipeline.run_cycle();
    }
    assert_eq!(pipeline.pending(), 3);

    pipeline.connectivity_mut().up = true;
    pipeline.run_cycle();

    // 3 survivors drained plus the live record; the two oldest are gone
    assert_eq!(pipeline.transport().sent_count(), 4);
}

#[test]
fn flaky_recovery_rebuffers_and_finishes_next_cycle() {
    let mut pipeline = Pipeline::new(
        config(),
        full_hub(),
        MemoryConnectivity::new(false),
        MemoryTransport::new(),
    );

    for _ in 0..3 {
        pipeline.run_cycle();
    }

    // First drained send fails; everything re-buffers, the live record
    // still goes out.
    pipeline.connectivity_mut().up = true;
    pipeline.transport_mut().fail_next();
    assert_eq!(
        pipeline.run_cycle(),
        CycleOutcome::Delivered(DeliveryStatus::Sent)
    );
    assert_eq!(pipeline.pending(), 3);
    assert_eq!(pipeline.transport().sent_count(), 1);

    // A stable cycle clears the backlog in order.
    assert_eq!(
        pipeline.run_cycle(),
        CycleOutcome::Delivered(DeliveryStatus::Sent)
    );
    assert_eq!(pipeline.pending(), 0);
    assert_eq!(pipeline.transport().sent_count(), 5);
}

#[test]
fn wire_body_matches_collector_schema() {
    let mut pipeline = Pipeline::new(
        config(),
        full_hub(),
        MemoryConnectivity::new(true),
        MemoryTransport::new(),
    );
    pipeline.run_cycle();

    let json = pipeline.transport().sent()[0].to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["temperature"], 20.0);
    assert_eq!(value["humidity"], 55.0);
    assert_eq!(value["bodyTemperature"], 36.6);
    assert_eq!(value["deviceId"], "itest-node");
    assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(value.get("pressure").is_none());
}

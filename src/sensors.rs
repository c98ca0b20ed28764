// Criblink - Offline-resilient sensor telemetry core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Sensor collaborator boundary
//!
//! This module defines the seam between the telemetry core and the three
//! hardware sensor drivers: a contact temperature/humidity sensor on a
//! GPIO-timed pulse protocol, a non-contact infrared thermometer, and a
//! digital environmental sensor, the latter two on the shared two-wire bus.
//!
//! Register decoding and compensation arithmetic live with the drivers, not
//! here. The core only sees typed readings, and a driver that cannot produce
//! one reports a [`BusError`] that the [`SensorHub`] turns into an absent
//! reading for that cycle.

use crate::error::BusError;
use log::{debug, warn};

/// Primary two-wire address of the environmental sensor (SDO low)
pub const ENV_ADDR_PRIMARY: u8 = 0x76;

/// Secondary two-wire address of the environmental sensor (SDO high)
pub const ENV_ADDR_SECONDARY: u8 = 0x77;

/// Two-wire address of the infrared thermometer
pub const IR_ADDR: u8 = 0x5A;

/// Raw register access on the shared two-wire bus
///
/// Consumed by the sensor drivers, never by the core itself. Calls are
/// synchronous with collaborator-bounded latency.
pub trait I2cBus {
    /// Read `len` bytes starting at `register` from the device at the
    /// given 7-bit address.
    fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        len: usize,
    ) -> Result<Vec<u8>, BusError>;
}

/// One reading from the contact temperature/humidity sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactReading {
    /// Ambient temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

/// One reading from the infrared thermometer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfraredReading {
    /// Die-ambient temperature in degrees Celsius
    pub ambient: f64,
    /// Non-contact object temperature in degrees Celsius
    pub object: f64,
}

/// One reading from the digital environmental sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentalReading {
    /// Ambient temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Barometric pressure in hPa; diagnostic only, never serialized
    pub pressure: f64,
}

/// Contact temperature/humidity sensor driver
pub trait ContactSensor {
    /// Perform one measurement cycle
    fn read(&mut self) -> Result<ContactReading, BusError>;
}

/// Infrared thermometer driver
pub trait InfraredSensor {
    /// Read ambient and object temperature
    fn read(&mut self) -> Result<InfraredReading, BusError>;
}

/// Environmental sensor driver
pub trait EnvironmentalSensor {
    /// Read temperature, humidity and pressure
    fn read(&mut self) -> Result<EnvironmentalReading, BusError>;
}

/// The optional readings gathered in one sampling cycle
///
/// Each source fails independently; an absent reading is a normal state,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSample {
    /// Contact sensor output, if the read succeeded
    pub contact: Option<ContactReading>,
    /// Infrared thermometer output, if the read succeeded
    pub infrared: Option<InfraredReading>,
    /// Environmental sensor output, if the read succeeded
    pub environmental: Option<EnvironmentalReading>,
}

impl SensorSample {
    /// True when no source produced a reading this cycle
    pub fn is_empty(&self) -> bool {
        self.contact.is_none() && self.infrared.is_none() && self.environmental.is_none()
    }
}

/// Façade over the attached sensors
///
/// Each slot is optional: a sensor whose driver failed to initialize is
/// simply never attached, matching how the node boots with whatever
/// hardware answers on the bus. Read failures are absorbed here and
/// reported as absent readings.
#[derive(Default)]
pub struct SensorHub {
    contact: Option<Box<dyn ContactSensor>>,
    infrared: Option<Box<dyn InfraredSensor>>,
    environmental: Option<Box<dyn EnvironmentalSensor>>,
}

impl SensorHub {
    /// Create a hub with no sensors attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a contact sensor driver
    pub fn with_contact(mut self, sensor: impl ContactSensor + 'static) -> Self {
        self.contact = Some(Box::new(sensor));
        self
    }

    /// Attach an infrared thermometer driver
    pub fn with_infrared(mut self, sensor: impl InfraredSensor + 'static) -> Self {
        self.infrared = Some(Box::new(sensor));
        self
    }

    /// Attach an environmental sensor driver
    pub fn with_environmental(mut self, sensor: impl EnvironmentalSensor + 'static) -> Self {
        self.environmental = Some(Box::new(sensor));
        self
    }

    /// Read every attached sensor once
    ///
    /// A bus fault on one source is logged and converted to an absent
    /// reading; it never affects the other sources and never propagates.
    pub fn sample(&mut self) -> SensorSample {
        let contact = match self.contact.as_mut().map(|s| s.read()) {
            Some(Ok(reading)) => Some(reading),
            Some(Err(e)) => {
                warn!("contact sensor read failed: {}", e);
                None
            }
            None => None,
        };

        let infrared = match self.infrared.as_mut().map(|s| s.read()) {
            Some(Ok(reading)) => Some(reading),
            Some(Err(e)) => {
                warn!("infrared sensor read failed: {}", e);
                None
            }
            None => None,
        };

        let environmental = match self.environmental.as_mut().map(|s| s.read()) {
            Some(Ok(reading)) => Some(reading),
            Some(Err(e)) => {
                warn!("environmental sensor read failed: {}", e);
                None
            }
            None => None,
        };

        let sample = SensorSample {
            contact,
            infrared,
            environmental,
        };
        debug!(
            "sampled sensors: contact={} infrared={} environmental={}",
            sample.contact.is_some(),
            sample.infrared.is_some(),
            sample.environmental.is_some()
        );
        sample
    }
}

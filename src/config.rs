// Criblink - Offline-resilient sensor telemetry core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Node configuration
//!
//! The full option surface of a telemetry node. The core only reads the
//! fields it needs (device id, intervals, buffer capacity, collector
//! address); link credentials, retry knobs and the NTP server are carried
//! for the firmware shell and its collaborators. Nothing here is validated
//! beyond being present.

use std::time::Duration;

/// Configuration for one telemetry node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// WiFi network name (link-layer collaborator)
    pub wifi_ssid: String,
    /// WiFi password (link-layer collaborator)
    pub wifi_password: String,
    /// Collector base URL, e.g. `http://192.168.1.100:3000`
    pub server_url: String,
    /// Collector endpoint path
    pub api_endpoint: String,
    /// Stable ASCII device identifier
    pub device_id: String,
    /// Pause between sampling cycles
    pub send_interval: Duration,
    /// Ring buffer capacity in records
    pub buffer_capacity: usize,
    /// HTTP retry attempts (consumed by the firmware shell, not the core;
    /// the transport itself does one round trip per call)
    pub retry_attempts: u32,
    /// Delay between HTTP retry attempts
    pub retry_delay: Duration,
    /// WiFi association timeout
    pub wifi_timeout: Duration,
    /// WiFi association attempts at boot
    pub wifi_retry_attempts: u32,
    /// Delay between WiFi association attempts
    pub wifi_retry_delay: Duration,
    /// NTP server for clock sync at boot
    pub ntp_server: String,
    /// Collector round-trip timeout
    pub http_timeout: Duration,
    /// Pause between consecutive drained sends
    pub drain_pacing: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            server_url: "http://192.168.1.100:3000".to_string(),
            api_endpoint: "/api/sensors".to_string(),
            device_id: "crib-node-01".to_string(),
            send_interval: Duration::from_secs(5),
            buffer_capacity: crate::DEFAULT_BUFFER_CAPACITY, // ~4 minutes of offline data
            retry_attempts: 3,
            retry_delay: Duration::from_secs(2),
            wifi_timeout: Duration::from_secs(10),
            wifi_retry_attempts: 3,
            wifi_retry_delay: Duration::from_secs(2),
            ntp_server: "pool.ntp.org".to_string(),
            http_timeout: Duration::from_secs(crate::DEFAULT_HTTP_TIMEOUT_SECS),
            drain_pacing: Duration::from_millis(crate::DRAIN_PACING_MS),
        }
    }
}

impl NodeConfig {
    /// Configuration with a specific device identifier
    pub fn with_device_id(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Default::default()
        }
    }

    /// Configuration pointing at a specific collector
    pub fn with_collector(server_url: impl Into<String>, api_endpoint: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_endpoint: api_endpoint.into(),
            ..Default::default()
        }
    }

    /// Configuration with a custom buffer capacity
    pub fn with_buffer_capacity(buffer_capacity: usize) -> Self {
        Self {
            buffer_capacity,
            ..Default::default()
        }
    }
}

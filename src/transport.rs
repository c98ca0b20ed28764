// Criblink - Offline-resilient sensor telemetry core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Link and collector boundary
//!
//! This module provides the traits the delivery engine consumes and two
//! implementations: [`HttpTransport`] for the real collector endpoint, and
//! in-memory doubles for tests and local runs.

use crate::error::TransportError;
use crate::record::TelemetryRecord;
use std::collections::VecDeque;

#[cfg(feature = "http")]
use std::time::Duration;

/// Link-layer connectivity state
///
/// Implementations reconnect internally if needed and may block up to
/// their configured timeout. Association and credential handling live
/// with the implementation, not the core.
pub trait Connectivity {
    /// Check whether the wireless link is usable right now
    fn is_connected(&mut self) -> bool;
}

/// One atomic send-and-acknowledge round trip to the collector
pub trait Transport {
    /// Deliver a single record
    ///
    /// Any non-success response or transport-level error is a failure;
    /// the underlying connection resource is released on every exit path.
    fn send(&mut self, record: &TelemetryRecord) -> Result<(), TransportError>;
}

/// HTTP collector client
///
/// Posts the record as JSON to `<server_url><endpoint_path>` and treats
/// HTTP 201 as the only success status. Exactly one bounded round trip
/// per call; retry across cycles comes from the engine's re-buffering.
#[cfg(feature = "http")]
pub struct HttpTransport {
    agent: ureq::Agent,
    url: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a transport with the default 10 s round-trip timeout
    pub fn new(server_url: &str, endpoint_path: &str) -> Self {
        Self::with_timeout(
            server_url,
            endpoint_path,
            Duration::from_secs(crate::DEFAULT_HTTP_TIMEOUT_SECS),
        )
    }

    /// Create a transport with a custom round-trip timeout
    pub fn with_timeout(server_url: &str, endpoint_path: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: format!("{}{}", server_url, endpoint_path),
        }
    }

    /// Create a transport from the node configuration
    pub fn from_config(config: &crate::config::NodeConfig) -> Self {
        Self::with_timeout(&config.server_url, &config.api_endpoint, config.http_timeout)
    }

    /// Full collector URL this transport posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn send(&mut self, record: &TelemetryRecord) -> Result<(), TransportError> {
        let body = record.to_json()?;
        let result = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body);

        match result {
            Ok(response) => {
                let status = response.status();
                // Drain the body so the connection goes back to the pool
                let _ = response.into_string();
                if status == 201 {
                    Ok(())
                } else {
                    Err(TransportError::UnexpectedStatus { status })
                }
            }
            Err(ureq::Error::Status(status, response)) => {
                let _ = response.into_string();
                Err(TransportError::UnexpectedStatus { status })
            }
            Err(e) => Err(TransportError::Network {
                reason: e.to_string(),
            }),
        }
    }
}

/// Scriptable in-memory connectivity state
#[derive(Debug, Clone)]
pub struct MemoryConnectivity {
    /// Whether the simulated link is up
    pub up: bool,
}

impl MemoryConnectivity {
    /// Create with the given initial link state
    pub fn new(up: bool) -> Self {
        Self { up }
    }
}

impl Connectivity for MemoryConnectivity {
    fn is_connected(&mut self) -> bool {
        self.up
    }
}

/// In-memory transport for testing and local runs
///
/// Successful sends are recorded in order. Outcomes can be scripted per
/// call; once the script runs out, every send succeeds.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Vec<TelemetryRecord>,
    outcomes: VecDeque<Result<(), TransportError>>,
}

impl MemoryTransport {
    /// Create a transport where every send succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next unscripted send
    pub fn script(&mut self, outcome: Result<(), TransportError>) {
        self.outcomes.push_back(outcome);
    }

    /// Queue a generic network failure for the next unscripted send
    pub fn fail_next(&mut self) {
        self.script(Err(TransportError::Network {
            reason: "scripted failure".to_string(),
        }));
    }

    /// Records delivered so far, in send order
    pub fn sent(&self) -> &[TelemetryRecord] {
        &self.sent
    }

    /// Number of send calls that succeeded
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, record: &TelemetryRecord) -> Result<(), TransportError> {
        if let Some(outcome) = self.outcomes.pop_front() {
            outcome?;
        }
        self.sent.push(record.clone());
        Ok(())
    }
}

//! The Hub client handle.
//!
//! [`HubClient`] bundles the transport with the two external collaborators
//! (permission gate and telemetry sink). Operations are defined in the
//! resolver, components, session, and telemetry modules; they all go through
//! this handle.

use crate::telemetry::{NullTelemetrySink, TelemetrySink};
use crate::traits::{OpenPermissionGate, PermissionGate};
use crate::transport::{HttpExchange, HubTransport, ReqwestExchange};
use hublens_core::{HubConfig, HubResult};
use std::sync::Arc;

/// Client façade over the Hub REST API.
///
/// Cheap to clone; clones share the exchange, its cookie store, and the
/// collaborators.
#[derive(Clone)]
pub struct HubClient {
    transport: HubTransport,
    permissions: Arc<dyn PermissionGate>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl HubClient {
    /// Creates a client with the reqwest exchange and default collaborators
    /// (every permission granted, telemetry dropped).
    pub fn new(config: HubConfig) -> HubResult<Self> {
        let exchange = Arc::new(ReqwestExchange::new(&config)?);
        Ok(Self::with_exchange(config, exchange))
    }

    /// Creates a client over a custom exchange.
    pub fn with_exchange(config: HubConfig, exchange: Arc<dyn HttpExchange>) -> Self {
        Self {
            transport: HubTransport::new(exchange, config),
            permissions: Arc::new(OpenPermissionGate),
            telemetry: Arc::new(NullTelemetrySink),
        }
    }

    /// Replaces the permission gate.
    pub fn with_permission_gate(mut self, gate: Arc<dyn PermissionGate>) -> Self {
        self.permissions = gate;
        self
    }

    /// Replaces the telemetry sink.
    pub fn with_telemetry_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    pub fn transport(&self) -> &HubTransport {
        &self.transport
    }

    pub fn config(&self) -> &HubConfig {
        self.transport.config()
    }

    pub(crate) fn permissions(&self) -> &dyn PermissionGate {
        self.permissions.as_ref()
    }

    pub(crate) fn telemetry(&self) -> &dyn TelemetrySink {
        self.telemetry.as_ref()
    }
}

//! Telemetry emission.
//!
//! The client assembles a registration/version-stamped payload and hands it
//! to a sink; delivery is the sink's problem and is never awaited or
//! checked. Both metadata fetches are soft: a payload with `<unknown>`
//! placeholders still goes out, because telemetry must never break the host.

use crate::client::HubClient;
use crate::transport::RequestOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Registration metadata path.
pub const REGISTRATION_PATH: &str = "/api/v1/registrations";

/// Server version path.
pub const CURRENT_VERSION_PATH: &str = "/api/current-version";

/// Product name stamped on every payload.
pub const PRODUCT_NAME: &str = "Hub";

/// Placeholder for metadata the server did not supply.
pub const UNKNOWN: &str = "<unknown>";

/// The phone-home payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneHomePayload {
    pub registration_id: String,
    pub product_name: String,
    pub product_version: String,
    pub plugin_version: String,
    pub third_party_name: String,
    pub third_party_version: String,
}

/// One-way telemetry send primitive.
///
/// Submission is fire-and-forget; implementations must not block and their
/// delivery result is invisible to the caller.
pub trait TelemetrySink: Send + Sync {
    fn submit(&self, payload: PhoneHomePayload);
}

/// Sink that drops every payload.
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn submit(&self, _payload: PhoneHomePayload) {}
}

/// Sink that forwards payloads into an unbounded channel, for a collaborator
/// task that owns actual delivery.
pub struct ChannelTelemetrySink {
    sender: mpsc::UnboundedSender<PhoneHomePayload>,
}

impl ChannelTelemetrySink {
    /// Creates the sink together with the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PhoneHomePayload>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl TelemetrySink for ChannelTelemetrySink {
    fn submit(&self, payload: PhoneHomePayload) {
        if self.sender.send(payload).is_err() {
            debug!("telemetry receiver dropped; payload discarded");
        }
    }
}

impl HubClient {
    /// Assembles and submits a phone-home payload.
    ///
    /// A failed registration or version fetch (including an unconfigured
    /// origin) substitutes [`UNKNOWN`] rather than erroring. The contract
    /// ends at submission.
    #[instrument(skip(self))]
    pub async fn phone_home(
        &self,
        third_party_name: &str,
        third_party_version: &str,
        plugin_version: &str,
    ) {
        let registration_id = match self
            .transport()
            .get(REGISTRATION_PATH, RequestOptions::new().query("summary", "true"))
            .await
        {
            Ok(value) => string_field(&value, "registrationId"),
            Err(error) => {
                debug!(error = %error, "registration fetch failed");
                UNKNOWN.to_string()
            }
        };

        let product_version = match self
            .transport()
            .get(CURRENT_VERSION_PATH, RequestOptions::new())
            .await
        {
            Ok(value) => string_field(&value, "version"),
            Err(error) => {
                debug!(error = %error, "server version fetch failed");
                UNKNOWN.to_string()
            }
        };

        self.telemetry().submit(PhoneHomePayload {
            registration_id,
            product_name: PRODUCT_NAME.to_string(),
            product_version,
            plugin_version: plugin_version.to_string(),
            third_party_name: third_party_name.to_string(),
            third_party_version: third_party_version.to_string(),
        });
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HubClient;
    use crate::testing::{mock_client, MockExchange};
    use hublens_core::HubConfig;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_phone_home_submits_assembled_payload() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_json(
            "https://hub.example.com/api/v1/registrations",
            json!({ "registrationId": "reg-123" }),
        );
        exchange.respond_json(
            "https://hub.example.com/api/current-version",
            json!({ "version": "2020.6.0" }),
        );
        let (sink, mut receiver) = ChannelTelemetrySink::new();
        let client = client.with_telemetry_sink(Arc::new(sink));

        client.phone_home("chrome", "83.0", "1.2.0").await;

        let payload = receiver.try_recv().unwrap();
        assert_eq!(
            payload,
            PhoneHomePayload {
                registration_id: "reg-123".to_string(),
                product_name: "Hub".to_string(),
                product_version: "2020.6.0".to_string(),
                plugin_version: "1.2.0".to_string(),
                third_party_name: "chrome".to_string(),
                third_party_version: "83.0".to_string(),
            }
        );
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_phone_home_substitutes_unknown_on_fetch_failure() {
        let (client, exchange) = mock_client("https://hub.example.com");
        exchange.respond_status("https://hub.example.com/api/v1/registrations", 500, "");
        exchange.respond_status("https://hub.example.com/api/current-version", 500, "");
        let (sink, mut receiver) = ChannelTelemetrySink::new();
        let client = client.with_telemetry_sink(Arc::new(sink));

        client.phone_home("firefox", "77.0", "1.2.0").await;

        let payload = receiver.try_recv().unwrap();
        assert_eq!(payload.registration_id, UNKNOWN);
        assert_eq!(payload.product_version, UNKNOWN);
        assert_eq!(payload.product_name, "Hub");
    }

    #[tokio::test]
    async fn test_phone_home_without_origin_still_submits() {
        let exchange = Arc::new(MockExchange::new());
        let client = HubClient::with_exchange(HubConfig::default(), exchange.clone());
        let (sink, mut receiver) = ChannelTelemetrySink::new();
        let client = client.with_telemetry_sink(Arc::new(sink));

        client.phone_home("chrome", "83.0", "1.2.0").await;

        // Both fetches fail before any I/O, so no requests were issued,
        // but the payload still goes out with placeholder metadata.
        assert_eq!(exchange.request_count(), 0);
        let payload = receiver.try_recv().unwrap();
        assert_eq!(payload.registration_id, UNKNOWN);
        assert_eq!(payload.product_version, UNKNOWN);
    }

    #[test]
    fn test_payload_wire_field_names() {
        let payload = PhoneHomePayload {
            registration_id: "reg-123".to_string(),
            product_name: "Hub".to_string(),
            product_version: "2020.6.0".to_string(),
            plugin_version: "1.2.0".to_string(),
            third_party_name: "chrome".to_string(),
            third_party_version: "83.0".to_string(),
        };
        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            wire,
            json!({
                "registrationId": "reg-123",
                "productName": "Hub",
                "productVersion": "2020.6.0",
                "pluginVersion": "1.2.0",
                "thirdPartyName": "chrome",
                "thirdPartyVersion": "83.0"
            })
        );
    }
}

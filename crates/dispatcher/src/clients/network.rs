//! NetworkStreamClient - UDP datagram transmission
//!
//! Sends each batch as one datagram wrapped in an envelope carrying
//! the entity path and target partition. The partition topology is
//! declared by configuration (static for the process lifetime);
//! discovery just materializes the declared ids.

use std::net::SocketAddr;

use contracts::{
    CapturedEvent, ContractError, EventStreamClient, PartitionId, RelayConfig, WireFormat,
};
use serde::Serialize;
use tokio::net::UdpSocket;
use tracing::{debug, instrument, warn};

/// Configuration for NetworkStreamClient
#[derive(Debug, Clone)]
pub struct NetworkClientConfig {
    /// Target address
    pub addr: SocketAddr,
    /// Backend entity/topic name
    pub entity_path: String,
    /// Serialization format
    pub format: WireFormat,
    /// Declared partition count
    pub partition_count: usize,
    /// Max datagram size (UDP typically 65507 for IPv4)
    pub max_datagram_size: usize,
}

impl NetworkClientConfig {
    /// Build from a loaded RelayConfig
    pub fn from_relay(config: &RelayConfig) -> Result<Self, ContractError> {
        let addr: SocketAddr = config.connection.endpoint.parse().map_err(|e| {
            ContractError::config_validation(
                "connection.endpoint",
                format!("invalid address '{}': {e}", config.connection.endpoint),
            )
        })?;

        Ok(Self {
            addr,
            entity_path: config.connection.entity_path.clone(),
            format: config.stream.wire_format,
            partition_count: config.stream.partition_count,
            max_datagram_size: 65000,
        })
    }
}

/// One transmitted batch, as laid out on the wire
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEnvelope<'a> {
    entity_path: &'a str,
    partition: &'a PartitionId,
    events: &'a [CapturedEvent],
}

/// Client that sends batches over UDP
pub struct NetworkStreamClient {
    name: String,
    config: NetworkClientConfig,
    socket: UdpSocket,
}

impl NetworkStreamClient {
    /// Create a new NetworkStreamClient
    #[instrument(name = "network_client_new", skip(name, config))]
    pub async fn new(
        name: impl Into<String>,
        config: NetworkClientConfig,
    ) -> std::io::Result<Self> {
        let name = name.into();
        // Bind to any available port
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(&config.addr).await?;

        debug!(
            client = %name,
            target = %config.addr,
            entity = %config.entity_path,
            "NetworkStreamClient connected"
        );

        Ok(Self {
            name,
            config,
            socket,
        })
    }

    /// Create from a RelayConfig
    pub async fn from_relay(
        name: impl Into<String>,
        config: &RelayConfig,
    ) -> Result<Self, ContractError> {
        let client_config = NetworkClientConfig::from_relay(config)?;
        Self::new(name, client_config)
            .await
            .map_err(|e| ContractError::transmission("network", e.to_string()))
    }

    fn serialize_envelope(&self, envelope: &BatchEnvelope<'_>) -> Result<Vec<u8>, ContractError> {
        match self.config.format {
            WireFormat::Json => serde_json::to_vec(envelope)
                .map_err(|e| ContractError::serialization(format!("json error: {e}"))),
            WireFormat::Bincode => bincode::serialize(envelope)
                .map_err(|e| ContractError::serialization(format!("bincode error: {e}"))),
        }
    }
}

impl EventStreamClient for NetworkStreamClient {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "network_client_discover", skip(self))]
    async fn discover_partitions(&self) -> Result<Vec<PartitionId>, ContractError> {
        // topology is declared, not negotiated
        Ok((0..self.config.partition_count)
            .map(PartitionId::from_index)
            .collect())
    }

    #[instrument(
        name = "network_client_send_batch",
        skip(self, batch),
        fields(client = %self.name, partition = %partition, events = batch.len())
    )]
    async fn send_batch(
        &self,
        batch: &[CapturedEvent],
        partition: &PartitionId,
    ) -> Result<(), ContractError> {
        let envelope = BatchEnvelope {
            entity_path: &self.config.entity_path,
            partition,
            events: batch,
        };
        let data = self.serialize_envelope(&envelope)?;

        if data.len() > self.config.max_datagram_size {
            warn!(
                client = %self.name,
                size = data.len(),
                max = self.config.max_datagram_size,
                "Datagram exceeds configured maximum"
            );
        }

        let sent = self
            .socket
            .send(&data)
            .await
            .map_err(|e| ContractError::transmission(&self.name, e.to_string()))?;

        debug!(client = %self.name, partition = %partition, bytes = sent, "Sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Activity, ConversationAccount};

    fn test_config(addr: &str) -> NetworkClientConfig {
        NetworkClientConfig {
            addr: addr.parse().unwrap(),
            entity_path: "transcripts".to_string(),
            format: WireFormat::Json,
            partition_count: 4,
            max_datagram_size: 65000,
        }
    }

    fn event(text: &str) -> CapturedEvent {
        let activity = Activity::message("test", text)
            .with_conversation(ConversationAccount::new("conv-1"));
        CapturedEvent::capture(&activity)
    }

    #[tokio::test]
    async fn test_client_create() {
        let client = NetworkStreamClient::new("net", test_config("127.0.0.1:19997")).await;
        // UDP connect succeeds even with no receiver
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_discover_returns_declared_topology() {
        let client = NetworkStreamClient::new("net", test_config("127.0.0.1:19996"))
            .await
            .unwrap();
        let partitions = client.discover_partitions().await.unwrap();
        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions[0].as_str(), "0");
        assert_eq!(partitions[3].as_str(), "3");
    }

    #[tokio::test]
    async fn test_send_batch_wire_shape() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = receiver.local_addr().unwrap();

        let client = NetworkStreamClient::new("net", test_config(&addr.to_string()))
            .await
            .unwrap();

        let batch = vec![event("hello"), event("world")];
        client
            .send_batch(&batch, &PartitionId::from_index(2))
            .await
            .unwrap();

        let mut buf = vec![0u8; 65_507];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        let wire: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();

        assert_eq!(wire["entityPath"], "transcripts");
        assert_eq!(wire["partition"], "2");
        assert_eq!(wire["events"].as_array().unwrap().len(), 2);
        assert_eq!(wire["events"][0]["message"], "hello");
    }

    #[tokio::test]
    async fn test_invalid_endpoint_rejected() {
        let relay: RelayConfig = serde_json::from_value(serde_json::json!({
            "connection": { "endpoint": "not an address", "entity_path": "t" }
        }))
        .unwrap();

        let result = NetworkClientConfig::from_relay(&relay);
        assert!(matches!(
            result,
            Err(ContractError::ConfigValidation { .. })
        ));
    }
}

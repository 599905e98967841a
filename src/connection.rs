use anyhow::{Context as _, Result};
use rumqttc::{AsyncClient, ConnectReturnCode, QoS};
use tracing::{info, warn};

use crate::recorder::Topics;

pub trait Subscriber {
    fn subscribe(&self, topic: &str) -> Result<()>;
}

impl Subscriber for AsyncClient {
    // Queues the request without waiting; the event loop sends it on the next poll.
    fn subscribe(&self, topic: &str) -> Result<()> {
        self.try_subscribe(topic, QoS::AtMostOnce)
            .with_context(|| format!("failed to request subscription to {topic}"))
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    topics: Topics,
}

impl ConnectionHandler {
    pub fn new(topics: Topics) -> Self {
        Self { topics }
    }

    /// Called once per broker session acknowledgement.
    ///
    /// A refused connection is only logged.
    pub fn on_connect(&self, client: &impl Subscriber, code: ConnectReturnCode) -> Result<()> {
        info!("Connected with result code {code:?}");

        if code != ConnectReturnCode::Success {
            warn!("broker refused the connection, not subscribing");
            return Ok(());
        }

        client.subscribe(&self.topics.temperature)?;
        client.subscribe(&self.topics.moisture)?;

        Ok(())
    }
}

use std::future::Future;
use std::time::Duration;

use anyhow::{Context as _, Result};
use rumqttc::{ConnectReturnCode, ConnectionError, Event, EventLoop, Packet};
use tracing::{info, warn};

use crate::connection::{ConnectionHandler, Subscriber};
use crate::recorder::{MessageRecorder, Topics};
use crate::sink::ReadingSink;

/// Pause between polls after a dropped session, while the client reconnects.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Routes broker events to the connection handler and the message recorder.
#[derive(Debug)]
pub struct Session<C, S> {
    client: C,
    connection: ConnectionHandler,
    recorder: MessageRecorder<S>,
    established: bool,
}

impl<C: Subscriber, S: ReadingSink> Session<C, S> {
    pub fn new(client: C, topics: Topics, sink: S) -> Self {
        Self {
            client,
            connection: ConnectionHandler::new(topics.clone()),
            recorder: MessageRecorder::new(topics, sink),
            established: false,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_sink(self) -> S {
        self.recorder.into_sink()
    }

    /// Whether the broker has accepted at least one connection.
    pub fn is_established(&self) -> bool {
        self.established
    }

    pub fn handle_event(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::Incoming(Packet::ConnAck(ack)) => {
                if ack.code == ConnectReturnCode::Success {
                    self.established = true;
                }
                self.connection.on_connect(&self.client, ack.code)
            }
            Event::Incoming(Packet::Publish(publish)) => {
                self.recorder.on_message(&publish.topic, &publish.payload)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// The client reports a refused handshake as an error rather than a ConnAck event.
    pub fn handle_refused(&self, code: ConnectReturnCode) -> Result<()> {
        self.connection.on_connect(&self.client, code)
    }
}

/// Polls the event loop until `shutdown` resolves.
///
/// Connection errors before the first accepted session are fatal. Once a
/// session has been established, errors are logged and polling continues so
/// the client reconnects. A refused handshake is logged and ends the loop
/// without an error.
pub async fn run<C, S, F>(
    session: &mut Session<C, S>,
    eventloop: &mut EventLoop,
    shutdown: F,
) -> Result<()>
where
    C: Subscriber,
    S: ReadingSink,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested, stopping");
                return Ok(());
            }
            event = eventloop.poll() => match event {
                Ok(event) => session.handle_event(&event)?,
                Err(ConnectionError::ConnectionRefused(code)) => {
                    session.handle_refused(code)?;
                    return Ok(());
                }
                Err(err) if session.is_established() => {
                    warn!("MQTT connection lost, reconnecting: {err}");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
                Err(err) => return Err(err).context("MQTT connection failed"),
            },
        }
    }
}

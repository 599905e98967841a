use anyhow::{Context as _, Result};
use tracing::{debug, info};

use crate::reading::{Reading, ReadingKind};
use crate::sink::ReadingSink;

pub const DEFAULT_TEMPERATURE_TOPIC: &str = "sensor/temperature";
pub const DEFAULT_MOISTURE_TOPIC: &str = "sensor/moisture";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub temperature: String,

    pub moisture: String,
}

impl Topics {
    pub fn new(temperature: impl Into<String>, moisture: impl Into<String>) -> Self {
        Self {
            temperature: temperature.into(),
            moisture: moisture.into(),
        }
    }

    /// Exact match only; wildcards are not interpreted.
    pub fn classify(&self, topic: &str) -> Option<ReadingKind> {
        if topic == self.temperature {
            Some(ReadingKind::Temperature)
        } else if topic == self.moisture {
            Some(ReadingKind::Moisture)
        } else {
            None
        }
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE_TOPIC, DEFAULT_MOISTURE_TOPIC)
    }
}

#[derive(Debug)]
pub struct MessageRecorder<S> {
    topics: Topics,
    sink: S,
}

impl<S: ReadingSink> MessageRecorder<S> {
    pub fn new(topics: Topics, sink: S) -> Self {
        Self { topics, sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Records one inbound message.
    ///
    /// Returns `Ok(None)` for topics other than the two configured ones.
    /// A payload that is not valid UTF-8 is an error and nothing is written.
    pub fn on_message(&mut self, topic: &str, payload: &[u8]) -> Result<Option<Reading>> {
        let Some(kind) = self.topics.classify(topic) else {
            debug!("ignoring message on unrecognized topic: {topic}");
            return Ok(None);
        };

        let value = std::str::from_utf8(payload)
            .with_context(|| format!("failed to decode payload on {topic} as UTF-8"))?;
        let reading = Reading::new(kind, value);

        self.sink
            .append(&reading)
            .with_context(|| format!("failed to record {kind} reading"))?;

        match kind {
            ReadingKind::Temperature => info!("Temperature: {} C", reading.value),
            ReadingKind::Moisture => info!("Soil Moisture: {}", reading.value),
        }

        Ok(Some(reading))
    }
}

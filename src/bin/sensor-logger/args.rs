use std::path::PathBuf;

use clap::Parser;
use sensor_csv_logger::recorder::{DEFAULT_MOISTURE_TOPIC, DEFAULT_TEMPERATURE_TOPIC};

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "MQTT_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub port: u16,

    #[arg(long, env = "MQTT_CLIENT_ID", default_value = "sensor-csv-logger")]
    pub client_id: String,

    /// Keep-alive interval in seconds.
    #[arg(long, env = "MQTT_KEEP_ALIVE", default_value_t = 60)]
    pub keep_alive: u64,

    #[arg(long, env = "TEMPERATURE_TOPIC", default_value = DEFAULT_TEMPERATURE_TOPIC)]
    pub temperature_topic: String,

    #[arg(long, env = "MOISTURE_TOPIC", default_value = DEFAULT_MOISTURE_TOPIC)]
    pub moisture_topic: String,

    #[arg(long, env = "CSV_FILE", default_value = "sensor_data.csv")]
    pub file: PathBuf,
}

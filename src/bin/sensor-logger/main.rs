mod args;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use args::Args;
use clap::Parser as _;
use rumqttc::{AsyncClient, MqttOptions};
use sensor_csv_logger::{
    recorder::Topics,
    session::{Session, run as run_session},
    sink::CsvFileSink,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const REQUEST_CHANNEL_CAPACITY: usize = 10;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let mut options = MqttOptions::new(&args.client_id, &args.host, args.port);
    options.set_keep_alive(Duration::from_secs(args.keep_alive));

    let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);

    let topics = Topics::new(args.temperature_topic, args.moisture_topic);
    let sink = CsvFileSink::new(args.file);
    info!(
        "connecting to {}:{}, recording {} and {} to {:?}",
        args.host,
        args.port,
        topics.temperature,
        topics.moisture,
        sink.path()
    );

    let mut session = Session::new(client, topics, sink);

    run_session(&mut session, &mut eventloop, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    })
    .await
}

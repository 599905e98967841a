#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use rumqttc::AsyncClient;
use sensor_csv_logger::connection::Subscriber;

pub struct TempCsv {
    pub dir: PathBuf,
    pub path: PathBuf,
}

impl TempCsv {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "sensor-csv-logger-it-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sensor_data.csv");
        Self { dir, path }
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap_or_default()
    }
}

impl Drop for TempCsv {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Records requested topics and forwards them to a real client when one is set.
#[derive(Default)]
pub struct RecordingSubscriber {
    pub client: Option<AsyncClient>,
    pub topics: RefCell<Vec<String>>,
}

impl RecordingSubscriber {
    pub fn forwarding_to(client: AsyncClient) -> Self {
        Self {
            client: Some(client),
            topics: RefCell::default(),
        }
    }

    pub fn topics(&self) -> Vec<String> {
        self.topics.borrow().clone()
    }
}

impl Subscriber for RecordingSubscriber {
    fn subscribe(&self, topic: &str) -> Result<()> {
        self.topics.borrow_mut().push(topic.to_owned());
        match &self.client {
            Some(client) => Subscriber::subscribe(client, topic),
            None => Ok(()),
        }
    }
}

/// What the fake broker does with one accepted connection.
pub enum Script {
    /// Answer CONNECT with the given CONNACK return code.
    Refuse(u8),
    /// Accept, then close the socket after the delay.
    AcceptThenClose(Duration),
    /// Accept, send QoS 0 publishes, then hold the socket until the client leaves.
    Accept(Vec<(&'static str, &'static str)>),
}

/// Serves one script per incoming connection and returns the port.
/// The listener is dropped after the last script, so later connects fail.
pub fn spawn_broker(scripts: Vec<Script>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for script in scripts {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let _ = serve(stream, script);
        }
    });

    port
}

/// A port nothing listens on.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn serve(mut stream: TcpStream, script: Script) -> io::Result<()> {
    read_packet(&mut stream)?;

    match script {
        Script::Refuse(code) => stream.write_all(&[0x20, 0x02, 0x00, code]),
        Script::AcceptThenClose(delay) => {
            stream.write_all(&[0x20, 0x02, 0x00, 0x00])?;
            thread::sleep(delay);
            Ok(())
        }
        Script::Accept(publishes) => {
            stream.write_all(&[0x20, 0x02, 0x00, 0x00])?;
            for (topic, payload) in publishes {
                stream.write_all(&encode_publish(topic, payload.as_bytes()))?;
            }
            let mut buf = [0u8; 512];
            while stream.read(&mut buf)? > 0 {}
            Ok(())
        }
    }
}

fn read_packet(stream: &mut TcpStream) -> io::Result<()> {
    let mut byte = [0u8; 1];
    stream.read_exact(&mut byte)?;

    let mut remaining = 0usize;
    let mut shift = 0;
    loop {
        stream.read_exact(&mut byte)?;
        remaining |= ((byte[0] & 0x7f) as usize) << shift;
        if byte[0] & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    let mut body = vec![0u8; remaining];
    stream.read_exact(&mut body)
}

fn encode_publish(topic: &str, payload: &[u8]) -> Vec<u8> {
    let remaining = 2 + topic.len() + payload.len();
    assert!(remaining < 128, "publish too large for a one-byte length");

    let mut packet = vec![0x30, remaining as u8];
    packet.extend_from_slice(&(topic.len() as u16).to_be_bytes());
    packet.extend_from_slice(topic.as_bytes());
    packet.extend_from_slice(payload);
    packet
}

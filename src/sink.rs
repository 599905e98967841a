use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use csv::{Terminator, WriterBuilder};

use crate::reading::Reading;

pub trait ReadingSink {
    fn append(&mut self, reading: &Reading) -> Result<()>;
}

/// Appends readings as `kind,value` rows to a CSV file.
///
/// The file is opened in append mode for every reading and closed again
/// before `append` returns, so nothing is held open between messages.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadingSink for CsvFileSink {
    fn append(&mut self, reading: &Reading) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open CSV file: {:?}", self.path))?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);

        writer
            .write_record([reading.kind.as_str(), reading.value.as_str()])
            .with_context(|| format!("failed to write CSV record to {:?}", self.path))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush CSV file: {:?}", self.path))?;

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    pub readings: Vec<Reading>,
}

impl ReadingSink for MemorySink {
    fn append(&mut self, reading: &Reading) -> Result<()> {
        self.readings.push(reading.clone());
        Ok(())
    }
}

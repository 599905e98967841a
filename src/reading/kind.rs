use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Temperature,
    Moisture,
}

impl ReadingKind {
    /// Label written to the first CSV column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "Temperature",
            ReadingKind::Moisture => "Moisture",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Temperature" => Ok(ReadingKind::Temperature),
            "Moisture" => Ok(ReadingKind::Moisture),
            _ => bail!("unknown reading kind: {}", s),
        }
    }
}

mod kind;

pub use kind::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub kind: ReadingKind,

    pub value: String,
}

impl Reading {
    pub fn new(kind: ReadingKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

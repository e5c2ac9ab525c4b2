//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error("size {size} exceeds configured limit of {limit} bytes")]
    SizeLimit { size: u64, limit: u64 },

    #[error("no code assigned to byte {0:#04x}")]
    MissingCode(u8),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        CodecError::CorruptData(msg.into())
    }

    /// True for failures caused by a malformed packed file.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CodecError::CorruptData(_))
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

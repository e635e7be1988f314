use thiserror::Error;

use crate::min_heap::HeapErr;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Compression was asked to encode a zero-length sequence.
    #[error("cannot compress empty input")]
    EmptyInput,

    /// The artifact header or payload is inconsistent, or decoding ran out
    /// of bits before reaching a leaf.
    #[error("corrupt stream: {reason}")]
    CorruptStream { reason: String },

    /// A symbol had no entry in the code table built from the same input.
    #[error("symbol {symbol} not in code table")]
    UnknownSymbol { symbol: String },

    #[error("heap error: {0}")]
    Heap(#[from] HeapErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl HuffmanError {
    pub fn corrupt<S: Into<String>>(reason: S) -> Self {
        Self::CorruptStream {
            reason: reason.into(),
        }
    }

    pub fn unknown_symbol<S: std::fmt::Debug>(symbol: &S) -> Self {
        Self::UnknownSymbol {
            symbol: format!("{:?}", symbol),
        }
    }

    /// True for errors caused by the bytes being decoded rather than by the
    /// caller or the environment.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptStream { .. })
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;

// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

use crate::consts::{BLOCK_LEN, IV_LEN};

#[derive(Error, Debug)]
pub enum CoreError {
    /// The OS random source could not be read. Fatal, never retried.
    #[error("secure random source unavailable: {0}")]
    EntropySource(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Input cannot be an envelope: shorter than the IV, or the ciphertext
    /// after it is empty or not block aligned.
    #[error(
        "malformed envelope of {len} bytes: need a {IV_LEN}-byte IV followed by a nonzero multiple of {BLOCK_LEN} bytes"
    )]
    MalformedEnvelope { len: usize },

    /// Padding check failed after decryption. Without a MAC a wrong key and a
    /// corrupted envelope look the same here.
    #[error("invalid padding: wrong key or corrupted envelope")]
    InvalidPadding,

    #[error("decoded plaintext is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}

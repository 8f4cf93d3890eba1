// src/lib.rs
//! blackbox-envelope: IV-prefixed AES-256-CBC envelopes for source code blobs
//!
//! Features:
//! - 256-bit keys straight from the OS CSPRNG
//! - `IV ‖ ciphertext` envelopes with PKCS#7 padding, fresh IV per encode
//! - Keyless envelope inspection and key rotation
//! - Owner-only key files (raw, hex or base64)
//!
//! Envelopes carry no MAC. A wrong key or a corrupted envelope is detected
//! only when the recovered padding is invalid; otherwise decoding yields
//! garbage. Decoded source is returned as data and never executed here.

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod error;

// Re-export everything users need at the crate root
pub use aliases::EnvelopeKey;
pub use config::load as load_config;
pub use crate::core::{
    decode, decode_to_string, encode, encode_str, encode_with_rng, envelope_digest, generate_key,
    generate_key_with, inspect, key_from_slice, key_representations, open_file, read_key_file,
    reseal, seal_file, write_key_file, Envelope, EnvelopeInfo, KeyRepr, Result as CoreResult,
};
pub use enums::KeyEncoding;
pub use error::CoreError;

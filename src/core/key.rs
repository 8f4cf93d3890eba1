// src/core/key.rs
//! Key generation and representation utilities
//!
//! Keys come straight from the OS CSPRNG. There is no derivation step and the
//! envelope carries no key identifier, so the caller must keep the exact bytes.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::rngs::OsRng;
use rand::{TryCryptoRng, TryRngCore};

use crate::aliases::EnvelopeKey;
use crate::consts::KEY_LEN;
use crate::error::CoreError;

use super::Result;

/// Generate a new random 256-bit envelope key from the OS random source
#[inline]
pub fn generate_key() -> Result<EnvelopeKey> {
    generate_key_with(&mut OsRng)
}

/// Generate a key from an explicit crypto-grade random source
pub fn generate_key_with<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<EnvelopeKey> {
    let mut bytes = [0u8; KEY_LEN];
    fill_random(rng, &mut bytes)?;
    Ok(EnvelopeKey::new(bytes))
}

/// Copy caller-held key bytes into a zeroizing key
pub fn key_from_slice(bytes: &[u8]) -> Result<EnvelopeKey> {
    Ok(EnvelopeKey::new(check_key_len(bytes)?))
}

/// Reject anything that is not exactly [`KEY_LEN`] bytes
pub(crate) fn check_key_len(bytes: &[u8]) -> Result<[u8; KEY_LEN]> {
    bytes
        .try_into()
        .map_err(|_| CoreError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })
}

/// Fill `buf` from `rng`, mapping failure to [`CoreError::EntropySource`]
pub(crate) fn fill_random<R: TryCryptoRng + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    TryRngCore::try_fill_bytes(rng, buf).map_err(|err| {
        tracing::error!("secure random source failed: {err}");
        CoreError::EntropySource(err.to_string())
    })
}

/// Multiple string representations of a key for export/display
#[derive(Debug, Clone)]
pub struct KeyRepr {
    pub hex: String,
    pub base64: String,
    pub base64url_no_pad: String,
}

pub fn key_representations(key: &EnvelopeKey) -> KeyRepr {
    let bytes = key.expose_secret();
    KeyRepr {
        hex: hex::encode(bytes),
        base64: STANDARD.encode(bytes),
        base64url_no_pad: URL_SAFE_NO_PAD.encode(bytes),
    }
}

// src/core/envelope.rs
//! Envelope codec: AES-256-CBC with PKCS#7 padding, IV prepended
//!
//! Layout, with no header, length prefix or tag:
//!
//! ```text
//! offset 0..16   : IV, raw bytes
//! offset 16..end : ciphertext, plaintext_len rounded up to the next multiple of 16
//! ```
//!
//! Padding is always applied, so an empty plaintext still yields one full
//! ciphertext block. There is no integrity tag: a wrong key or a tampered
//! envelope is only caught when the recovered padding happens to be invalid,
//! and otherwise decodes to garbage.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::TryCryptoRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aliases::EnvelopeKey;
use crate::consts::{BLOCK_LEN, IV_LEN};
use crate::error::CoreError;

use super::key::{check_key_len, fill_random, generate_key};
use super::Result;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encoded envelope bytes: `IV ‖ ciphertext`
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope(Vec<u8>);

impl Envelope {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn iv(&self) -> &[u8] {
        &self.0[..IV_LEN]
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.0[IV_LEN..]
    }

    #[allow(clippy::len_without_is_empty)] // never empty: IV plus at least one block
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<[u8]> for Envelope {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Envelope> for Vec<u8> {
    fn from(envelope: Envelope) -> Self {
        envelope.0
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("iv", &hex::encode(self.iv()))
            .field("ciphertext_len", &self.ciphertext().len())
            .finish()
    }
}

/// Encrypt `plaintext` under `key` with a fresh IV from the OS random source
pub fn encode(plaintext: &[u8], key: &[u8]) -> Result<Envelope> {
    encode_with_rng(plaintext, key, &mut OsRng)
}

/// Encrypt `plaintext` under `key`, drawing the IV from `rng`
///
/// The key length is checked before any randomness is consumed.
pub fn encode_with_rng<R: TryCryptoRng + ?Sized>(
    plaintext: &[u8],
    key: &[u8],
    rng: &mut R,
) -> Result<Envelope> {
    let key = check_key_len(key)?;

    let mut iv = [0u8; IV_LEN];
    fill_random(rng, &mut iv)?;

    let cipher = Aes256CbcEnc::new(&key.into(), &iv.into());
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);

    debug!(
        plaintext_len = plaintext.len(),
        envelope_len = out.len(),
        "encoded envelope"
    );
    Ok(Envelope(out))
}

/// Decrypt an envelope produced by [`encode`] and strip its padding
///
/// Either the full validated plaintext comes back or an error does.
pub fn decode(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let key = check_key_len(key)?;
    let (iv, ciphertext) = split_envelope(envelope)?;

    let cipher = Aes256CbcDec::new(&key.into(), &(*iv).into());
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            warn!(envelope_len = envelope.len(), "envelope padding check failed");
            CoreError::InvalidPadding
        })?;

    debug!(
        envelope_len = envelope.len(),
        plaintext_len = plaintext.len(),
        "decoded envelope"
    );
    Ok(plaintext)
}

/// Encrypt UTF-8 source text
pub fn encode_str(source: &str, key: &[u8]) -> Result<Envelope> {
    encode(source.as_bytes(), key)
}

/// Decrypt an envelope whose plaintext is UTF-8 source text
///
/// The text is returned to the caller as data; running it is a separate decision.
pub fn decode_to_string(envelope: &[u8], key: &[u8]) -> Result<String> {
    Ok(String::from_utf8(decode(envelope, key)?)?)
}

/// Re-encrypt an envelope under a freshly generated key
pub fn reseal(envelope: &[u8], old_key: &[u8]) -> Result<(Envelope, EnvelopeKey)> {
    let plaintext = decode(envelope, old_key)?;
    let new_key = generate_key()?;
    let resealed = encode(&plaintext, new_key.expose_secret())?;
    Ok((resealed, new_key))
}

/// Split raw bytes into `(iv, ciphertext)`, enforcing the envelope layout
fn split_envelope(bytes: &[u8]) -> Result<(&[u8; IV_LEN], &[u8])> {
    let malformed = || CoreError::MalformedEnvelope { len: bytes.len() };

    if bytes.len() < IV_LEN {
        return Err(malformed());
    }
    let (iv, ciphertext) = bytes.split_at(IV_LEN);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(malformed());
    }
    let iv: &[u8; IV_LEN] = iv.try_into().map_err(|_| malformed())?;
    Ok((iv, ciphertext))
}

/// BLAKE3 of the raw envelope bytes, lowercase hex
///
/// Safe to log: it identifies an envelope without revealing the key or plaintext.
pub fn envelope_digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Keyless structural summary of an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeInfo {
    pub iv_hex: String,
    pub envelope_len: usize,
    pub ciphertext_len: usize,
    pub blocks: usize,
    /// Smallest plaintext length this ciphertext can carry
    pub min_plaintext_len: usize,
    /// Largest plaintext length this ciphertext can carry
    pub max_plaintext_len: usize,
    pub blake3: String,
}

/// Check the layout of `bytes` without a key and describe it
pub fn inspect(bytes: &[u8]) -> Result<EnvelopeInfo> {
    let (iv, ciphertext) = split_envelope(bytes)?;
    let blocks = ciphertext.len() / BLOCK_LEN;
    Ok(EnvelopeInfo {
        iv_hex: hex::encode(iv),
        envelope_len: bytes.len(),
        ciphertext_len: ciphertext.len(),
        blocks,
        min_plaintext_len: (blocks - 1) * BLOCK_LEN,
        max_plaintext_len: blocks * BLOCK_LEN - 1,
        blake3: envelope_digest(bytes),
    })
}

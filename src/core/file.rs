// src/core/file.rs
//! File-level envelope and key persistence
//!
//! Builds on the in-memory codec from envelope.rs. Key files are created
//! owner-only on Unix; where keys live and how they rotate is still the
//! caller's policy.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info};

use crate::aliases::EnvelopeKey;
use crate::consts::KEY_FILE_MODE;
use crate::enums::KeyEncoding;
use crate::error::CoreError;

use super::envelope::{decode, encode, envelope_digest};
use super::key::key_from_slice;
use super::Result;

/// Encode a file on disk into an envelope file
///
/// Returns the plaintext size in bytes.
pub fn seal_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    key: &EnvelopeKey,
) -> Result<u64> {
    let plaintext = std::fs::read(input_path.as_ref())?;
    let envelope = encode(&plaintext, key.expose_secret())?;
    std::fs::write(output_path.as_ref(), envelope.as_bytes())?;

    info!(
        output = %output_path.as_ref().display(),
        blake3 = %envelope_digest(envelope.as_bytes()),
        "sealed file"
    );
    Ok(plaintext.len() as u64)
}

/// Decode an envelope file back into its plaintext file
///
/// Nothing is written unless decoding fully succeeds. Returns the plaintext
/// size in bytes.
pub fn open_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    key: &EnvelopeKey,
) -> Result<u64> {
    let envelope = std::fs::read(input_path.as_ref())?;
    let plaintext = decode(&envelope, key.expose_secret())?;
    std::fs::write(output_path.as_ref(), &plaintext)?;

    info!(output = %output_path.as_ref().display(), "opened envelope");
    Ok(plaintext.len() as u64)
}

/// Persist a key, truncating any existing file
///
/// On Unix the file ends up `0o600` whether it was created or overwritten.
pub fn write_key_file<P: AsRef<Path>>(
    path: P,
    key: &EnvelopeKey,
    encoding: KeyEncoding,
) -> Result<()> {
    let bytes = key.expose_secret();
    let contents = match encoding {
        KeyEncoding::Raw => bytes.to_vec(),
        KeyEncoding::Hex => format!("{}\n", hex::encode(bytes)).into_bytes(),
        KeyEncoding::Base64 => format!("{}\n", STANDARD.encode(bytes)).into_bytes(),
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(KEY_FILE_MODE);
    }
    let mut file = options.open(path.as_ref())?;
    // mode() only applies on create; an existing file keeps its old bits otherwise
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(KEY_FILE_MODE))?;
    }
    file.write_all(&contents)?;
    file.sync_all()?;

    debug!(path = %path.as_ref().display(), %encoding, "wrote key file");
    Ok(())
}

/// Load a key written by [`write_key_file`]
pub fn read_key_file<P: AsRef<Path>>(path: P, encoding: KeyEncoding) -> Result<EnvelopeKey> {
    let contents = std::fs::read(path.as_ref())?;
    match encoding {
        KeyEncoding::Raw => key_from_slice(&contents),
        KeyEncoding::Hex => {
            let decoded = hex::decode(trimmed_text(&contents)?)
                .map_err(|e| CoreError::InvalidKeyEncoding(format!("hex: {e}")))?;
            key_from_slice(&decoded)
        }
        KeyEncoding::Base64 => {
            let decoded = STANDARD
                .decode(trimmed_text(&contents)?)
                .map_err(|e| CoreError::InvalidKeyEncoding(format!("base64: {e}")))?;
            key_from_slice(&decoded)
        }
    }
}

fn trimmed_text(contents: &[u8]) -> Result<&str> {
    std::str::from_utf8(contents)
        .map(str::trim)
        .map_err(|_| CoreError::InvalidKeyEncoding("key file is not text".into()))
}

// src/consts.rs
//! Shared constants: envelope layout and defaults

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// Initialization vector length in bytes (one AES block)
pub const IV_LEN: usize = 16;

/// AES block length in bytes; ciphertext is always a nonzero multiple of this
pub const BLOCK_LEN: usize = 16;

/// Permissions applied to key files on Unix (owner read/write only)
pub const KEY_FILE_MODE: u32 = 0o600;

/// Default location for a persisted key
pub const DEFAULT_KEY_FILE: &str = "blackbox_encryption_key.bin";

/// Default location for a persisted envelope
pub const DEFAULT_ENVELOPE_FILE: &str = "blackbox_encrypted_script.bin";

/// Environment variable naming the TOML config file
pub const CONFIG_ENV: &str = "BLACKBOX_CONFIG";

/// Environment variable overriding `paths.key_file`
pub const KEY_FILE_ENV: &str = "BLACKBOX_KEY_FILE";

/// Config file read when `BLACKBOX_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "blackbox.toml";

/// Default tracing filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

// src/config/defaults.rs
use crate::config::app::{Keys, Logging, Paths};
use crate::consts::{DEFAULT_ENVELOPE_FILE, DEFAULT_KEY_FILE, DEFAULT_LOG_LEVEL};
use crate::enums::KeyEncoding;

impl Default for Paths {
    fn default() -> Self {
        Paths {
            key_file: DEFAULT_KEY_FILE.into(),
            envelope_file: DEFAULT_ENVELOPE_FILE.into(),
        }
    }
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            encoding: KeyEncoding::default(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Logging {
            level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

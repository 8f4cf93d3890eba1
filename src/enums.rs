// src/enums.rs
//! Public enum types used throughout the crate

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// On-disk representation of a persisted key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
    /// The 32 key bytes as-is
    #[default]
    Raw,
    /// 64 lowercase hex characters
    Hex,
    /// Standard padded base64
    Base64,
}

impl KeyEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyEncoding::Raw => "raw",
            KeyEncoding::Hex => "hex",
            KeyEncoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "bin" | "binary" => Ok(KeyEncoding::Raw),
            "hex" => Ok(KeyEncoding::Hex),
            "base64" | "b64" => Ok(KeyEncoding::Base64),
            other => Err(format!(
                "unknown key encoding `{other}` (expected raw, hex or base64)"
            )),
        }
    }
}

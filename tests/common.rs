// tests/common.rs
//! Shared test utilities

#![allow(dead_code)]

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a test-friendly subscriber; respects RUST_LOG.
/// Idempotent, so every test may call it.
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// The 32-zero-byte key. Test-only.
pub const ZERO_KEY: [u8; 32] = [0u8; 32];

/// Small Python script used as realistic plaintext
pub const SAMPLE_SOURCE: &str = r#"
# Blackbox Secure Script
def hello_sunshine():
    print("Hello, Lord Sunshine! This script is encrypted for your safety.")

if __name__ == "__main__":
    hello_sunshine()
"#;

// src/config/mod.rs
//! Configuration for blackbox-envelope
//!
//! Lazy-loaded global config with TOML + env overrides.

pub use app::{config_path, load, load_from, try_load_from, Config, Keys, Logging, Paths};

mod app;
mod defaults;

// src/core/mod.rs
pub mod envelope;
pub mod file;
pub mod key;

pub use envelope::*;
pub use file::*;
pub use key::*;

pub type Result<T> = std::result::Result<T, crate::error::CoreError>;

//! mf-core: shared types, errors and configuration.
//!
//! This crate is the foundational dependency for the other mf-* crates. It
//! holds the conversion [`Mode`], the user-selected file type, the unified
//! error type and the TOML configuration.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;

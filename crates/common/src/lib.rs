//! Signlang Common Utilities
//!
//! Shared infrastructure for all Signlang crates:
//! - Error types and result aliases
//! - Monotonic clocks for session timing and classifier timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;

//! Logging utilities.
//!
//! This module centralizes logger initialization. Everything else in the
//! crate logs through the standard `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};

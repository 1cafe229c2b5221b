//! Shared utilities for divcheck
//!
//! This crate provides common functionality used across the divcheck workspace,
//! currently the logging setup and its configuration.

pub mod config;
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use logging::init_tracing;

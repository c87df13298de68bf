//! Core utilities for the frameview scene viewer.
//!
//! This crate provides foundational types and utilities used across the viewer:
//! - Error types and result aliases
//! - Logging initialization
//! - Timer and frame-rate utilities
//! - Configuration loading

pub mod config;
mod error;
mod logging;
mod timer;

pub use config::WindowConfig;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::{FpsCounter, Timer};

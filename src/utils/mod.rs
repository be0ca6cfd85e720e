//! Utility helpers for the cachewise client.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization.

pub mod logging;

//! Core module - shared plumbing for every command
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - The library error type
//! - Logging setup for the CLI

pub mod error;
pub mod logging;
pub mod model;
pub mod render;

//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Math types and transform composition
//! - Logging setup

pub mod math;
pub mod logging;

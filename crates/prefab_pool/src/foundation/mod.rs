//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the pool:
//! - Math types and transform composition
//! - Handle collections for scene nodes
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;

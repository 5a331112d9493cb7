//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path normalization utilities

pub mod model;
pub mod paths;
pub mod render;

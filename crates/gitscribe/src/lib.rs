//! gitscribe library
//!
//! This module exports the configuration, pipeline and renderers of the
//! gitscribe command line for use in integration tests and as a library.

pub mod config;
pub mod pipeline;
pub mod render;

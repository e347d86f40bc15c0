//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod demo;
pub mod generate;
pub mod pitch;

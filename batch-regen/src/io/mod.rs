//! I/O adapters for the regenerator.

pub mod build_tool;
pub mod config;
pub mod process;
pub mod walk;

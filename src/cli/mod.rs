//! CLI module for the `chainrag` binary
//!
//! - Command line argument parsing
//! - Command handlers (handlers/ subdirectory)
//! - Output formatting

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::*;
pub use handlers::*;
pub use output::*;

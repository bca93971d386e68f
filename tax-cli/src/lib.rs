//! Library side of the `tax-calc` binary, split out so the command handlers
//! can be tested without spawning a process.

pub mod app;
pub mod config;
pub mod logging;
pub mod utils;

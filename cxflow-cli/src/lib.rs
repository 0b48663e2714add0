//! cxflow CLI library.
//!
//! Exposes the command modules for integration testing. The `cxflow`
//! binary (main.rs) is a thin wrapper around them.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod output;

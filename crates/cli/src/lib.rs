//! `purge-cli` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod cli;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod run;

//! ferris-dev core library.
//!
//! This crate exposes programmatic APIs for the FerrisScript workspace
//! chores that used to live in paired `.ps1`/`.sh` scripts. Each task drives
//! one external tool and reports its exit code.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `runner`: External process execution behind the `ToolRunner` seam.
//! - `tasks`: cargo clippy/test/bench/fmt wrappers.
//! - `coverage`: llvm-cov / tarpaulin reports with on-demand install.
//! - `docs`: markdownlint and markdown-link-check.
//! - `hooks`: git hook install/uninstall and hook bodies.
//! - `labels`: idempotent GitHub label creation.
//! - `run_tests`: the `ferris-test` wrapper.
//! - `models`: Report structs shared by the printers.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod coverage;
pub mod docs;
pub mod error;
pub mod hooks;
pub mod labels;
pub mod models;
pub mod output;
pub mod runner;
pub mod tasks;
pub mod utils;

pub use error::{Error, Result};

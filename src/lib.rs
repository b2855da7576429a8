#![forbid(unsafe_code)]
//! test-dir: run an external tester over a directory tree
//!
//! Recursively scans a directory for files with a target extension (`.chm` by
//! default), invokes an external test executable on each one, echoes what the
//! tester printed, and stops at the first failing file.
//!
//! - `filter` - which entries are tested
//! - `runner` - spawning the tester and capturing its output
//! - `walker` - the traversal and its reporter
//! - `config` - tester path and target extension
//! - `cli` - argument parsing and exit status
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod filter;
pub mod runner;
pub mod walker;

pub use config::RunConfig;
pub use runner::{ProcessExecutor, RunError, RunOutput, TestExecutor};
pub use walker::{ConsoleReporter, WalkReporter, WalkSummary, Walker, walk};

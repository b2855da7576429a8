//! CLI module for test-dir
//!
//! ## Usage
//!
//! `test-dir [--tester <PATH>] [--ext <EXT>] <DIR>`
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::{DEFAULT_EXTENSION, DEFAULT_TESTER, RunConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run an external tester over every matching file in a directory tree
#[derive(Parser, Debug)]
#[command(name = "test-dir")]
#[command(version = VERSION)]
#[command(about = "Run an external tester over every matching file in a directory tree", long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Tester executable, invoked as `<TESTER> <FILE>`
    #[arg(long, value_name = "PATH", default_value = DEFAULT_TESTER)]
    pub tester: PathBuf,

    /// Extension of the files to test (case-insensitive)
    #[arg(long = "ext", value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

impl Cli {
    /// Build the run configuration from the parsed flags.
    pub fn config(&self) -> RunConfig {
        RunConfig::new()
            .with_tester(&self.tester)
            .with_extension(&self.extension)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    match parse_args(std::env::args_os()).and_then(execute) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                println!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Parse command-line arguments.
///
/// `--help` and `--version` come back as an error carrying `ExitCode::SUCCESS`
/// so `run()` prints them and exits 0. Every other parse failure (missing or
/// extra `DIR`, unknown flag) carries the usage text and `ExitCode::FAILURE`.
pub fn parse_args<I, T>(args: I) -> CliResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let message = e.to_string().trim_end().to_string();
        if e.use_stderr() {
            CliError::failure(message)
        } else {
            CliError::new(message, ExitCode::SUCCESS)
        }
    })
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.config();
    commands::test_dir(&cli.dir, &config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_dir() {
        let cli = Cli::try_parse_from(["test-dir", "docs"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("docs"));
        assert_eq!(cli.tester, PathBuf::from("obj/clang/rel/test"));
        assert_eq!(cli.extension, "chm");
    }

    #[test]
    fn test_cli_requires_dir() {
        let err = Cli::try_parse_from(["test-dir"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_rejects_extra_argument() {
        assert!(Cli::try_parse_from(["test-dir", "a", "b"]).is_err());
    }

    #[test]
    fn test_parse_args_usage_error_exits_one() {
        let err = parse_args(["test-dir"]).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("Usage"));

        let err = parse_args(["test-dir", "a", "b"]).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_parse_args_help_and_version_exit_zero() {
        let err = parse_args(["test-dir", "--help"]).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::SUCCESS);
        assert!(err.message.contains("--ext"));

        let err = parse_args(["test-dir", "--version"]).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::SUCCESS);
        assert!(err.message.contains(VERSION));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from(["test-dir", "--tester", "bin/chm-check", "--ext", ".CHI", "docs"]).unwrap();
        let config = cli.config();
        assert_eq!(config.tester, PathBuf::from("bin/chm-check"));
        assert_eq!(config.extension, "chi");
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

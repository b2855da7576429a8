//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use crate::config::RunConfig;
use crate::runner::{ProcessExecutor, TestExecutor};
use crate::walker::{ConsoleReporter, WalkReporter, walk};

use super::{CliError, CliResult, ExitCode};

/// Test every matching file under `dir` with the configured tester.
///
/// Fails without scanning if the tester is missing. A halted walk yields
/// `ExitCode::FAILURE`; its details have already been printed.
pub fn test_dir(dir: &Path, config: &RunConfig) -> CliResult<ExitCode> {
    let mut executor = ProcessExecutor::new(&config.tester);
    let mut reporter = ConsoleReporter::new();
    test_dir_with(dir, config, &mut executor, &mut reporter)
}

/// Like `test_dir`, with the executor and reporter supplied by the caller.
pub fn test_dir_with<E, R>(dir: &Path, config: &RunConfig, executor: &mut E, reporter: &mut R) -> CliResult<ExitCode>
where
    E: TestExecutor + ?Sized,
    R: WalkReporter + ?Sized,
{
    config.validate().map_err(|e| CliError::failure(e.to_string()))?;

    let summary = walk(dir, config, executor, reporter);
    if summary.is_halted() {
        // Failure details and summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

//! Test runner
//!
//! Spawns the external tester once per file and captures everything it writes.
//!
//! ## I/O Boundary
//!
//! Process execution sits behind the `TestExecutor` trait so the walker can be
//! driven by a stub in tests. `ProcessExecutor` is the real implementation:
//! it runs `<tester> <file>`, blocks until the child exits, and treats a
//! non-zero exit status as a failure. There is no timeout and no retry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

/// Output captured from one tester invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// How a test invocation went wrong.
#[derive(Debug, Error)]
pub enum RunError {
    /// The tester could not be started at all.
    #[error("failed to start '{}': {source}", .tester.display())]
    Spawn {
        tester: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tester ran and reported failure.
    #[error("{0}")]
    Exit(ExitDescription),
}

/// Non-successful exit of the tester, rendered as `exit status N` or `signal: N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDescription {
    Code(i32),
    Signal(i32),
    Unknown,
}

impl From<ExitStatus> for ExitDescription {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitDescription::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitDescription::Signal(signal);
            }
        }
        ExitDescription::Unknown
    }
}

impl fmt::Display for ExitDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitDescription::Code(code) => write!(f, "exit status {}", code),
            ExitDescription::Signal(signal) => write!(f, "signal: {}", signal),
            ExitDescription::Unknown => write!(f, "exit status unknown"),
        }
    }
}

/// A failed invocation together with whatever the tester wrote before failing.
///
/// `output` is empty when the tester could not be started.
#[derive(Debug)]
pub struct RunFailure {
    pub error: RunError,
    pub output: RunOutput,
}

/// Outcome of testing one file.
pub type RunResult = Result<RunOutput, RunFailure>;

/// Runs the tester against a single file.
pub trait TestExecutor {
    /// Test `file`, blocking until the verdict is known.
    fn run(&mut self, file: &Path) -> RunResult;
}

/// Spawns the tester as a child process (`<tester> <file>`).
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    tester: PathBuf,
}

impl ProcessExecutor {
    pub fn new(tester: impl Into<PathBuf>) -> Self {
        Self { tester: tester.into() }
    }

    pub fn tester(&self) -> &Path {
        &self.tester
    }
}

impl TestExecutor for ProcessExecutor {
    fn run(&mut self, file: &Path) -> RunResult {
        tracing::debug!(tester = %self.tester.display(), file = %file.display(), "spawning tester");

        let output = Command::new(&self.tester).arg(file).output().map_err(|e| RunFailure {
            error: RunError::Spawn {
                tester: self.tester.clone(),
                source: e,
            },
            output: RunOutput::default(),
        })?;

        let captured = RunOutput::new(output.stdout, output.stderr);
        if output.status.success() {
            tracing::debug!(file = %file.display(), "tester passed");
            Ok(captured)
        } else {
            tracing::debug!(file = %file.display(), status = %output.status, "tester failed");
            Err(RunFailure {
                error: RunError::Exit(output.status.into()),
                output: captured,
            })
        }
    }
}

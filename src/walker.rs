//! Directory walker
//!
//! Depth-first traversal of a root directory that hands every matching file
//! to a `TestExecutor` and stops at the first failing test.
//!
//! ## Traversal
//!
//! The root is visited first, then the entries of each directory in file-name
//! order. Symlinks are never followed. An entry whose metadata cannot be read,
//! or a directory that cannot be listed, is reported and skipped; EACCES
//! ("permission denied") is skipped without any output.
//!
//! ## States
//!
//! The walk is either *scanning* or *halted*. A failing test moves it to
//! *halted* and unwinds the traversal through `ControlFlow::Break`; nothing
//! after the failing file is visited.
//!
//! ## WalkReporter Trait
//!
//! All console output goes through `WalkReporter`, so the walk itself never
//! prints. `ConsoleReporter` writes the human-readable transcript.

use std::fs;
use std::io::{self, Stdout, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::filter::is_target_file;
use crate::runner::{RunFailure, RunOutput, TestExecutor};

// ============================================================================
// Walk Reporter Trait
// ============================================================================

/// Receives walk events in traversal order.
pub trait WalkReporter {
    /// Called once before the root is visited
    fn on_start(&mut self, _root: &Path) {}

    /// Called when a matching file is about to be tested
    fn on_file(&mut self, path: &Path);

    /// Called for traversal errors other than permission-denied
    fn on_traversal_error(&mut self, path: &Path, error: &io::Error);

    /// Called when the tester accepted a file
    fn on_pass(&mut self, path: &Path, output: &RunOutput);

    /// Called when the tester rejected a file (or could not be run on it)
    fn on_fail(&mut self, path: &Path, failure: &RunFailure);

    /// Called once after the walk has finished or halted
    fn on_complete(&mut self, _summary: &WalkSummary) {}
}

/// Plain-text reporter; writes to stdout unless given another writer.
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
}

impl ConsoleReporter<Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleReporter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Console output is best-effort: a closed stdout must not abort the walk.
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn quoted_stream(&mut self, label: &str, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.line(&format!("{}:\n'{}'", label, String::from_utf8_lossy(bytes)));
        }
    }
}

impl<W: Write> WalkReporter for ConsoleReporter<W> {
    fn on_start(&mut self, root: &Path) {
        self.line(&format!("starting in '{}'", root.display()));
    }

    fn on_file(&mut self, path: &Path) {
        self.line(&path.display().to_string());
    }

    fn on_traversal_error(&mut self, path: &Path, error: &io::Error) {
        self.line(&format!("error on path: '{}', error: '{}'", path.display(), error));
    }

    fn on_pass(&mut self, _path: &Path, output: &RunOutput) {
        if !output.stdout.is_empty() {
            self.line(&String::from_utf8_lossy(&output.stdout));
        }
        self.quoted_stream("stderr", &output.stderr);
    }

    fn on_fail(&mut self, path: &Path, failure: &RunFailure) {
        self.line(&format!("failed with '{}' on '{}'", failure.error, path.display()));
        self.quoted_stream("stdout", &failure.output.stdout);
        self.quoted_stream("stderr", &failure.output.stderr);
    }

    fn on_complete(&mut self, summary: &WalkSummary) {
        let mut text = match &summary.failed {
            Some(path) => format!("stopped after {} file(s): '{}' failed", summary.tested, path.display()),
            None => format!("tested {} file(s), {} passed", summary.tested, summary.passed),
        };
        if summary.traversal_errors > 0 {
            text.push_str(&format!(", {} traversal error(s)", summary.traversal_errors));
        }
        text.push_str(&format!(" in {:.2}s", summary.duration.as_secs_f64()));
        self.line(&text);
        let _ = self.out.flush();
    }
}

// ============================================================================
// Walker
// ============================================================================

/// Whether the walk may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Scanning,
    Halted,
}

/// Summary of a finished walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSummary {
    /// Matching files handed to the tester
    pub tested: usize,
    pub passed: usize,
    /// Reported traversal errors (permission-denied is not counted)
    pub traversal_errors: usize,
    /// The file that halted the walk
    pub failed: Option<PathBuf>,
    pub duration: Duration,
}

impl WalkSummary {
    pub fn state(&self) -> WalkState {
        if self.failed.is_some() { WalkState::Halted } else { WalkState::Scanning }
    }

    pub fn is_halted(&self) -> bool {
        self.state() == WalkState::Halted
    }
}

/// Walks one directory tree, testing matching files until one fails.
pub struct Walker<'a, E: ?Sized, R: ?Sized> {
    config: &'a RunConfig,
    executor: &'a mut E,
    reporter: &'a mut R,
    list_dir: ListDir,
    tested: usize,
    passed: usize,
    traversal_errors: usize,
    failed: Option<PathBuf>,
}

impl<'a, E, R> Walker<'a, E, R>
where
    E: TestExecutor + ?Sized,
    R: WalkReporter + ?Sized,
{
    pub fn new(config: &'a RunConfig, executor: &'a mut E, reporter: &'a mut R) -> Self {
        Self {
            config,
            executor,
            reporter,
            list_dir: read_dir_entries,
            tested: 0,
            passed: 0,
            traversal_errors: 0,
            failed: None,
        }
    }

    #[cfg(test)]
    fn with_list_dir(mut self, list_dir: ListDir) -> Self {
        self.list_dir = list_dir;
        self
    }

    /// Walk `root` to completion (or to the first failure).
    pub fn run(mut self, root: &Path) -> WalkSummary {
        let start = Instant::now();
        self.reporter.on_start(root);

        let _ = self.visit(root);

        let summary = WalkSummary {
            tested: self.tested,
            passed: self.passed,
            traversal_errors: self.traversal_errors,
            failed: self.failed.take(),
            duration: start.elapsed(),
        };
        tracing::debug!(
            tested = summary.tested,
            passed = summary.passed,
            halted = summary.is_halted(),
            "walk finished"
        );
        self.reporter.on_complete(&summary);
        summary
    }

    fn visit(&mut self, path: &Path) -> ControlFlow<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                self.traversal_error(path, e);
                return ControlFlow::Continue(());
            }
        };

        if meta.is_dir() {
            return self.visit_dir(path);
        }

        if !is_target_file(path, &meta.file_type(), &self.config.extension) {
            tracing::trace!(path = %path.display(), "skipping");
            return ControlFlow::Continue(());
        }

        self.test_file(path)
    }

    fn visit_dir(&mut self, dir: &Path) -> ControlFlow<()> {
        let entries = match (self.list_dir)(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.traversal_error(dir, e);
                return ControlFlow::Continue(());
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => children.push(path),
                Err(e) => self.traversal_error(dir, e),
            }
        }
        children.sort();

        for child in children {
            if self.visit(&child).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn test_file(&mut self, path: &Path) -> ControlFlow<()> {
        self.reporter.on_file(path);
        self.tested += 1;

        match self.executor.run(path) {
            Ok(output) => {
                self.passed += 1;
                self.reporter.on_pass(path, &output);
                ControlFlow::Continue(())
            }
            Err(failure) => {
                tracing::debug!(path = %path.display(), error = %failure.error, "halting walk");
                self.reporter.on_fail(path, &failure);
                self.failed = Some(path.to_path_buf());
                ControlFlow::Break(())
            }
        }
    }

    fn traversal_error(&mut self, path: &Path, error: io::Error) {
        if is_permission_denied(&error) {
            tracing::trace!(path = %path.display(), "permission denied, skipping");
            return;
        }
        self.traversal_errors += 1;
        self.reporter.on_traversal_error(path, &error);
    }
}

/// Lists a directory; the outer error means it could not be opened.
type ListDir = fn(&Path) -> io::Result<Vec<io::Result<PathBuf>>>;

fn read_dir_entries(dir: &Path) -> io::Result<Vec<io::Result<PathBuf>>> {
    Ok(fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path())).collect())
}

/// EACCES on Linux and macOS.
#[cfg(unix)]
const EACCES: i32 = 13;

/// Only "permission denied" (EACCES) is silenced; EPERM and friends are reported.
fn is_permission_denied(error: &io::Error) -> bool {
    #[cfg(unix)]
    if let Some(code) = error.raw_os_error() {
        return code == EACCES;
    }
    error.kind() == io::ErrorKind::PermissionDenied
}

/// Walk `root` with the given executor and reporter.
pub fn walk<E, R>(root: &Path, config: &RunConfig, executor: &mut E, reporter: &mut R) -> WalkSummary
where
    E: TestExecutor + ?Sized,
    R: WalkReporter + ?Sized,
{
    Walker::new(config, executor, reporter).run(root)
}

// ============================================================================
// Tests
// ============================================================================

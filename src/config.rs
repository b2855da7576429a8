//! Run configuration
//!
//! The tester location and target extension are passed explicitly into the
//! walker rather than read from globals.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::filter::normalize_extension;

/// Tester location used when none is given, relative to the working directory.
pub const DEFAULT_TESTER: &str = "obj/clang/rel/test";

/// Extension of the files handed to the tester.
pub const DEFAULT_EXTENSION: &str = "chm";

/// Precondition failures detected before any scanning starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{}' doesn't exist", .0.display())]
    MissingTester(PathBuf),

    #[error("'{}' is not a regular file", .0.display())]
    TesterNotAFile(PathBuf),

    #[error("target extension must not be empty")]
    EmptyExtension,
}

/// Configuration for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Executable invoked as `<tester> <file>`
    pub tester: PathBuf,
    /// Target extension, bare and lowercase (`chm`)
    pub extension: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tester: PathBuf::from(DEFAULT_TESTER),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tester executable
    pub fn with_tester(mut self, tester: impl Into<PathBuf>) -> Self {
        self.tester = tester.into();
        self
    }

    /// Set the target extension (leading dot and case are ignored)
    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extension = normalize_extension(ext);
        self
    }

    /// Check that the tester exists and is a regular file.
    ///
    /// Symlinks to a regular file are accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        check_tester(&self.tester)
    }
}

fn check_tester(tester: &Path) -> Result<(), ConfigError> {
    match fs::metadata(tester) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(ConfigError::TesterNotAFile(tester.to_path_buf())),
        Err(_) => Err(ConfigError::MissingTester(tester.to_path_buf())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.tester, PathBuf::from("obj/clang/rel/test"));
        assert_eq!(config.extension, "chm");
    }

    #[test]
    fn test_with_extension_normalizes() {
        let config = RunConfig::new().with_extension(".HHC");
        assert_eq!(config.extension, "hhc");
        // Other fields unchanged
        assert_eq!(config.tester, PathBuf::from(DEFAULT_TESTER));
    }

    #[test]
    fn test_validate_missing_tester() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new().with_tester(dir.path().join("nope"));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingTester(_)));
        assert!(err.to_string().ends_with("nope' doesn't exist"));
    }

    #[test]
    fn test_validate_directory_tester() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new().with_tester(dir.path());

        assert!(matches!(config.validate(), Err(ConfigError::TesterNotAFile(_))));
    }

    #[test]
    fn test_validate_regular_file_tester() {
        let dir = tempfile::tempdir().unwrap();
        let tester = dir.path().join("test");
        fs::write(&tester, b"#!/bin/sh\n").unwrap();

        assert!(RunConfig::new().with_tester(&tester).validate().is_ok());
    }

    #[test]
    fn test_validate_empty_extension() {
        let dir = tempfile::tempdir().unwrap();
        let tester = dir.path().join("test");
        fs::write(&tester, b"").unwrap();

        let config = RunConfig::new().with_tester(&tester).with_extension(".");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyExtension)));
    }
}

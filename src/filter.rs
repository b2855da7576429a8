//! Path filter
//!
//! Decides which filesystem entries are handed to the tester: regular files
//! whose extension matches the configured target, compared case-insensitively.

use std::fs::FileType;
use std::path::Path;

/// Normalize a configured extension (`".CHM"`, `"chm"`) to its bare lowercase form.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Check whether `path` carries the `target` extension (case-insensitive).
///
/// `target` may be given with or without a leading dot. A path without an
/// extension never matches, not even an empty target.
pub fn has_target_extension(path: &Path, target: &str) -> bool {
    let target = target.trim_start_matches('.');
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => !target.is_empty() && ext.eq_ignore_ascii_case(target),
        None => false,
    }
}

/// Check whether an entry should be tested: a regular file with the target extension.
///
/// Symlinks are reported by `symlink_metadata` as their own file type and are
/// therefore never matched.
pub fn is_target_file(path: &Path, file_type: &FileType, target: &str) -> bool {
    file_type.is_file() && has_target_extension(path, target)
}

//! Recursive directory listing with include filters, excludes and sorting.
//!
//! Two traversals share one post-processing pipeline:
//!
//! - [`scan_sync`] walks depth-first on the calling thread. A directory entry
//!   is emitted before its descendants, siblings follow filesystem enumeration
//!   order.
//! - [`scan_async`] lists directories with `tokio::fs` and probes every child
//!   concurrently. Entries from different sub-directories arrive in completion
//!   order, so request a sort when the output has to be stable.
//!
//! After traversal the include filters run (see [`filter`]), then results are
//! optionally made absolute, then optionally sorted (caseless first, then
//! case-sensitive).

use std::{
    fs,
    path::{Component, Path, PathBuf, MAIN_SEPARATOR},
};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::error::{validation, ScanError};
use crate::types::{PathList, ScanOptions};

mod concurrent;
pub mod filter;

pub use filter::{apply_filters, compile_filter, compile_filters, FilterMatcher};

/// Convenience value for scans without include filters.
pub const NO_FILTERS: &[&str] = &[];

/// Lists `root` on the calling thread.
///
/// A missing root yields an empty list. Any listing failure below an existing
/// root is returned as [`ScanError::Filesystem`]; `ignore_errors` is not
/// consulted here.
pub fn scan_sync<P, S>(root: P, filters: &[S], options: &ScanOptions) -> Result<PathList, ScanError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let root = root.as_ref();
    if !root.exists() {
        debug!("Scan root {} does not exist, returning empty listing", root.display());
        return Ok(Vec::new());
    }
    let filters = compile_filters(filters)?;
    let ctx = WalkContext::new(options)?;

    let found = walk_sync(&ctx, root, "")?;
    debug!("Sync scan of {} found {} entries", root.display(), found.len());
    finish(root, found, &filters, options)
}

/// Lists `root` without blocking the runtime.
///
/// The root is validated before anything touches the filesystem. With
/// `ignore_errors` a failing listing or stat drops the affected entry or
/// subtree, otherwise the first failure aborts the scan.
pub async fn scan_async<P, S>(
    root: P,
    filters: &[S],
    options: &ScanOptions,
) -> Result<PathList, ScanError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let root = root.as_ref();
    validation::validate_root(root)?;
    let filters = compile_filters(filters)?;
    let ctx = WalkContext::new(options)?;

    if !tokio::fs::try_exists(root).await.unwrap_or(false) {
        debug!("Scan root {} does not exist, returning empty listing", root.display());
        return Ok(Vec::new());
    }

    let found = concurrent::walk_dir(&ctx, root.to_path_buf(), String::new()).await?;
    debug!("Async scan of {} found {} entries", root.display(), found.len());
    finish(root, found, &filters, options)
}

/// `true` if `path` exists and is a directory. Never fails.
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Per-scan traversal settings shared by both walkers.
pub(crate) struct WalkContext<'o> {
    pub(crate) options: &'o ScanOptions,
    excludes: GlobSet,
}

impl<'o> WalkContext<'o> {
    fn new(options: &'o ScanOptions) -> Result<Self, ScanError> {
        Ok(Self { options, excludes: build_globset(&options.excludes)? })
    }

    /// Whether a root-relative entry is pruned by the exclude globs.
    pub(crate) fn excluded(&self, rel: &str) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let s = rel.trim_end_matches(MAIN_SEPARATOR).replace('\\', "/");
        self.excludes.is_match(&s)
    }

    /// Whether the walker should enter a directory with this name.
    pub(crate) fn descends(&self, name: &str) -> bool {
        !self.options.non_recursive && (self.options.include_hidden || !name.starts_with('.'))
    }

    /// Swallows `err` when `ignore_errors` is set, otherwise hands it back.
    pub(crate) fn swallow(&self, err: ScanError) -> Result<(), ScanError> {
        if self.options.ignore_errors {
            debug!("Ignoring scan error: {}", err);
            Ok(())
        } else {
            Err(err)
        }
    }
}

fn walk_sync(ctx: &WalkContext<'_>, dir: &Path, prefix: &str) -> Result<PathList, ScanError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScanError::fs(dir, e))? {
        let entry = entry.map_err(|e| ScanError::fs(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = format!("{}{}", prefix, name);

        if is_directory(&path) {
            let rel_dir = format!("{}{}", rel, MAIN_SEPARATOR);
            if ctx.excluded(&rel_dir) {
                continue;
            }
            if ctx.options.include_directories {
                found.push(rel_dir.clone());
            }
            if ctx.descends(&name) {
                found.extend(walk_sync(ctx, &path, &rel_dir)?);
            }
        } else if !ctx.excluded(&rel) {
            found.push(rel);
        }
    }
    Ok(found)
}

fn finish(
    root: &Path,
    found: PathList,
    filters: &[FilterMatcher],
    options: &ScanOptions,
) -> Result<PathList, ScanError> {
    let mut paths = apply_filters(found, filters);

    if options.absolute_paths {
        let base = absolute_prefix(root)?;
        paths = paths.into_iter().map(|p| format!("{}{}", base, p)).collect();
    }
    if options.caseless_sort {
        paths.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    }
    if options.case_sort {
        paths.sort();
    }
    Ok(paths)
}

/// `root` as a string with exactly one trailing separator.
pub(crate) fn with_trailing_separator(root: &Path) -> String {
    let s = root.to_string_lossy();
    let trimmed = s.trim_end_matches(|c: char| c == '/' || c == MAIN_SEPARATOR);
    format!("{}{}", trimmed, MAIN_SEPARATOR)
}

/// Resolves `root` against the current directory and folds `.` and `..`
/// lexically. Symlinks are not resolved.
fn absolute_prefix(root: &Path) -> Result<String, ScanError> {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir().map_err(|e| ScanError::fs(root, e))?.join(root)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(with_trailing_separator(&normalized))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        if p.trim().is_empty() {
            continue;
        }
        // Backslashes become slashes so patterns line up with `WalkContext::excluded`.
        let norm = p.trim().replace('\\', "/");
        b.add(Glob::new(&norm)?);
    }
    Ok(b.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_separator_is_normalized() {
        let sep = MAIN_SEPARATOR;
        assert_eq!(with_trailing_separator(Path::new("views")), format!("views{}", sep));
        assert_eq!(with_trailing_separator(Path::new("views//")), format!("views{}", sep));
    }

    #[test]
    fn absolute_prefix_folds_dot_segments() {
        let cwd = std::env::current_dir().unwrap();
        let expected = with_trailing_separator(&cwd.join("b"));
        assert_eq!(absolute_prefix(Path::new("./a/../b/")).unwrap(), expected);
    }

    #[test]
    fn hidden_and_non_recursive_control_descent() {
        let plain = ScanOptions::default();
        let ctx = WalkContext::new(&plain).unwrap();
        assert!(ctx.descends("src"));
        assert!(!ctx.descends(".git"));

        let hidden = ScanOptions::from_bits(crate::types::INCLUDE_HIDDEN);
        assert!(WalkContext::new(&hidden).unwrap().descends(".git"));

        let flat = ScanOptions::from_bits(crate::types::INCLUDE_HIDDEN | crate::types::NON_RECURSIVE);
        let ctx = WalkContext::new(&flat).unwrap();
        assert!(!ctx.descends("src"));
        assert!(!ctx.descends(".git"));
    }

    #[test]
    fn excludes_match_relative_paths() {
        let options = ScanOptions::default().with_excludes(["**/node_modules", "*.tmp"]);
        let ctx = WalkContext::new(&options).unwrap();
        assert!(ctx.excluded(&format!("node_modules{}", MAIN_SEPARATOR)));
        assert!(ctx.excluded(&format!("web{}node_modules{}", MAIN_SEPARATOR, MAIN_SEPARATOR)));
        assert!(ctx.excluded("scratch.tmp"));
        assert!(!ctx.excluded("index.html"));
    }

    #[test]
    fn invalid_exclude_is_rejected() {
        let options = ScanOptions::default().with_excludes(["a[b"]);
        assert!(matches!(WalkContext::new(&options), Err(ScanError::InvalidExclude(_))));
    }
}

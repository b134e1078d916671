//! Forced removal of generated files
//!
//! Entries resolve against the task's working directory. Missing paths are
//! not an error.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate, Context, Verbosity};
use crate::ui;
use crate::utils::{has_glob_meta, is_contained_path};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Remove every path matched by `entries`, returning what was removed
pub fn clean_paths(entries: &[String], ctx: &Context) -> ExecutionResult<Vec<PathBuf>> {
    let mut removed = Vec::new();

    let root = match fs::canonicalize(&ctx.working_dir) {
        Ok(root) => root,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, nothing to clean", ctx.working_dir.display());
            return Ok(removed);
        }
        Err(e) => return Err(clean_error(&ctx.working_dir, e)),
    };

    for entry in entries {
        let entry = interpolate(entry, &ctx.vars)?;
        if !is_contained_path(&entry) {
            return Err(ExecutionError::Clean {
                path: PathBuf::from(entry),
                error: "path escapes the task directory".to_string(),
            });
        }
        for path in expand(&ctx.working_dir, &entry)? {
            if !parent_stays_under(&path, &root)? {
                return Err(ExecutionError::Clean {
                    path,
                    error: "path resolves outside the task directory".to_string(),
                });
            }
            if remove_path(&path, ctx.dry_run)? {
                if ctx.verbosity >= Verbosity::Normal {
                    ui::print_removed(&path, ctx.dry_run);
                }
                removed.push(path);
            }
        }
    }

    Ok(removed)
}

/// Resolve one entry to concrete paths
fn expand(base: &Path, entry: &str) -> ExecutionResult<Vec<PathBuf>> {
    let joined = base.join(entry);
    if !has_glob_meta(entry) {
        return Ok(vec![joined]);
    }

    // Only the entry is a pattern; the base is matched literally
    let pattern = format!(
        "{}{}{}",
        glob::Pattern::escape(&base.to_string_lossy()),
        std::path::MAIN_SEPARATOR,
        entry
    );
    let paths = glob::glob(&pattern).map_err(|e| ExecutionError::Clean {
        path: joined.clone(),
        error: e.to_string(),
    })?;

    paths
        .map(|path| {
            path.map_err(|e| ExecutionError::Clean {
                path: e.path().to_path_buf(),
                error: e.error().to_string(),
            })
        })
        .collect()
}

/// Whether the directory holding `path` resolves, through any symlinks,
/// to somewhere under `root`. A missing parent holds nothing to remove.
fn parent_stays_under(path: &Path, root: &Path) -> ExecutionResult<bool> {
    let Some(parent) = path.parent() else {
        return Ok(false);
    };

    match fs::canonicalize(parent) {
        Ok(parent) => Ok(parent.starts_with(root)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(clean_error(parent, e)),
    }
}

/// Remove a file, symlink or directory tree. Returns false if it did not exist.
fn remove_path(path: &Path, dry_run: bool) -> ExecutionResult<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("nothing to remove at {}", path.display());
            return Ok(false);
        }
        Err(e) => return Err(clean_error(path, e)),
    };

    if dry_run {
        return Ok(true);
    }

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(clean_error(path, e)),
    }
}

fn clean_error(path: &Path, error: io::Error) -> ExecutionError {
    ExecutionError::Clean {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}

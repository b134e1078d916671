//! Path helpers shared by the config loader and the runner

use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base_dir` unless it is already absolute
pub fn resolve_path(base_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Build a PATH value with `prefix` ahead of the inherited PATH
pub fn search_path(prefix: &[PathBuf]) -> Result<OsString, env::JoinPathsError> {
    let inherited = env::var_os("PATH").unwrap_or_default();
    env::join_paths(prefix.iter().cloned().chain(env::split_paths(&inherited)))
}

/// Whether a clean entry should go through glob expansion
pub fn has_glob_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// A clean entry must be relative, non-empty, and never climb out of its directory
pub fn is_contained_path(path: &str) -> bool {
    let mut depth = 0usize;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    depth > 0
}

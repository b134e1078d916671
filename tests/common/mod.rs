//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The bundled freedit task file
pub const FREEDIT_TASKS: &str = include_str!("../../demos/freedit/rundown.yml");

/// Create a temporary directory with a rundown.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rundown.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a freedit-shaped project: the bundled task file plus
/// `apps/client` and `apps/server`
pub fn create_freedit_project() -> (TempDir, PathBuf) {
    let (temp_dir, config_path) = create_test_config(FREEDIT_TASKS);
    for app in ["client", "server"] {
        fs::create_dir_all(temp_dir.path().join("apps").join(app)).unwrap();
    }
    (temp_dir, config_path)
}

/// Canonical form of a path printed by `pwd`
pub fn canonical_output(path: &Path) -> PathBuf {
    let text = fs::read_to_string(path).unwrap();
    fs::canonicalize(text.trim()).unwrap()
}

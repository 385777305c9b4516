//! Locating optional real observation files and scratch directories.

use std::path::PathBuf;

/// Directories searched for real observation files, relative to the
/// workspace root. `data/aia` is where the composite tool caches downloads.
const TESTDATA_DIRS: &[&str] = &["testdata", "crates/fits-io/testdata", "data/aia"];

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or(manifest_dir)
}

/// Find a real observation file, checking `TEST_DATA_DIR` first and then
/// the workspace test data directories.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    std::env::var_os("TEST_DATA_DIR")
        .map(PathBuf::from)
        .into_iter()
        .chain(TESTDATA_DIRS.iter().map(|dir| root.join(dir)))
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// Scratch directory removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

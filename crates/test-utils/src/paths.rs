//! Locating sample GRIB2 files and scratch directories for tests.
//!
//! Real model output is too large to keep in the repository. Tests that need
//! it look in a few well-known places and skip themselves when nothing is
//! found (see [`require_test_file!`](crate::require_test_file)).

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// Derived from this crate's manifest directory, which sits at
/// `crates/test-utils/`.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a sample file.
///
/// Locations are checked in this order:
/// 1. `$TEST_DATA_DIR` (if set)
/// 2. `crates/grib2-parser/testdata/`
/// 3. `crates/wind-analysis/testdata/`
/// 4. `testdata/` at the workspace root
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("grib2-parser").join(name),
        crate_testdata_dir("wind-analysis").join(name),
        root.join("testdata").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for plot output, removed on drop.
pub fn temp_output_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("wind_plot_")
        .tempdir()
        .expect("Failed to create temporary output directory")
}

/// Writes `bytes` to `name` inside a fresh temporary directory.
///
/// The directory is returned alongside the path so it outlives the test body.
pub fn write_temp_file(name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = temp_output_dir();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("Failed to write temporary test file");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_missing_sample_is_none() {
        assert!(find_test_file("no_such_sample_file.grb2").is_none());
    }

    #[test]
    fn test_write_temp_file() {
        let (dir, path) = write_temp_file("sample.bin", b"GRIB");
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"GRIB");
    }
}

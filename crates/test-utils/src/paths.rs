//! Locating test data and writing throwaway config files.

use std::path::{Path, PathBuf};

/// Environment variable naming an extra directory to search first.
pub const TEST_DATA_ENV: &str = "TEST_DATA_DIR";

/// Directory holding the workspace `Cargo.toml` (two levels above this crate).
pub fn workspace_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    here.ancestors().nth(2).unwrap_or(here).to_path_buf()
}

/// `crates/<crate_name>/testdata` under the workspace root.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    let mut dir = workspace_root();
    dir.extend(["crates", crate_name, "testdata"]);
    dir
}

/// First existing `name` in `$TEST_DATA_DIR`, the grid crate's `testdata/`,
/// or the workspace `testdata/`.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let override_dir = std::env::var_os(TEST_DATA_ENV).map(PathBuf::from);
    override_dir
        .into_iter()
        .chain([crate_testdata_dir("planetary-grid"), workspace_root().join("testdata")])
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// `name` in one crate's `testdata/`, if present.
pub fn find_crate_test_file(crate_name: &str, name: &str) -> Option<PathBuf> {
    Some(crate_testdata_dir(crate_name).join(name)).filter(|path| path.is_file())
}

/// Fresh temporary directory, deleted on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("planetary-grid-")
        .tempdir()
        .expect("create temporary test directory")
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_temp_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").is_file());
    }

    #[test]
    fn test_grid_fixtures_are_found() {
        let path = find_test_file("equal_area.yaml").expect("equal_area.yaml in testdata");
        assert!(path.starts_with(crate_testdata_dir("planetary-grid")));
        assert_eq!(find_crate_test_file("planetary-grid", "equal_area.yaml"), Some(path));
        assert!(find_test_file("no_such_grid.yaml").is_none());
    }

    #[test]
    fn test_write_temp_file() {
        let dir = temp_test_dir();
        let path = write_temp_file(dir.path(), "grid.yaml", "grid:\n  type: equal_area\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "grid:\n  type: equal_area\n");
    }
}

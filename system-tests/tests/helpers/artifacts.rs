// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Per-test folders for suite reports and stored results.
// Purpose: Keep the JSON a failing run produced for inspection after the fact.
// Dependencies: system-tests, serde, serde_json
// ============================================================================

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use system_tests::config::SystemTestConfig;

/// Artifact folder owned by one system test.
#[derive(Debug, Clone)]
pub struct TestArtifacts {
    /// Folder the artifacts are written into.
    root: PathBuf,
}

impl TestArtifacts {
    /// Creates the folder for `test_name` as resolved by [`SystemTestConfig`].
    pub fn for_test(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let root = config.artifact_dir(test_name, stamp).map_err(io::Error::other)?;
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Writes `value` as pretty-printed JSON under `name`.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

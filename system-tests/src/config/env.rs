// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed settings for the stubcheck system tests.
// Purpose: Select the mock server, artifact directory, and timeout floor.
// Dependencies: stubcheck-http
// ============================================================================

//! ## Overview
//! System tests read four `STUBCHECK_SYSTEM_TEST_*` variables. Parsing goes
//! through a lookup function so the rules can be exercised without touching
//! the process environment. Every malformed value is an error; none is
//! silently ignored.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use stubcheck_http::HttpClientConfig;

// ============================================================================
// SECTION: Variables
// ============================================================================

/// Environment variables read by the system tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Directory that receives per-test artifact folders.
    RunRoot,
    /// External WireMock base URL; the in-process stub server is used when unset.
    MockUrl,
    /// Lower bound, in seconds, for HTTP request timeouts.
    TimeoutSeconds,
    /// Permits reusing artifact folders under an explicit run root.
    AllowOverwrite,
}

impl SystemTestEnv {
    /// Every variable, in documentation order.
    pub const ALL: [Self; 4] =
        [Self::RunRoot, Self::MockUrl, Self::TimeoutSeconds, Self::AllowOverwrite];

    /// Returns the variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "STUBCHECK_SYSTEM_TEST_RUN_ROOT",
            Self::MockUrl => "STUBCHECK_SYSTEM_TEST_MOCK_URL",
            Self::TimeoutSeconds => "STUBCHECK_SYSTEM_TEST_TIMEOUT_SEC",
            Self::AllowOverwrite => "STUBCHECK_SYSTEM_TEST_ALLOW_OVERWRITE",
        }
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Default parent directory for artifacts when no run root is set.
const DEFAULT_ARTIFACT_DIR: &str = "target/system-tests";

/// Parsed system-test settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Explicit artifact directory.
    pub run_root: Option<PathBuf>,
    /// External mock server base URL, already checked to be http(s).
    pub mock_url: Option<String>,
    /// Timeout floor for HTTP collaborators.
    pub timeout: Option<Duration>,
    /// Whether artifact folders under `run_root` may be reused.
    pub allow_overwrite: bool,
}

impl SystemTestConfig {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable when a value is non-UTF-8, empty,
    /// or malformed.
    pub fn load() -> Result<Self, String> {
        Self::from_lookup(read_env_strict)
    }

    /// Builds the settings from `lookup`, which returns the raw value of a variable.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable when a value is empty or malformed.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<Option<String>, String>,
    ) -> Result<Self, String> {
        let read = |var: SystemTestEnv| -> Result<Option<String>, String> {
            let name = var.as_str();
            match lookup(name)? {
                Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
                Some(value) => Ok(Some(value.trim().to_string())),
                None => Ok(None),
            }
        };
        let mock_url = read(SystemTestEnv::MockUrl)?;
        if let Some(raw) = &mock_url {
            HttpClientConfig::new(raw)
                .map_err(|err| format!("{}: {err}", SystemTestEnv::MockUrl.as_str()))?;
        }
        Ok(Self {
            run_root: read(SystemTestEnv::RunRoot)?.map(PathBuf::from),
            mock_url,
            timeout: read(SystemTestEnv::TimeoutSeconds)?
                .map(|raw| parse_timeout_seconds(&raw))
                .transpose()?,
            allow_overwrite: read(SystemTestEnv::AllowOverwrite)?
                .map(|raw| parse_flag(&raw))
                .transpose()?
                .unwrap_or(false),
        })
    }

    /// Resolves the artifact folder for `test_name`.
    ///
    /// Without a run root, folders land under a fresh `run_{stamp}` directory so
    /// repeated runs never collide.
    ///
    /// # Errors
    ///
    /// Returns an error when the folder already exists under an explicit run
    /// root and overwriting was not allowed.
    pub fn artifact_dir(&self, test_name: &str, stamp: u128) -> Result<PathBuf, String> {
        let Some(run_root) = &self.run_root else {
            let run_dir = format!("run_{stamp}");
            return Ok(Path::new(DEFAULT_ARTIFACT_DIR).join(run_dir).join(test_name));
        };
        let dir = run_root.join(test_name);
        if dir.exists() && !self.allow_overwrite {
            return Err(format!(
                "{} already exists; set {}=1 to reuse it",
                dir.display(),
                SystemTestEnv::AllowOverwrite.as_str()
            ));
        }
        Ok(dir)
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Reads `name` from the process environment, rejecting non-UTF-8 values.
///
/// # Errors
///
/// Returns an error when the value is not valid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Parses a whole number of seconds greater than zero.
fn parse_timeout_seconds(raw: &str) -> Result<Duration, String> {
    let name = SystemTestEnv::TimeoutSeconds.as_str();
    match raw.parse::<u64>() {
        Ok(0) => Err(format!("{name} must be greater than zero")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(format!("{name} must be a whole number of seconds")),
    }
}

/// Parses `1`/`0`/`true`/`false`.
fn parse_flag(raw: &str) -> Result<bool, String> {
    let name = SystemTestEnv::AllowOverwrite.as_str();
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(format!("{name} must be 1, 0, true, or false")),
    }
}

// crates/stubcheck-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Result Store
// Description: Durable ResultStore backed by a single SQLite file.
// Purpose: Keep exactly one row per test name, overwritten in place on re-runs.
// Dependencies: stubcheck-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements [`ResultStore`] over `SQLite`. Every write is one
//! `INSERT ... ON CONFLICT(test_name) DO UPDATE` statement, so concurrent
//! writers never observe a missing row between a check and an insert. Each
//! call opens its own connection and drops it on every return path; nothing
//! is held open between calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use stubcheck_core::ExecutionTime;
use stubcheck_core::ResultRecord;
use stubcheck_core::ResultStore;
use stubcheck_core::StatusCounts;
use stubcheck_core::StoreError;
use stubcheck_core::TestName;
use stubcheck_core::TestStatus;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "target/test-results.db";
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

/// Upsert keyed on the unique test name.
const UPSERT_SQL: &str = "INSERT INTO test_results (test_name, status, execution_time)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(test_name)
     DO UPDATE SET status = excluded.status, execution_time = excluded.execution_time";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` result store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a configuration for `path` with default pragmas.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self::for_path(DEFAULT_STORE_PATH)
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// The file is not a database or a stored value is unreadable.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid configuration or input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error.sqlite_error_code() {
            Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt) => {
                Self::Corrupt(error.to_string())
            }
            Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly | ErrorCode::DiskFull) => {
                Self::Io(error.to_string())
            }
            _ => Self::Db(error.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed result store.
///
/// # Invariants
/// - At most one row exists per test name.
/// - No connection outlives the call that opened it.
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    /// Store configuration.
    config: SqliteStoreConfig,
}

impl SqliteResultStore {
    /// Creates a store handle after validating the configured path.
    ///
    /// Nothing is opened until the first call.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] for unusable paths.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        Ok(Self {
            config,
        })
    }

    /// Creates a store handle and initializes its schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when validation or initialization fails.
    pub fn open(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        let store = Self::new(config)?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Creates the parent directory, the file, and the schema when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the file cannot be created or holds an
    /// unsupported schema version.
    pub fn initialize_schema(&self) -> Result<(), SqliteStoreError> {
        ensure_parent_dir(&self.config.path)?;
        let mut connection = open_connection(&self.config)?;
        initialize_schema(&mut connection)?;
        debug!(path = %self.config.path.display(), "result store initialized");
        Ok(())
    }

    /// Inserts or replaces the record for `test_name` with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn upsert_at(
        &self,
        test_name: &TestName,
        status: TestStatus,
        execution_time: ExecutionTime,
    ) -> Result<(), SqliteStoreError> {
        let connection = open_connection(&self.config)?;
        connection.execute(
            UPSERT_SQL,
            params![test_name.as_str(), status.as_str(), execution_time.to_string()],
        )?;
        debug!(test_name = %test_name, status = %status, "result upserted");
        Ok(())
    }

    /// Loads the record for `test_name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the read fails or the row is unreadable.
    pub fn get(&self, test_name: &TestName) -> Result<Option<ResultRecord>, SqliteStoreError> {
        let connection = open_read_connection(&self.config)?;
        let row = connection
            .query_row(
                "SELECT test_name, status, execution_time FROM test_results WHERE test_name = ?1",
                params![test_name.as_str()],
                map_raw_row,
            )
            .optional()?;
        row.map(RawRow::into_record).transpose()
    }

    /// Lists every record ordered by test name.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the read fails or any row is unreadable.
    pub fn list(&self) -> Result<Vec<ResultRecord>, SqliteStoreError> {
        let connection = open_read_connection(&self.config)?;
        let mut statement = connection.prepare(
            "SELECT test_name, status, execution_time FROM test_results ORDER BY test_name",
        )?;
        let rows = statement.query_map(params![], map_raw_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    /// Returns the number of stored records per status.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the read fails or a status label is unknown.
    pub fn status_counts(&self) -> Result<StatusCounts, SqliteStoreError> {
        let connection = open_read_connection(&self.config)?;
        let mut statement =
            connection.prepare("SELECT status, COUNT(1) FROM test_results GROUP BY status")?;
        let rows = statement
            .query_map(params![], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        let mut counts = StatusCounts::default();
        for row in rows {
            let (label, count) = row?;
            let status = parse_status(&label)?;
            let count = usize::try_from(count)
                .map_err(|_| SqliteStoreError::Corrupt(format!("negative count for {label}")))?;
            for _ in 0 .. count {
                counts.record(status);
            }
        }
        Ok(counts)
    }
}

impl ResultStore for SqliteResultStore {
    fn initialize(&self) -> Result<(), StoreError> {
        self.initialize_schema().map_err(StoreError::from)
    }

    fn upsert(&self, test_name: &TestName, status: TestStatus) -> Result<(), StoreError> {
        self.upsert_at(test_name, status, ExecutionTime::now()).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Untyped row as read from `test_results`.
struct RawRow {
    /// Stored test name.
    test_name: String,
    /// Stored status label.
    status: String,
    /// Stored timestamp text.
    execution_time: String,
}

impl RawRow {
    /// Validates every column and builds a record.
    fn into_record(self) -> Result<ResultRecord, SqliteStoreError> {
        let test_name = TestName::new(&self.test_name)
            .map_err(|err| SqliteStoreError::Corrupt(format!("stored test name: {err}")))?;
        let status = parse_status(&self.status)?;
        let execution_time = ExecutionTime::parse_text(&self.execution_time)
            .map_err(|err| SqliteStoreError::Corrupt(err.to_string()))?;
        Ok(ResultRecord {
            test_name,
            status,
            execution_time,
        })
    }
}

/// Maps a result row into its raw columns.
fn map_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        test_name: row.get(0)?,
        status: row.get(1)?,
        execution_time: row.get(2)?,
    })
}

/// Parses a stored status label.
fn parse_status(label: &str) -> Result<TestStatus, SqliteStoreError> {
    label.parse().map_err(|err| SqliteStoreError::Corrupt(format!("stored status: {err}")))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens a read-write connection, creating the file when absent.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Opens a read-only connection; the file must already exist.
fn open_read_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    if !config.path.exists() {
        return Err(SqliteStoreError::Io(format!(
            "result store not found: {}",
            config.path.display()
        )));
    }
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    // The results table may have been dropped while store_meta survived.
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS test_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            test_name TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL,
            execution_time TEXT NOT NULL
        );",
    )?;
    tx.commit()?;
    Ok(())
}

// crates/stubcheck-cli/src/main.rs
// ============================================================================
// Module: Stubcheck CLI Entry Point
// Description: Command dispatcher for contract-suite runs, mock seeding, and
//              result reporting.
// Purpose: Wire configuration, HTTP collaborators, and the result store into
//          the suite runner and map outcomes to exit codes.
// Dependencies: clap, stubcheck-config, stubcheck-core, stubcheck-http,
//               stubcheck-store-sqlite, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `stubcheck run` seeds the mock server, executes the scenario catalog, and
//! persists one result per case. `stubcheck seed` only prepares the mock.
//! `stubcheck results` prints what the store holds.
//!
//! Exit codes: `0` when every executed case passed, `1` when any case failed,
//! `2` on a fatal configuration, mock server, or result store failure.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use stubcheck_config::HarnessConfig;
use stubcheck_core::ApiClient;
use stubcheck_core::MockAdmin;
use stubcheck_core::ResultRecord;
use stubcheck_core::ResultStore;
use stubcheck_core::StatusCounts;
use stubcheck_core::runtime::MockConfigurator;
use stubcheck_core::runtime::RunOptions;
use stubcheck_core::runtime::SuiteError;
use stubcheck_core::runtime::SuiteReport;
use stubcheck_core::runtime::SuiteRunner;
use stubcheck_core::runtime::users_stub_rules;
use stubcheck_http::HttpApiClient;
use stubcheck_http::InMemoryMockAdmin;
use stubcheck_http::WireMockAdminClient;
use stubcheck_store_sqlite::SqliteResultStore;
use thiserror::Error;

use crate::logging::init_logging;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Exit code when at least one executed case failed.
const EXIT_CASE_FAILURE: u8 = 1;
/// Exit code for fatal setup, configuration, or persistence failures.
const EXIT_FATAL: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "stubcheck", version, disable_help_subcommand = true)]
struct Cli {
    /// Emit debug diagnostics on stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed the mock server, run every case, and persist the results.
    Run(RunCommand),
    /// Reset the mock server and register the stub catalog only.
    Seed(SeedCommand),
    /// Print the results persisted in the store.
    Results(ResultsCommand),
}

/// Configuration sources shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// Path to a TOML config file (overrides `STUBCHECK_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Result store file (overrides config and `STUBCHECK_STORE_PATH`).
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

/// Mock server selection shared by `run` and `seed`.
#[derive(Args, Debug, Clone, Default)]
struct MockArgs {
    /// Mock server base URL (overrides config and `STUBCHECK_MOCK_BASE_URL`).
    #[arg(long = "mock-url", value_name = "URL")]
    mock_url: Option<String>,
    /// Request timeout in milliseconds (overrides config and `STUBCHECK_TIMEOUT_MS`).
    #[arg(long = "timeout-ms", value_name = "MS")]
    timeout_ms: Option<u64>,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Configuration sources.
    #[command(flatten)]
    config: ConfigArgs,
    /// Mock server selection.
    #[command(flatten)]
    mock: MockArgs,
    /// Case name to record as skipped without executing it (repeatable; unknown
    /// names are rejected).
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,
    /// Run against the in-process mock instead of a mock server.
    #[arg(long = "in-memory", conflicts_with = "mock_url")]
    in_memory: bool,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `seed`.
#[derive(Args, Debug)]
struct SeedCommand {
    /// Configuration sources.
    #[command(flatten)]
    config: ConfigArgs,
    /// Mock server selection.
    #[command(flatten)]
    mock: MockArgs,
}

/// Arguments for `results`.
#[derive(Args, Debug)]
struct ResultsCommand {
    /// Configuration sources.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Output formats for reports.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// One line per case followed by a status breakdown.
    Text,
    /// Pretty-printed JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying the message printed on stderr.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<SuiteError> for CliError {
    fn from(error: SuiteError) -> Self {
        Self::new(format!("{} failure: {error}", error.dependency()))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli.command) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the selected subcommand.
fn run(command: Commands) -> CliResult<ExitCode> {
    match command {
        Commands::Run(command) => command_run(&command),
        Commands::Seed(command) => command_seed(&command),
        Commands::Results(command) => command_results(&command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = resolve_config(&command.config, &command.mock)?;
    let store = open_store(&config)?;
    let options = RunOptions::skipping(command.skip.iter().cloned());
    if command.in_memory {
        let mock = InMemoryMockAdmin::new();
        return execute_run(&SuiteRunner::new(&mock, &mock, &store), &options, command.format);
    }
    let http = config
        .http_client_config()
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let admin = WireMockAdminClient::new(&http)
        .map_err(|err| CliError::new(format!("mock server failure: {err}")))?;
    let client = HttpApiClient::new(&http)
        .map_err(|err| CliError::new(format!("mock server failure: {err}")))?;
    execute_run(&SuiteRunner::new(admin, client, &store), &options, command.format)
}

/// Runs the suite and renders the report.
fn execute_run<A, C, S>(
    runner: &SuiteRunner<A, C, S>,
    options: &RunOptions,
    format: OutputFormat,
) -> CliResult<ExitCode>
where
    A: MockAdmin,
    C: ApiClient,
    S: ResultStore,
{
    let report = runner.execute_suite(options)?;
    match format {
        OutputFormat::Text => write_stdout_text(&render_report_text(&report))?,
        OutputFormat::Json => write_json(&report)?,
    }
    Ok(report_exit_code(&report))
}

/// Maps a completed report to the process exit code.
fn report_exit_code(report: &SuiteReport) -> ExitCode {
    if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::from(EXIT_CASE_FAILURE) }
}

/// Renders a report as one line per case plus a breakdown line.
fn render_report_text(report: &SuiteReport) -> String {
    let mut output = String::new();
    for outcome in &report.outcomes {
        output.push_str(&format!("{:<8} {}", outcome.status.as_str(), outcome.name));
        if let Some(detail) = &outcome.detail {
            output.push_str(&format!(" ({detail})"));
        }
        output.push('\n');
    }
    output.push_str(&render_counts(&report.counts()));
    output.push('\n');
    output
}

/// Renders the status breakdown line.
fn render_counts(counts: &StatusCounts) -> String {
    format!("{counts} TOTAL={}", counts.total())
}

// ============================================================================
// SECTION: Seed Command
// ============================================================================

/// Executes the `seed` command.
fn command_seed(command: &SeedCommand) -> CliResult<ExitCode> {
    let config = resolve_config(&command.config, &command.mock)?;
    let http = config
        .http_client_config()
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let admin = WireMockAdminClient::new(&http)
        .map_err(|err| CliError::new(format!("mock server failure: {err}")))?;
    let admin_base = admin.admin_base().to_string();
    MockConfigurator::new(admin).reset_and_seed().map_err(SuiteError::from)?;
    let rules = users_stub_rules().len();
    write_stdout_line(&format!("seeded {rules} stub rules at {admin_base}"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Results Command
// ============================================================================

/// Executes the `results` command.
fn command_results(command: &ResultsCommand) -> CliResult<ExitCode> {
    let config = resolve_config(&command.config, &MockArgs::default())?;
    let store = open_store(&config)?;
    let records =
        store.list().map_err(|err| CliError::new(format!("result store failure: {err}")))?;
    match command.format {
        OutputFormat::Text => write_stdout_text(&render_records_text(&records))?,
        OutputFormat::Json => write_json(&records)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders persisted records as aligned text.
fn render_records_text(records: &[ResultRecord]) -> String {
    if records.is_empty() {
        return "no results recorded\n".to_string();
    }
    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "{:<8} {} {}\n",
            record.status.as_str(),
            record.execution_time,
            record.test_name
        ));
    }
    let counts: StatusCounts = records.iter().map(|record| record.status).collect();
    output.push_str(&render_counts(&counts));
    output.push('\n');
    output
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Loads configuration and applies CLI flag overrides.
fn resolve_config(config: &ConfigArgs, mock: &MockArgs) -> CliResult<HarnessConfig> {
    let mut resolved = HarnessConfig::load(config.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    apply_cli_overrides(&mut resolved, config, mock);
    resolved.validate().map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    Ok(resolved)
}

/// Applies CLI flags, the highest-precedence source.
fn apply_cli_overrides(resolved: &mut HarnessConfig, config: &ConfigArgs, mock: &MockArgs) {
    if let Some(store) = &config.store {
        resolved.store.path.clone_from(store);
    }
    if let Some(url) = &mock.mock_url {
        resolved.mock.base_url.clone_from(url);
    }
    if let Some(timeout_ms) = mock.timeout_ms {
        resolved.mock.timeout_ms = timeout_ms;
    }
}

/// Builds the result store handle; the file is created on first setup.
fn open_store(config: &HarnessConfig) -> CliResult<SqliteResultStore> {
    SqliteResultStore::new(config.sqlite_store_config())
        .map_err(|err| CliError::new(format!("result store failure: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes pre-rendered text to stdout.
fn write_stdout_text(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a value as pretty JSON to stdout.
fn write_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("json rendering failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns the fatal exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_FATAL)
}

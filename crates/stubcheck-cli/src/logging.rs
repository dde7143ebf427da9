// crates/stubcheck-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Installs the process-wide tracing subscriber.
// Purpose: Route diagnostic events to stderr so stdout stays machine-readable.
// Dependencies: tracing-subscriber
// ============================================================================

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset and `--verbose` is off.
const DEFAULT_FILTER: &str = "warn";
/// Filter used when `RUST_LOG` is unset and `--verbose` is on.
const VERBOSE_FILTER: &str =
    "stubcheck_core=debug,stubcheck_http=debug,stubcheck_store_sqlite=debug,info";

/// Returns the filter directive used when `RUST_LOG` is unset.
pub(crate) const fn default_directive(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}

/// Installs a stderr `fmt` subscriber; `RUST_LOG` overrides the default filter.
///
/// A second call is a no-op.
pub(crate) fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}

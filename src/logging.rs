//! Logging initialization built on `tracing`.
//!
//! Verbosity is controlled by `-v` flags and `--quiet`, with `BUGHIVE_LOG`
//! taking precedence when set (standard env-filter syntax).

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber for the CLI.
///
/// Levels: quiet = errors only, default = warn, `-v` = info,
/// `-vv` = debug, `-vvv` = trace. Output goes to stderr so stdout
/// stays machine-parseable.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_env("BUGHIVE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("bughive={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize logging for tests.
///
/// Uses the test writer so output is captured per-test, and tolerates
/// repeated calls (only the first subscriber wins).
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_env("BUGHIVE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("bughive=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

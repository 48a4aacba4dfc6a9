//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, such as `forkful_core=debug`.
const LOG_ENV: &str = "FORKFUL_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    init_logging();
    if let Err(err) = forkful_cli::run() {
        eprintln!("forkful: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // Library crates log through `log`; the subscriber bridges those records.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

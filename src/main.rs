//! Binary entrypoint for the `taskerize` CLI.

use std::process::ExitCode;

use taskerize::config::{load_dotenv, LOG_VAR};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    load_dotenv();
    init_logging();

    // Recording and replay are handled in commands::dispatch via
    // TASKERIZE_RECORD=<dir> and TASKERIZE_REPLAY=<file>.
    match taskerize::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so board output on stdout stays clean.
fn init_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
}

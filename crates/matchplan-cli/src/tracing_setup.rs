//! Structured logging setup
//!
//! Logs go to stderr so stdout carries only the report.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "matchplan=info,matchplan_cli=info,matchplan_calculator=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Filter directives for the requested verbosity. `RUST_LOG` still wins when set.
pub fn filter_directives(verbose: bool) -> &'static str {
    if verbose {
        "matchplan=debug,matchplan_cli=debug,matchplan_calculator=debug"
    } else {
        DEFAULT_FILTER
    }
}

/// Installs the global subscriber.
pub fn init_tracing(format: LogFormat, verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

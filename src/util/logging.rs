use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "DAYBOOK_LOG";

/// Map `-v` repetitions to a level: warn, info, debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// parseable for `--json`.
///
/// `DAYBOOK_LOG` takes precedence over the verbosity flag.
pub fn init_logging(verbosity: u8) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level_for(verbosity)
            ))
        });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

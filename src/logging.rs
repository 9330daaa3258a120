use crate::settings::LoggingConfig;
use tracing_subscriber::fmt;

/// Install the global subscriber. Output goes to stderr since stdout may carry DAP frames.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(config: &LoggingConfig) {
    let _ = fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

// `fatal` has no tracing counterpart
pub fn level_from_str(level: &str) -> Level {
    match level {
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" | "fatal" => Level::ERROR,
        _ => Level::INFO,
    }
}

// stdout carries only the result
pub fn init(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = level_from_str(&config.level);
    let filter = EnvFilter::new(level.as_str().to_lowercase());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    }
}

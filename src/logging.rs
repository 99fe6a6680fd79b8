use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Raise a plain level directive by `verbose` steps (info -> debug -> trace).
fn bump_level(level: &str, verbose: u8) -> String {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    match LEVELS.iter().position(|l| l.eq_ignore_ascii_case(level)) {
        Some(i) => LEVELS[(i + verbose as usize).min(LEVELS.len() - 1)].to_string(),
        None => level.to_string(), // composite directive, leave as-is
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init(config: Option<&LoggingConfig>, verbose: u8) -> Result<()> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(bump_level(&config.level, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(config.target)
        .try_init()
        .map_err(|e| anyhow!("[logging] failed to install subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::bump_level;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(bump_level("info", 0), "info");
        assert_eq!(bump_level("info", 1), "debug");
        assert_eq!(bump_level("INFO", 2), "trace");
        assert_eq!(bump_level("warn", 9), "trace");
    }

    #[test]
    fn directives_are_untouched() {
        assert_eq!(bump_level("gridpop=debug", 2), "gridpop=debug");
    }
}

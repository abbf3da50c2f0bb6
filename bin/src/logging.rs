//! Diagnostic logging to stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Maps the verbosity flags to a level; `--quiet` wins over `-v`.
const fn level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the flags.
pub(crate) fn init(verbose: u8, quiet: bool) {
    let level = level(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // stdout carries the records, so diagnostics go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level(0, false), Level::WARN);
        assert_eq!(level(1, false), Level::INFO);
        assert_eq!(level(2, false), Level::DEBUG);
        assert_eq!(level(5, false), Level::TRACE);
        assert_eq!(level(3, true), Level::ERROR);
    }
}

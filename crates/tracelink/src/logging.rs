//! Logging setup for tracelink.
//!
//! Logs go to stderr. Records, links and JSON are written to stdout, so the
//! two never mix in a pipe.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs, from the `-q`/`-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors, such as a discarded unreadable entry list.
    #[default]
    Normal,
    /// Adds logins, created entries, sweeps and evictions.
    Verbose,
    /// Everything, including each store read and write.
    Trace,
}

impl Verbosity {
    /// `EnvFilter` directive scoping this level to the crate.
    #[must_use]
    pub fn directive(self) -> String {
        let level = match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Trace => "trace",
        };
        format!("{}={level}", env!("CARGO_CRATE_NAME"))
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` replaces the verbosity-derived filter when set. Calling this
/// twice is harmless; the second call does nothing.
///
/// ```no_run
/// use tracelink::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity == Verbosity::Trace)
                .compact(),
        )
        .try_init();
}

/// Route logs through the test harness's captured output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(Verbosity::Trace.directive())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_targets_crate() {
        assert_eq!(Verbosity::Quiet.directive(), "tracelink=error");
        assert_eq!(Verbosity::default().directive(), "tracelink=warn");
        assert_eq!(Verbosity::Verbose.directive(), "tracelink=info");
        assert_eq!(Verbosity::Trace.directive(), "tracelink=trace");
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_test_logging();
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Quiet);
    }
}

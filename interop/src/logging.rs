use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `--log-level` nor `INTEROP_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Build the filter for a directive string such as `debug` or
/// `interop_core=trace,interop=debug`. Invalid directives are skipped.
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

/// Install the global subscriber. Logs go to stderr so query output on
/// stdout stays clean.
pub fn init(directives: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives))
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();

    if let Err(error) = result {
        eprintln!("Warning: failed to initialise logging: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_keeps_directives() {
        let filter = build_filter("interop_core=trace,interop=debug");
        let rendered = filter.to_string();
        assert!(rendered.contains("interop_core=trace"));
        assert!(rendered.contains("interop=debug"));
    }

    #[test]
    fn test_build_filter_defaults_to_warn() {
        assert_eq!(build_filter("").max_level_hint(), Some(LevelFilter::WARN));
    }
}

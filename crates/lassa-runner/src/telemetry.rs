//! Logging setup for the runner.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Levels used when `RUST_LOG` is unset; engine debug events stay visible
pub const DEFAULT_FILTER: &str = "info,lassa_world=debug";

/// Install the global subscriber. `RUST_LOG` selects levels; setting
/// `LASSA_LOG_FORMAT=json` switches to structured JSON lines. Logs go to
/// stderr so stdout stays free for results.
pub fn init_telemetry() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let json = std::env::var("LASSA_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }

    info!(json, "Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_shows_engine_debug() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("lassa_world=debug"));
        assert!(rendered.contains("info"));
    }
}

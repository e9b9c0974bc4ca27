//! Environment-driven configuration for the command-line front end.

use spritefx_core::EngineConfig;

/// Filter directives for the log subscriber, e.g. `spritefx_core=debug`.
pub const LOG_ENV: &str = "SPRITEFX_LOG";
/// Overrides [`EngineConfig::max_dimension`].
pub const MAX_DIMENSION_ENV: &str = "SPRITEFX_MAX_DIMENSION";
/// Overrides [`EngineConfig::parallel_pixel_threshold`].
pub const PARALLEL_THRESHOLD_ENV: &str = "SPRITEFX_PARALLEL_THRESHOLD";

/// Default log filter when `SPRITEFX_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the engine configuration from the process environment.
pub fn engine_config_from_env() -> EngineConfig {
    engine_config_from(|key| std::env::var(key).ok())
}

/// Build the engine configuration from an arbitrary variable lookup.
///
/// Unset variables keep their defaults; unparsable ones are logged and
/// ignored.
pub fn engine_config_from(lookup: impl Fn(&str) -> Option<String>) -> EngineConfig {
    let defaults = EngineConfig::default();
    EngineConfig {
        max_dimension: parse_var(&lookup, MAX_DIMENSION_ENV).unwrap_or(defaults.max_dimension),
        parallel_pixel_threshold: parse_var(&lookup, PARALLEL_THRESHOLD_ENV)
            .unwrap_or(defaults.parallel_pixel_threshold),
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}

//! Aggregation defaults loaded from an optional TOML file.

use anyhow::{Context, Result};
use std::path::Path;
use tapeflow_lib::prelude::*;
use tracing::debug;

/// Reads `path`, or returns the built-in defaults when no file is given.
///
/// Keys missing from the file keep their default values.
pub(crate) fn load(path: Option<&Path>) -> Result<AggregationConfig> {
    let Some(path) = path else {
        return Ok(AggregationConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("Invalid config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse(text: &str) -> Result<AggregationConfig> {
    let config: AggregationConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Overrides the timeframe when the flag was given.
pub(crate) fn with_timeframe(
    mut config: AggregationConfig,
    timeframe: Option<Timeframe>,
) -> AggregationConfig {
    if let Some(timeframe) = timeframe {
        config = config.with_timeframe(timeframe);
    }
    config
}

/// Overrides the price bin width when the flag was given.
pub(crate) fn with_bin_size(
    mut config: AggregationConfig,
    bin_size: Option<f64>,
) -> AggregationConfig {
    if let Some(size) = bin_size {
        config = config.with_price_bin_size(size);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        assert_eq!(load(None).unwrap(), AggregationConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse(
            r#"
            timeframe = "5min"
            price_bin_size = 0.5
            value_area_adjacency = "price"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeframe, Timeframe::MINUTE_5);
        assert_eq!(config.price_bin_size, 0.5);
        assert_eq!(config.value_area_adjacency, ValueAreaAdjacency::Price);
        assert_eq!(config.range_levels, AggregationConfig::default().range_levels);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(parse("range_levels = 1").is_err());
        assert!(parse("value_area_percentage = 0").is_err());
        assert!(parse("bucket_size = -5.0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bucket_size = 250000.0").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.bucket_size, 250_000.0);
    }

    #[test]
    fn test_flags_override() {
        let config = with_bin_size(
            with_timeframe(AggregationConfig::default(), Some(Timeframe::HOUR_1)),
            Some(5.0),
        );
        assert_eq!(config.timeframe, Timeframe::HOUR_1);
        assert_eq!(config.price_bin_size, 5.0);

        let untouched = with_timeframe(AggregationConfig::default(), None);
        assert_eq!(untouched.timeframe, Timeframe::MINUTE_1);
    }
}

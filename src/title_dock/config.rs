use thiserror::Error;

pub const DEFAULT_FALLBACK_THRESHOLD: f64 = 700.0;
pub const DEFAULT_MIN_THRESHOLD: f64 = 250.0;
/// Values above 1 stretch the scroll distance beyond the raw hero-to-nav gap.
pub const DEFAULT_THRESHOLD_SCALE: f64 = 1.4;
pub const DEFAULT_REMEASURE_DEBOUNCE_MS: u32 = 100;

const FALLBACK_THRESHOLD_BOUNDS: (f64, f64) = (50.0, 10_000.0);
const MIN_THRESHOLD_BOUNDS: (f64, f64) = (1.0, 5_000.0);
const THRESHOLD_SCALE_BOUNDS: (f64, f64) = (0.25, 8.0);
const REMEASURE_DEBOUNCE_MS_BOUNDS: (u32, u32) = (0, 2_000);

pub const FALLBACK_THRESHOLD_KEY: &str = "fallback-threshold";
pub const MIN_THRESHOLD_KEY: &str = "min-threshold";
pub const THRESHOLD_SCALE_KEY: &str = "threshold-scale";
pub const REMEASURE_DEBOUNCE_MS_KEY: &str = "remeasure-debounce-ms";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{key}` is not a number: {value:?}")]
    NotANumber { key: &'static str, value: String },
    #[error("`{key}` = {value} is outside {min}..={max}")]
    OutOfBounds {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Tuning values for the docking animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockConfig {
    pub fallback_threshold: f64,
    pub min_threshold: f64,
    pub threshold_scale: f64,
    pub remeasure_debounce_ms: u32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            min_threshold: DEFAULT_MIN_THRESHOLD,
            threshold_scale: DEFAULT_THRESHOLD_SCALE,
            remeasure_debounce_ms: DEFAULT_REMEASURE_DEBOUNCE_MS,
        }
    }
}

impl DockConfig {
    /// Builds a config from string overrides, e.g. `data-*` attributes on the
    /// mount element. Rejected values are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            fallback_threshold: override_or_default(
                &lookup,
                FALLBACK_THRESHOLD_KEY,
                defaults.fallback_threshold,
                FALLBACK_THRESHOLD_BOUNDS,
            ),
            min_threshold: override_or_default(
                &lookup,
                MIN_THRESHOLD_KEY,
                defaults.min_threshold,
                MIN_THRESHOLD_BOUNDS,
            ),
            threshold_scale: override_or_default(
                &lookup,
                THRESHOLD_SCALE_KEY,
                defaults.threshold_scale,
                THRESHOLD_SCALE_BOUNDS,
            ),
            remeasure_debounce_ms: override_or_default(
                &lookup,
                REMEASURE_DEBOUNCE_MS_KEY,
                f64::from(defaults.remeasure_debounce_ms),
                (
                    f64::from(REMEASURE_DEBOUNCE_MS_BOUNDS.0),
                    f64::from(REMEASURE_DEBOUNCE_MS_BOUNDS.1),
                ),
            )
            .round() as u32,
        }
    }
}

fn override_or_default<F>(lookup: &F, key: &'static str, default: f64, bounds: (f64, f64)) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match parse_f64_with_bounds(key, &raw, bounds) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, fallback = default, "ignoring dock config override");
            default
        }
    }
}

pub fn parse_f64_with_bounds(
    key: &'static str,
    raw: &str,
    bounds: (f64, f64),
) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ConfigError::NotANumber {
            key,
            value: raw.to_string(),
        })?;

    if !(bounds.0..=bounds.1).contains(&value) {
        return Err(ConfigError::OutOfBounds {
            key,
            value,
            min: bounds.0,
            max: bounds.1,
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_overrides_keep_defaults() {
        let config = DockConfig::from_lookup(|_| None);
        assert_eq!(config, DockConfig::default());
    }

    #[test]
    fn valid_overrides_are_applied() {
        let config = DockConfig::from_lookup(lookup_from(&[
            (THRESHOLD_SCALE_KEY, " 1.0 "),
            (MIN_THRESHOLD_KEY, "120"),
            (REMEASURE_DEBOUNCE_MS_KEY, "40"),
        ]));

        assert_eq!(config.threshold_scale, 1.0);
        assert_eq!(config.min_threshold, 120.0);
        assert_eq!(config.remeasure_debounce_ms, 40);
        assert_eq!(config.fallback_threshold, DEFAULT_FALLBACK_THRESHOLD);
    }

    #[test]
    fn out_of_bounds_and_garbage_fall_back() {
        let config = DockConfig::from_lookup(lookup_from(&[
            (THRESHOLD_SCALE_KEY, "40"),
            (FALLBACK_THRESHOLD_KEY, "fast"),
            (MIN_THRESHOLD_KEY, "NaN"),
        ]));

        assert_eq!(config, DockConfig::default());
    }

    #[test]
    fn parse_reports_which_bound_failed() {
        let error = parse_f64_with_bounds(THRESHOLD_SCALE_KEY, "9", THRESHOLD_SCALE_BOUNDS)
            .expect_err("9 is above the scale bound");

        assert_eq!(
            error,
            ConfigError::OutOfBounds {
                key: THRESHOLD_SCALE_KEY,
                value: 9.0,
                min: 0.25,
                max: 8.0,
            }
        );
    }
}

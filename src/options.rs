//! Per-element options: duration, scale and layout.
//!
//! Hosts hand over whatever metadata is attached to a lightbox source as a
//! [`DeclaredOptions`] mapping. Three keys are read:
//!
//! | Key | Accepted forms | Default |
//! |---|---|---|
//! | `duration` | `200`, `"200"`, `"200ms"`, `"2s"`, `".2s"` | 500 ms |
//! | `scale` | `.5`, `"0.5"`, `"50%"` | 1.0 |
//! | `layout` | see [`crate::layout`] | empty |
//!
//! Malformed values never fail: they fall back to the default. Defaults come
//! from [`crate::config::DefaultsConfig`] and are resolved once, when the
//! [`LightboxConfig`] is built.

use crate::config::DefaultsConfig;
use crate::layout::{LayoutRule, parse_layout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_DURATION_MS: f64 = 500.0;
pub const DEFAULT_SCALE: f64 = 1.0;

/// A declared option value. Host metadata may already be numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    Text(String),
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

/// Options read from an element's metadata, keyed by option name.
pub type DeclaredOptions = BTreeMap<String, OptionValue>;

/// Parse an unsigned decimal: `12`, `12.5` or `.5`.
fn parse_decimal(s: &str) -> Option<f64> {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let valid = match frac {
        Some(frac) => digits(int) && !frac.is_empty() && digits(frac),
        None => !int.is_empty() && digits(int),
    };
    if !valid {
        return None;
    }
    s.parse().ok()
}

/// Keep only finite, strictly positive values.
fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parse a duration into milliseconds, or `None` if it is unusable.
pub fn try_parse_duration(raw: &OptionValue) -> Option<f64> {
    let ms = match raw {
        OptionValue::Number(n) => *n,
        OptionValue::Text(text) => {
            let text = text.trim();
            if let Some(n) = text.strip_suffix("ms") {
                parse_decimal(n)?
            } else if let Some(n) = text.strip_suffix('s') {
                parse_decimal(n)? * 1000.0
            } else {
                parse_decimal(text)?
            }
        }
    };
    positive(ms)
}

/// Parse a duration into milliseconds, falling back to 500.
///
/// ```
/// # use litebox::options::{parse_duration, OptionValue};
/// assert_eq!(parse_duration(&"2s".into()), 2000.0);
/// assert_eq!(parse_duration(&"200ms".into()), 200.0);
/// assert_eq!(parse_duration(&200.0.into()), 200.0);
/// assert_eq!(parse_duration(&"bogus".into()), 500.0);
/// ```
pub fn parse_duration(raw: &OptionValue) -> f64 {
    try_parse_duration(raw).unwrap_or(DEFAULT_DURATION_MS)
}

/// Parse a thumbnail scale factor, or `None` if it is unusable.
///
/// Percentages must be whole numbers (`"50%"`); anything else is read as a
/// plain decimal.
pub fn try_parse_scale(raw: &OptionValue) -> Option<f64> {
    let factor = match raw {
        OptionValue::Number(n) => *n,
        OptionValue::Text(text) => {
            let text = text.trim();
            match text.strip_suffix('%') {
                Some(pct) if !pct.is_empty() && pct.bytes().all(|b| b.is_ascii_digit()) => {
                    pct.parse::<u64>().ok()? as f64 / 100.0
                }
                Some(_) => return None,
                None => parse_decimal(text)?,
            }
        }
    };
    positive(factor)
}

/// Parse a thumbnail scale factor, falling back to 1.0.
pub fn parse_scale(raw: &OptionValue) -> f64 {
    try_parse_scale(raw).unwrap_or(DEFAULT_SCALE)
}

/// Immutable per-lightbox configuration, built once from declared options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightboxConfig {
    pub duration_ms: f64,
    pub scale: f64,
    pub layout: LayoutRule,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            scale: DEFAULT_SCALE,
            layout: LayoutRule::default(),
        }
    }
}

impl LightboxConfig {
    /// Resolve declared options against page defaults.
    pub fn from_declared(options: &DeclaredOptions, defaults: &DefaultsConfig) -> Self {
        let duration_ms = match options.get("duration") {
            Some(raw) => try_parse_duration(raw).unwrap_or_else(|| {
                warn!(?raw, "unusable duration, using default");
                defaults.duration
            }),
            None => defaults.duration,
        };
        let scale = match options.get("scale") {
            Some(raw) => try_parse_scale(raw).unwrap_or_else(|| {
                warn!(?raw, "unusable scale, using default");
                defaults.scale
            }),
            None => defaults.scale,
        };
        let layout = match options.get("layout") {
            Some(OptionValue::Text(raw)) => parse_layout(raw),
            Some(OptionValue::Number(_)) | None => LayoutRule::default(),
        };
        Self {
            duration_ms,
            scale,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(pairs: &[(&str, OptionValue)]) -> DeclaredOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // =========================================================================
    // parse_duration
    // =========================================================================

    #[test]
    fn duration_seconds() {
        assert_eq!(parse_duration(&"2s".into()), 2000.0);
        assert_eq!(parse_duration(&".2s".into()), 200.0);
        assert_eq!(parse_duration(&"1.5s".into()), 1500.0);
    }

    #[test]
    fn duration_milliseconds() {
        assert_eq!(parse_duration(&"200ms".into()), 200.0);
        assert_eq!(parse_duration(&"200".into()), 200.0);
        assert_eq!(parse_duration(&200.0.into()), 200.0);
    }

    #[test]
    fn duration_garbage_falls_back() {
        assert_eq!(parse_duration(&"bogus".into()), 500.0);
        assert_eq!(parse_duration(&"".into()), 500.0);
        assert_eq!(parse_duration(&"s".into()), 500.0);
        assert_eq!(parse_duration(&"-2s".into()), 500.0);
        assert_eq!(parse_duration(&"2.s".into()), 500.0);
        assert_eq!(parse_duration(&f64::NAN.into()), 500.0);
    }

    #[test]
    fn duration_zero_falls_back() {
        assert_eq!(parse_duration(&0.0.into()), 500.0);
        assert_eq!(parse_duration(&"0ms".into()), 500.0);
    }

    // =========================================================================
    // parse_scale
    // =========================================================================

    #[test]
    fn scale_percent() {
        assert_eq!(parse_scale(&"50%".into()), 0.5);
        assert_eq!(parse_scale(&"150%".into()), 1.5);
    }

    #[test]
    fn scale_decimal() {
        assert_eq!(parse_scale(&".5".into()), 0.5);
        assert_eq!(parse_scale(&"0.25".into()), 0.25);
        assert_eq!(parse_scale(&0.75.into()), 0.75);
    }

    #[test]
    fn scale_garbage_falls_back() {
        assert_eq!(parse_scale(&"bogus".into()), 1.0);
        assert_eq!(parse_scale(&"12.5%".into()), 1.0);
        assert_eq!(parse_scale(&"%".into()), 1.0);
        assert_eq!(parse_scale(&0.0.into()), 1.0);
        assert_eq!(parse_scale(&f64::INFINITY.into()), 1.0);
    }

    // =========================================================================
    // LightboxConfig
    // =========================================================================

    #[test]
    fn config_from_declared_options() {
        let options = declared(&[
            ("duration", ".3s".into()),
            ("scale", "50%".into()),
            ("layout", "left: 10px; width: 200px".into()),
        ]);
        let config = LightboxConfig::from_declared(&options, &DefaultsConfig::default());
        assert_eq!(config.duration_ms, 300.0);
        assert_eq!(config.scale, 0.5);
        assert_eq!(config.layout.get("left"), Some("10px"));
        assert!(!config.layout.auto_resize());
    }

    #[test]
    fn config_missing_options_use_page_defaults() {
        let defaults = DefaultsConfig {
            duration: 250.0,
            scale: 0.5,
        };
        let config = LightboxConfig::from_declared(&DeclaredOptions::new(), &defaults);
        assert_eq!(config.duration_ms, 250.0);
        assert_eq!(config.scale, 0.5);
        assert!(config.layout.is_empty());
    }

    #[test]
    fn config_bad_options_use_page_defaults() {
        let defaults = DefaultsConfig {
            duration: 250.0,
            scale: 0.5,
        };
        let options = declared(&[("duration", "soon".into()), ("scale", "big".into())]);
        let config = LightboxConfig::from_declared(&options, &defaults);
        assert_eq!(config.duration_ms, 250.0);
        assert_eq!(config.scale, 0.5);
    }

    #[test]
    fn option_values_deserialize_from_json() {
        let options: DeclaredOptions =
            serde_json::from_str(r#"{"duration": 200, "scale": "50%"}"#).unwrap();
        assert_eq!(options["duration"], OptionValue::Number(200.0));
        assert_eq!(options["scale"], OptionValue::Text("50%".into()));
    }
}

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::color::ColorScheme;
use crate::record::DEFAULT_SPIN_SECONDS;

pub const DEFAULT_STORE_DIR: &str = "wheel_data";
pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfig {
    pub store_dir: PathBuf,
    pub seed: Option<u64>,
    pub spin_seconds: f64,
    pub frame_interval: Duration,
    pub color_scheme: ColorScheme,
}

impl Default for WheelConfig {
    fn default() -> Self {
        WheelConfig {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            seed: None,
            spin_seconds: DEFAULT_SPIN_SECONDS,
            frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
            color_scheme: ColorScheme::default(),
        }
    }
}

impl WheelConfig {
    /// Reads `WHEEL_*` variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = WheelConfig::default();
        Ok(WheelConfig {
            store_dir: lookup("WHEEL_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            seed: parse_var(&lookup, "WHEEL_SEED")?,
            spin_seconds: parse_var(&lookup, "WHEEL_SPIN_SECONDS")?
                .unwrap_or(defaults.spin_seconds),
            frame_interval: parse_var(&lookup, "WHEEL_FRAME_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.frame_interval),
            color_scheme: parse_var(&lookup, "WHEEL_COLOR_SCHEME")?
                .unwrap_or(defaults.color_scheme),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow::anyhow!("{err}"))
            .with_context(|| format!("invalid {key}={raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = WheelConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WheelConfig::default());
        assert_eq!(config.spin_seconds, 6.0);
    }

    #[test]
    fn reads_all_variables() {
        let config = WheelConfig::from_lookup(lookup(&[
            ("WHEEL_STORE_DIR", "/tmp/wheel"),
            ("WHEEL_SEED", "99"),
            ("WHEEL_SPIN_SECONDS", "2.5"),
            ("WHEEL_FRAME_MS", "8"),
            ("WHEEL_COLOR_SCHEME", "hsl"),
        ]))
        .unwrap();

        assert_eq!(config.store_dir, PathBuf::from("/tmp/wheel"));
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.spin_seconds, 2.5);
        assert_eq!(config.frame_interval, Duration::from_millis(8));
        assert_eq!(config.color_scheme, ColorScheme::Hsl);
    }

    #[test]
    fn malformed_value_names_the_variable() {
        let err = WheelConfig::from_lookup(lookup(&[("WHEEL_SEED", "abc")])).unwrap_err();
        assert!(format!("{err:#}").contains("WHEEL_SEED"));
    }
}

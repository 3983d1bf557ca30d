use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::item::{clamp_positive, Item, ItemRegistry};

pub const DEFAULT_BACKGROUND: &str = "#0f172a";
pub const DEFAULT_SPIN_SECONDS: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelSettings {
    pub app_background: String,
    pub is_light_mode: bool,
    pub is_shuffled: bool,
    #[serde(deserialize_with = "lenient_seconds")]
    pub spin_duration_seconds: f64,
}

fn lenient_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .map_or(DEFAULT_SPIN_SECONDS, clamp_positive))
}

impl Default for WheelSettings {
    fn default() -> Self {
        WheelSettings {
            app_background: DEFAULT_BACKGROUND.to_string(),
            is_light_mode: false,
            is_shuffled: false,
            spin_duration_seconds: DEFAULT_SPIN_SECONDS,
        }
    }
}

/// Persisted shape of the wheel, shared by the main slot and presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelRecord {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub settings: WheelSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded,
    /// Bare item array from older versions; settings were defaulted.
    Legacy,
    Fallback(String),
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub registry: ItemRegistry,
    pub settings: WheelSettings,
    pub status: LoadStatus,
}

pub fn serialize(registry: &ItemRegistry, settings: &WheelSettings) -> WheelRecord {
    WheelRecord {
        items: registry.snapshot(),
        settings: settings.clone(),
    }
}

pub fn to_json(record: &WheelRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Rebuilds registry and settings from a record. Never fails: malformed
/// input yields an empty registry with default settings.
pub fn deserialize(raw: &str) -> Loaded {
    match parse(raw) {
        Ok((items, Some(settings))) => {
            let (registry, settings) = from_record(WheelRecord { items, settings });
            Loaded {
                registry,
                settings,
                status: LoadStatus::Loaded,
            }
        }
        Ok((items, None)) => Loaded {
            registry: ItemRegistry::from_items(items),
            settings: WheelSettings::default(),
            status: LoadStatus::Legacy,
        },
        Err(err) => {
            log::warn!("failed to load wheel record, using defaults: {err:#}");
            Loaded {
                registry: ItemRegistry::new(),
                settings: WheelSettings::default(),
                status: LoadStatus::Fallback(format!("{err:#}")),
            }
        }
    }
}

/// Splits a stored record into items and, unless it is a bare legacy
/// array, its settings.
fn parse(raw: &str) -> Result<(Vec<Item>, Option<WheelSettings>)> {
    let value: Value = serde_json::from_str(raw).context("record is not valid JSON")?;
    match value {
        Value::Array(items) => Ok((parse_items(items)?, None)),
        Value::Object(mut fields) => {
            let items = match fields.remove("items") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => parse_items(items)?,
                Some(other) => bail!("items: expected an array, found {other}"),
            };
            let settings = WheelSettings::deserialize(Value::Object(fields)).context("settings")?;
            Ok((items, Some(settings)))
        }
        other => bail!("expected an object or an item array, found {other}"),
    }
}

fn parse_items(items: Vec<Value>) -> Result<Vec<Item>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).with_context(|| format!("items[{index}]"))
        })
        .collect()
}

pub fn from_record(record: WheelRecord) -> (ItemRegistry, WheelSettings) {
    let mut settings = record.settings;
    settings.spin_duration_seconds = clamp_positive(settings.spin_duration_seconds);
    (ItemRegistry::from_items(record.items), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemDraft, ItemField};

    #[test]
    fn round_trip_preserves_items_and_settings() {
        let mut registry = ItemRegistry::new();
        let id = registry.add(ItemDraft::new("Tacos", "#FF0000").weight(2.5).split_count(3));
        registry.add(ItemDraft::new("Pizza", "hsl(10, 70%, 60%)").text_color("#000000"));
        registry.update(&id, ItemField::TextSize(22.0));
        let settings = WheelSettings {
            app_background: "#ffffff".into(),
            is_light_mode: true,
            is_shuffled: true,
            spin_duration_seconds: 3.5,
        };

        let json = to_json(&serialize(&registry, &settings)).unwrap();
        let loaded = deserialize(&json);

        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.registry.snapshot(), registry.snapshot());
        assert_eq!(loaded.settings, settings);
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let mut registry = ItemRegistry::new();
        registry.add(ItemDraft::new("A", "#000000"));
        let value = serde_json::to_value(serialize(&registry, &WheelSettings::default())).unwrap();

        assert_eq!(value["spinDurationSeconds"], 6.0);
        assert_eq!(value["isShuffled"], false);
        assert_eq!(value["appBackground"], DEFAULT_BACKGROUND);
        assert_eq!(value["items"][0]["splitCount"], 1);
        assert_eq!(value["items"][0]["textColor"], "#ffffff");
    }

    #[test]
    fn legacy_array_loads_with_default_settings() {
        let raw = r##"[{"id":"1","name":"Tacos","color":"#123456","weight":2}]"##;
        let loaded = deserialize(raw);

        assert_eq!(loaded.status, LoadStatus::Legacy);
        assert_eq!(loaded.registry.len(), 1);
        assert_eq!(loaded.registry.items()[0].weight, 2.0);
        assert_eq!(loaded.registry.items()[0].split_count, 1);
        assert!(!loaded.settings.is_shuffled);
        assert_eq!(loaded.settings.spin_duration_seconds, 6.0);
    }

    #[test]
    fn malformed_record_falls_back() {
        let loaded = deserialize("{\"items\": 12}");
        assert!(matches!(loaded.status, LoadStatus::Fallback(_)));
        assert!(loaded.registry.is_empty());
        assert_eq!(loaded.settings, WheelSettings::default());

        let loaded = deserialize("not json");
        assert!(matches!(loaded.status, LoadStatus::Fallback(_)));
    }

    #[test]
    fn one_bad_item_number_keeps_the_rest_of_the_record() {
        let raw = r##"{
            "items": [
                {"id":"a","name":"A","color":"#111111","weight":2,"splitCount":3},
                {"id":"b","name":"B","color":"#222222","weight":null,"splitCount":-1}
            ],
            "isShuffled": true,
            "spinDurationSeconds": 4
        }"##;
        let loaded = deserialize(raw);

        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.registry.len(), 2);
        assert_eq!(loaded.registry.items()[0].split_count, 3);
        assert_eq!(loaded.registry.items()[1].weight, 1.0);
        assert_eq!(loaded.registry.items()[1].split_count, 1);
        assert!(loaded.settings.is_shuffled);
        assert_eq!(loaded.settings.spin_duration_seconds, 4.0);
    }

    #[test]
    fn bad_spin_duration_takes_default() {
        let loaded = deserialize(r#"{"items":[],"spinDurationSeconds":"slow"}"#);
        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.settings.spin_duration_seconds, DEFAULT_SPIN_SECONDS);
    }

    #[test]
    fn fallback_reason_names_the_bad_field() {
        let loaded = deserialize(r#"{"items":[{"id":"a"},{"id":"b","name":7}]}"#);
        match loaded.status {
            LoadStatus::Fallback(reason) => assert!(reason.contains("items[1]"), "{reason}"),
            other => panic!("expected fallback, got {other:?}"),
        }

        let loaded = deserialize("{\"items\": 12}");
        match loaded.status {
            LoadStatus::Fallback(reason) => assert!(reason.contains("items"), "{reason}"),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn partial_record_fills_defaults_and_clamps() {
        let raw = r#"{"items":[{"id":"a","name":"A","weight":-1}],"spinDurationSeconds":0}"#;
        let loaded = deserialize(raw);

        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.registry.items()[0].weight, 1.0);
        assert_eq!(loaded.settings.spin_duration_seconds, 1.0);
        assert_eq!(loaded.settings.app_background, DEFAULT_BACKGROUND);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::WheelRecord;

/// Named snapshots of the wheel, keyed by user-chosen name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetBook {
    presets: BTreeMap<String, WheelRecord>,
}

impl PresetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `name`, replacing any existing preset.
    /// Blank names are ignored.
    pub fn save(&mut self, name: &str, record: WheelRecord) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.presets.insert(name.to_string(), record);
        true
    }

    pub fn load(&self, name: &str) -> Option<&WheelRecord> {
        self.presets.get(name.trim())
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.presets.remove(name.trim()).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_TEXT_SIZE: f64 = 16.0;
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
/// Upper bound on segments per item.
pub const MAX_SPLIT_COUNT: u32 = 100;

/// Opaque, stable identifier of a wheel item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "one", deserialize_with = "lenient_weight")]
    pub weight: f64,
    #[serde(default = "one_split", deserialize_with = "lenient_split")]
    pub split_count: u32,
    #[serde(default = "default_text_size", deserialize_with = "lenient_text_size")]
    pub text_size: f64,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

fn one() -> f64 {
    1.0
}

fn one_split() -> u32 {
    1
}

fn default_text_size() -> f64 {
    DEFAULT_TEXT_SIZE
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

// Stored numbers go through the same clamps as `ItemRegistry::update`;
// non-numbers take the field default.

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_number(deserializer)?.map_or(1.0, clamp_positive))
}

fn lenient_text_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_number(deserializer)?.map_or(DEFAULT_TEXT_SIZE, clamp_positive))
}

fn lenient_split<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    // saturating cast; NaN becomes 0 and is clamped
    Ok(lenient_number(deserializer)?.map_or(1, |count| clamp_split(count as i64)))
}

/// Attributes of an item that has not been registered yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub color: String,
    pub weight: f64,
    pub split_count: u32,
    pub text_size: f64,
    pub text_color: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        ItemDraft {
            name: name.into(),
            color: color.into(),
            weight: 1.0,
            split_count: 1,
            text_size: DEFAULT_TEXT_SIZE,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn split_count(mut self, split_count: u32) -> Self {
        self.split_count = split_count;
        self
    }

    pub fn text_size(mut self, text_size: f64) -> Self {
        self.text_size = text_size;
        self
    }

    pub fn text_color(mut self, text_color: impl Into<String>) -> Self {
        self.text_color = text_color.into();
        self
    }
}

/// A single attribute edit, as produced by the input layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    Name(String),
    Color(String),
    Weight(f64),
    SplitCount(i64),
    TextSize(f64),
    TextColor(String),
}

/// Non-positive or non-finite values become 1.
pub fn clamp_positive(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

/// Non-positive counts become 1, large ones are capped at `MAX_SPLIT_COUNT`.
pub fn clamp_split(value: i64) -> u32 {
    value.clamp(1, i64::from(MAX_SPLIT_COUNT)) as u32
}

/// Ordered list of wheel items. Insertion order decides angular placement.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: Vec<Item>,
    next_id: u64,
    revision: u64,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from persisted items, repairing invalid fields and
    /// missing or duplicate ids.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut registry = ItemRegistry::new();
        for mut item in items {
            item.weight = clamp_positive(item.weight);
            item.split_count = clamp_split(i64::from(item.split_count));
            item.text_size = clamp_positive(item.text_size);
            if item.id.as_str().is_empty() || registry.get(&item.id).is_some() {
                item.id = registry.fresh_id();
            }
            registry.items.push(item);
        }
        registry
    }

    pub fn add(&mut self, draft: ItemDraft) -> ItemId {
        let id = self.fresh_id();
        self.items.push(Item {
            id: id.clone(),
            name: draft.name,
            color: draft.color,
            weight: clamp_positive(draft.weight),
            split_count: clamp_split(i64::from(draft.split_count)),
            text_size: clamp_positive(draft.text_size),
            text_color: draft.text_color,
        });
        self.revision += 1;
        log::debug!("added item {id}");
        id
    }

    /// Removes the item if present. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.revision += 1;
            log::debug!("removed item {id}");
        }
        removed
    }

    /// Applies one field edit. Returns false if no item has this id.
    pub fn update(&mut self, id: &ItemId, field: ItemField) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        match field {
            ItemField::Name(name) => item.name = name,
            ItemField::Color(color) => item.color = color,
            ItemField::Weight(weight) => item.weight = clamp_positive(weight),
            ItemField::SplitCount(count) => item.split_count = clamp_split(count),
            ItemField::TextSize(size) => item.text_size = clamp_positive(size),
            ItemField::TextColor(color) => item.text_color = color,
        }
        self.revision += 1;
        true
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped on every mutation; segment caches compare against it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn fresh_id(&mut self) -> ItemId {
        loop {
            self.next_id += 1;
            let candidate = ItemId(self.next_id.to_string());
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

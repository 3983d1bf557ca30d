use anyhow::Result;

use crate::color::ColorScheme;
use crate::config::WheelConfig;
use crate::item::{clamp_positive, Item, ItemDraft, ItemField, ItemId, ItemRegistry};
use crate::outcome::{resolve, Winner};
use crate::presets::PresetBook;
use crate::record::{self, LoadStatus, WheelRecord, WheelSettings};
use crate::render::{AudioCue, AudioSink, DrawRequest, Presentation, Theme};
use crate::segment::{build_segments, Layout, SegmentSequence};
use crate::spin::{SpinEngine, SpinEvent};
use crate::store::{KeyValueStore, PRESETS_KEY, STATE_KEY};

const DEFAULT_ITEMS: [&str; 3] = ["Tacos", "Burger", "Pizza"];

#[derive(Default)]
struct SegmentCache {
    revision: Option<u64>,
    layout: Layout,
    sequence: SegmentSequence,
}

/// Application state of one wheel: items, settings, rotation and the
/// collaborators it reports to. Owned by the host; every UI action maps to
/// one of its command methods.
pub struct Wheel {
    registry: ItemRegistry,
    settings: WheelSettings,
    engine: SpinEngine,
    color_scheme: ColorScheme,
    cache: SegmentCache,
    result: Option<Winner>,
    presentation: Option<Box<dyn Presentation>>,
    audio: Option<Box<dyn AudioSink>>,
}

impl Wheel {
    pub fn new(config: &WheelConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => SpinEngine::seeded(seed),
            None => SpinEngine::new(),
        };
        let settings = WheelSettings {
            spin_duration_seconds: clamp_positive(config.spin_seconds),
            ..WheelSettings::default()
        };
        Wheel {
            registry: ItemRegistry::new(),
            settings,
            engine,
            color_scheme: config.color_scheme,
            cache: SegmentCache::default(),
            result: None,
            presentation: None,
            audio: None,
        }
    }

    /// Starts with the stock Tacos / Burger / Pizza wheel.
    pub fn with_default_items(config: &WheelConfig) -> Self {
        let mut wheel = Wheel::new(config);
        for name in DEFAULT_ITEMS {
            let color = wheel.random_color();
            wheel.registry.add(ItemDraft::new(name, color));
        }
        wheel
    }

    pub fn set_presentation(&mut self, presentation: Box<dyn Presentation>) {
        self.presentation = Some(presentation);
    }

    pub fn set_audio(&mut self, audio: Option<Box<dyn AudioSink>>) {
        self.audio = audio;
    }

    pub fn items(&self) -> &[Item] {
        self.registry.items()
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &WheelSettings {
        &self.settings
    }

    pub fn rotation(&self) -> f64 {
        self.engine.rotation()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    /// Winner of the last settled spin, until the next spin or reset.
    pub fn result(&self) -> Option<&Winner> {
        self.result.as_ref()
    }

    pub fn theme(&self) -> Theme {
        Theme {
            background: self.settings.app_background.clone(),
            is_light_mode: self.settings.is_light_mode,
        }
    }

    pub fn random_color(&mut self) -> String {
        self.color_scheme.random_color(self.engine.rng_mut())
    }

    pub fn add_item(&mut self, draft: ItemDraft) -> ItemId {
        let id = self.registry.add(draft);
        self.redraw();
        id
    }

    /// Appends `Item N` with a generated color.
    pub fn add_new_item(&mut self) -> ItemId {
        let name = format!("Item {}", self.registry.len() + 1);
        let color = self.random_color();
        self.add_item(ItemDraft::new(name, color))
    }

    pub fn update_field(&mut self, id: &ItemId, field: ItemField) -> bool {
        let updated = self.registry.update(id, field);
        if updated {
            self.redraw();
        }
        updated
    }

    pub fn delete_item(&mut self, id: &ItemId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            self.redraw();
        }
        removed
    }

    pub fn set_shuffled(&mut self, shuffled: bool) {
        self.settings.is_shuffled = shuffled;
        self.redraw();
    }

    pub fn set_spin_duration(&mut self, seconds: f64) {
        self.settings.spin_duration_seconds = clamp_positive(seconds);
    }

    pub fn set_theme(&mut self, background: impl Into<String>, is_light_mode: bool) {
        self.settings.app_background = background.into();
        self.settings.is_light_mode = is_light_mode;
        self.redraw();
    }

    /// Current segment sequence, rebuilt if items or layout changed.
    pub fn segments(&mut self) -> &SegmentSequence {
        self.refresh_segments();
        &self.cache.sequence
    }

    fn refresh_segments(&mut self) {
        let layout = Layout::from_shuffled(self.settings.is_shuffled);
        let revision = self.registry.revision();
        if self.cache.revision != Some(revision) || self.cache.layout != layout {
            self.cache = SegmentCache {
                revision: Some(revision),
                layout,
                sequence: build_segments(self.registry.items(), layout),
            };
        }
    }

    /// Starts a spin. Returns false when already spinning or the wheel is empty.
    pub fn request_spin(&mut self) -> bool {
        self.refresh_segments();
        let started = self
            .engine
            .start(&self.cache.sequence, self.settings.spin_duration_seconds)
            .is_some();
        if started {
            self.result = None;
        }
        started
    }

    /// Advances the active spin to `elapsed_ms` after its start, draws the
    /// frame and forwards tick/win cues. Returns the engine event, if any.
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<SpinEvent> {
        if !self.engine.is_spinning() {
            return None;
        }
        let event = self.engine.advance(elapsed_ms);
        // items may have changed mid-spin; settle against the current list
        self.refresh_segments();
        self.redraw();

        match event {
            Some(SpinEvent::Tick) => self.play(AudioCue::Tick),
            Some(SpinEvent::Settled { rotation }) => {
                let winner = resolve(rotation, &self.cache.sequence);
                match &winner {
                    Some(winner) => {
                        log::info!("spin settled on '{}' ({})", winner.display_name, winner.item_id);
                        self.play(AudioCue::Win);
                    }
                    None => log::info!("spin settled with no winner"),
                }
                self.result = winner;
            }
            None => {}
        }
        event
    }

    /// Forces the wheel idle and clears the shown result. Rotation is kept.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.result = None;
        self.redraw();
    }

    /// Sends the current frame to the presentation adapter, if one is attached.
    pub fn redraw(&mut self) {
        if self.presentation.is_none() {
            return;
        }
        self.refresh_segments();
        let theme = self.theme();
        if let Some(presentation) = self.presentation.as_mut() {
            presentation.draw(&DrawRequest {
                segments: &self.cache.sequence,
                current_rotation: self.engine.rotation(),
                theme: &theme,
            });
        }
    }

    fn play(&mut self, cue: AudioCue) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play(cue);
        }
    }

    pub fn to_record(&self) -> WheelRecord {
        record::serialize(&self.registry, &self.settings)
    }

    /// Replaces items and settings. The rotation is left untouched.
    pub fn apply_record(&mut self, record: WheelRecord) {
        let (registry, settings) = record::from_record(record);
        self.replace(registry, settings);
    }

    fn replace(&mut self, registry: ItemRegistry, settings: WheelSettings) {
        self.registry = registry;
        self.settings = settings;
        self.cache = SegmentCache::default();
        self.redraw();
    }

    pub async fn save<S: KeyValueStore>(&self, store: &S) -> Result<()> {
        store.set(STATE_KEY, record::to_json(&self.to_record())?).await
    }

    /// Loads the stored state. Returns None when nothing was stored.
    pub async fn load<S: KeyValueStore>(&mut self, store: &S) -> Result<Option<LoadStatus>> {
        let Some(raw) = store.get(STATE_KEY).await? else {
            return Ok(None);
        };
        let loaded = record::deserialize(&raw);
        self.replace(loaded.registry, loaded.settings);
        Ok(Some(loaded.status))
    }

    pub async fn save_preset<S: KeyValueStore>(&self, store: &S, name: &str) -> Result<bool> {
        let mut book = read_presets(store).await?;
        if !book.save(name, self.to_record()) {
            return Ok(false);
        }
        store.set(PRESETS_KEY, book.to_json()?).await?;
        log::info!("saved preset '{}'", name.trim());
        Ok(true)
    }

    pub async fn load_preset<S: KeyValueStore>(&mut self, store: &S, name: &str) -> Result<bool> {
        let book = read_presets(store).await?;
        let Some(record) = book.load(name).cloned() else {
            return Ok(false);
        };
        self.apply_record(record);
        log::info!("loaded preset '{}'", name.trim());
        Ok(true)
    }

    pub async fn delete_preset<S: KeyValueStore>(&self, store: &S, name: &str) -> Result<bool> {
        let mut book = read_presets(store).await?;
        if !book.delete(name) {
            return Ok(false);
        }
        store.set(PRESETS_KEY, book.to_json()?).await?;
        log::info!("deleted preset '{}'", name.trim());
        Ok(true)
    }

    pub async fn preset_names<S: KeyValueStore>(&self, store: &S) -> Result<Vec<String>> {
        let book = read_presets(store).await?;
        Ok(book.names().into_iter().map(str::to_string).collect())
    }
}

async fn read_presets<S: KeyValueStore>(store: &S) -> Result<PresetBook> {
    let Some(raw) = store.get(PRESETS_KEY).await? else {
        return Ok(PresetBook::new());
    };
    match PresetBook::from_json(&raw) {
        Ok(book) => Ok(book),
        Err(err) => {
            log::warn!("preset store is unreadable, starting empty: {err:#}");
            Ok(PresetBook::new())
        }
    }
}

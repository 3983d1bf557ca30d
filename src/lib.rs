//! Weighted lottery wheel: items are split into angular segments, the wheel is
//! spun towards a random target with an ease-out curve, and the settled angle
//! is mapped back to the winning item.

pub mod color;
pub mod config;
pub mod driver;
pub mod item;
pub mod logging;
pub mod outcome;
pub mod presets;
pub mod record;
pub mod render;
pub mod segment;
pub mod spin;
pub mod store;
pub mod wheel;

pub use color::ColorScheme;
pub use config::WheelConfig;
pub use item::{Item, ItemDraft, ItemField, ItemId, ItemRegistry};
pub use outcome::{resolve, Winner};
pub use presets::PresetBook;
pub use record::{LoadStatus, WheelRecord, WheelSettings};
pub use render::{AudioCue, AudioSink, DrawRequest, Presentation, Theme, Wedge};
pub use segment::{build_segments, Layout, Segment, SegmentSequence};
pub use spin::{SpinEngine, SpinEvent, SpinSession};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use wheel::Wheel;

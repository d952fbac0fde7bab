pub mod color;
pub mod config;
pub mod params;
pub mod preset;
pub mod resolve;

pub use config::{RuntimeConfig, DEFAULT_FALLBACK_TEXT};
pub use params::{ParameterSet, PartialParameterSet, MAX_LINE_COUNT, MIN_LINE_COUNT};
pub use preset::{
    builtin_presets, MemoryPresetStore, PresetDocument, PresetLibrary, PresetStore,
    CANONICAL_PRESET, CUSTOM_PRESET,
};
pub use resolve::{resolve, RawOverrides};

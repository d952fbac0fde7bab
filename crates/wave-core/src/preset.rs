use std::collections::BTreeMap;
use std::io;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::params::PartialParameterSet;

/// Reserved name that always resolves to an empty preset (the "no preset"
/// identity used by live editing surfaces).
pub const CUSTOM_PRESET: &str = "custom";

/// The builtin preset every unknown name falls back to.
pub const CANONICAL_PRESET: &str = "calm";

/// A named collection of partial parameter sets. Lookup is case-insensitive;
/// keys are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetLibrary {
    presets: BTreeMap<String, PartialParameterSet>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: BTreeMap<String, PartialParameterSet>) -> Self {
        let mut lib = Self::new();
        for (name, preset) in map {
            lib.insert(&name, preset);
        }
        lib
    }

    pub fn insert(&mut self, name: &str, preset: PartialParameterSet) {
        self.presets.insert(name.trim().to_lowercase(), preset);
    }

    pub fn remove(&mut self, name: &str) -> Option<PartialParameterSet> {
        self.presets.remove(&name.trim().to_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&PartialParameterSet> {
        self.presets.get(&name.trim().to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Serialize for PresetLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.presets.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PresetLibrary {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, PartialParameterSet>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// The presets shipped with the system. Builtins are partial: the fields they
/// leave unset fall through to the global defaults during resolution.
pub fn builtin_presets() -> PresetLibrary {
    fn styled(
        speed: f32,
        line_count: i64,
        amplitude: f32,
        y_offset: f32,
        col1: &str,
        col2: &str,
        bg1: &str,
        bg2: &str,
    ) -> PartialParameterSet {
        PartialParameterSet {
            speed: Some(speed),
            line_count: Some(line_count),
            amplitude: Some(amplitude),
            y_offset: Some(y_offset),
            col1: Some(col1.into()),
            col2: Some(col2.into()),
            bg1: Some(bg1.into()),
            bg2: Some(bg2.into()),
            ..Default::default()
        }
    }

    let mut lib = PresetLibrary::new();
    lib.insert(
        "calm",
        styled(1.0, 10, 0.15, 0.15, "#3a80ff", "#ff66e0", "#331600", "#330033"),
    );
    lib.insert(
        "vibrant",
        styled(1.6, 14, 0.22, 0.12, "#00ffc2", "#ff006e", "#001219", "#3a0ca3"),
    );
    lib.insert(
        "nocturne",
        styled(0.9, 12, 0.18, 0.20, "#4cc9f0", "#4361ee", "#0b132b", "#1c2541"),
    );
    lib.insert(
        "sunrise",
        styled(1.2, 11, 0.20, 0.10, "#ff9e00", "#ff4d6d", "#250902", "#3b0d11"),
    );
    lib.insert(
        "mono",
        styled(1.0, 9, 0.16, 0.15, "#aaaaaa", "#ffffff", "#111111", "#222222"),
    );
    lib.insert(CUSTOM_PRESET, PartialParameterSet::default());
    lib
}

/// External persistence surface for user-defined presets. The renderer only
/// reads; writes happen through a management surface outside the core.
pub trait PresetStore {
    fn user_presets(&self) -> PresetLibrary;
    fn set_user_presets(&mut self, presets: PresetLibrary);
    fn default_preset_name(&self) -> String;
    fn set_default_preset_name(&mut self, name: &str);
}

/// In-memory store, used by tests and hosts without a persistence backend.
#[derive(Debug, Clone)]
pub struct MemoryPresetStore {
    presets: PresetLibrary,
    default_name: String,
}

impl Default for MemoryPresetStore {
    fn default() -> Self {
        Self {
            presets: PresetLibrary::new(),
            default_name: CANONICAL_PRESET.into(),
        }
    }
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a user preset, sanitizing the data on the way in.
    pub fn save_preset(&mut self, name: &str, data: PartialParameterSet) {
        self.presets.insert(name, data.sanitized());
    }

    pub fn delete_preset(&mut self, name: &str) -> bool {
        self.presets.remove(name).is_some()
    }
}

impl PresetStore for MemoryPresetStore {
    fn user_presets(&self) -> PresetLibrary {
        self.presets.clone()
    }

    fn set_user_presets(&mut self, presets: PresetLibrary) {
        self.presets = presets;
    }

    fn default_preset_name(&self) -> String {
        self.default_name.clone()
    }

    fn set_default_preset_name(&mut self, name: &str) {
        self.default_name = name.trim().to_lowercase();
    }
}

/// A preset exported as a standalone JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetDocument {
    pub name: String,
    pub data: PartialParameterSet,
}

/// Serialize a preset for download/sharing.
pub fn export_preset(name: &str, data: &PartialParameterSet) -> io::Result<String> {
    let doc = PresetDocument {
        name: name.to_string(),
        data: data.clone(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Parse an exported preset document. The name must be non-empty; the data is
/// sanitized the same way a direct save would be.
pub fn import_preset(json: &str) -> io::Result<PresetDocument> {
    let doc: PresetDocument =
        serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if doc.name.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "preset document has no name",
        ));
    }
    Ok(PresetDocument {
        name: doc.name,
        data: doc.data.sanitized(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let builtin = builtin_presets();
        assert!(builtin.get("Calm").is_some());
        assert!(builtin.get("  VIBRANT ").is_some());
        assert!(builtin.get("missing").is_none());
    }

    #[test]
    fn test_custom_preset_is_empty() {
        let builtin = builtin_presets();
        assert!(builtin.get(CUSTOM_PRESET).map(|p| p.is_empty()).unwrap_or(false));
    }

    #[test]
    fn test_store_overwrites_on_resave() {
        let mut store = MemoryPresetStore::new();
        store.save_preset(
            "Mine",
            PartialParameterSet {
                speed: Some(2.0),
                ..Default::default()
            },
        );
        store.save_preset(
            "mine",
            PartialParameterSet {
                speed: Some(0.7),
                ..Default::default()
            },
        );
        let presets = store.user_presets();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets.get("MINE").and_then(|p| p.speed), Some(0.7));
        assert!(store.delete_preset("mine"));
        assert!(store.user_presets().is_empty());
    }

    #[test]
    fn test_export_import_roundtrip() {
        let data = PartialParameterSet {
            speed: Some(1.3),
            line_count: Some(12),
            col1: Some("#00FFC2".into()),
            ..Default::default()
        };
        let json = export_preset("sea", &data).unwrap();
        let doc = import_preset(&json).unwrap();
        assert_eq!(doc.name, "sea");
        assert_eq!(doc.data.speed, Some(1.3));
        assert_eq!(doc.data.line_count, Some(12));
        // sanitization normalizes colors on import
        assert_eq!(doc.data.col1.as_deref(), Some("#00ffc2"));
    }

    #[test]
    fn test_import_rejects_nameless_document() {
        assert!(import_preset(r#"{"name": " ", "data": {}}"#).is_err());
        assert!(import_preset("not json").is_err());
    }
}

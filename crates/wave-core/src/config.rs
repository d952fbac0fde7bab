use std::io;

use serde::{Deserialize, Serialize};

use crate::params::{ParameterSet, PartialParameterSet};
use crate::preset::{self, PresetLibrary};

/// Message shown by the fallback path when nothing overrides it.
pub const DEFAULT_FALLBACK_TEXT: &str = "Interactive gradient disabled: WebGL unavailable.";

/// Page-injected configuration record. Server-rendered hosts serialize this
/// once at page load so the renderer never needs a network round-trip; it is
/// passed into the component explicitly rather than read from global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Name of the preset used when an instance does not name one.
    #[serde(rename = "default", default = "default_preset_name")]
    pub default_preset: String,
    /// User-defined presets from the external store.
    #[serde(rename = "userPresets", default)]
    pub user_presets: PresetLibrary,
    /// Builtin preset table; when absent the compiled-in table is used.
    #[serde(rename = "builtinPresets", default, skip_serializing_if = "Option::is_none")]
    pub builtin_presets: Option<PresetLibrary>,
    /// Site-wide fallback status message.
    #[serde(rename = "fallbackText", default, skip_serializing_if = "Option::is_none")]
    pub fallback_text: Option<String>,
    /// Overrides onto the global default parameter set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<PartialParameterSet>,
}

fn default_preset_name() -> String {
    preset::CANONICAL_PRESET.to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset_name(),
            user_presets: PresetLibrary::new(),
            builtin_presets: None,
            fallback_text: None,
            defaults: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(json: &str) -> io::Result<Self> {
        serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// The builtin library this page runs against.
    pub fn builtin_library(&self) -> PresetLibrary {
        match &self.builtin_presets {
            Some(lib) if !lib.is_empty() => lib.clone(),
            _ => preset::builtin_presets(),
        }
    }

    /// Global defaults with any injected overrides folded in.
    pub fn global_defaults(&self) -> ParameterSet {
        let mut defaults = ParameterSet::default();
        if let Some(partial) = &self.defaults {
            defaults.apply(partial);
        }
        defaults
    }

    pub fn fallback_text(&self) -> &str {
        self.fallback_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_FALLBACK_TEXT)
    }
}

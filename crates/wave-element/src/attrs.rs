use std::collections::BTreeMap;

use wave_core::resolve::RawOverrides;

/// Attribute names that feed parameter resolution, in canonical form.
pub const OVERRIDE_KEYS: &[&str] = &[
    "speed",
    "linecount",
    "amplitude",
    "thickness",
    "yoffset",
    "linethickness",
    "softnessbase",
    "softnessrange",
    "amplitudefalloff",
    "bokehexponent",
    "bgangle",
    "col1",
    "col2",
    "bg1",
    "bg2",
];

pub const PRESET_ATTR: &str = "preset";
pub const FALLBACK_TEXT_ATTR: &str = "fallback-text";
pub const MIN_HEIGHT_ATTR: &str = "min-height";

/// Elements never collapse to zero height.
pub const DEFAULT_MIN_HEIGHT: &str = "300px";

/// String attributes of one element instance, canonicalized on insert.
///
/// Lookup is lowercase-first; the legacy camelCase and snake_case spellings
/// (`lineCount`, `fallback_text`, ...) collapse to the same key. Setting an
/// empty value removes the attribute: absent, empty, and unparseable all
/// mean "use the preset value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    values: BTreeMap<String, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attrs = Self::new();
        for (name, value) in pairs {
            attrs.set(name, value);
        }
        attrs
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let key = canonical(name);
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value.to_string());
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(&canonical(name));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&canonical(name)).map(String::as_str)
    }

    pub fn preset(&self) -> Option<&str> {
        self.get(PRESET_ATTR)
    }

    pub fn fallback_text(&self) -> Option<&str> {
        self.get(FALLBACK_TEXT_ATTR)
    }

    pub fn min_height(&self) -> &str {
        self.get(MIN_HEIGHT_ATTR).unwrap_or(DEFAULT_MIN_HEIGHT)
    }

    /// The raw override strings handed to parameter resolution.
    pub fn overrides(&self) -> RawOverrides {
        OVERRIDE_KEYS
            .iter()
            .filter_map(|key| {
                self.values
                    .get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }
}

fn canonical(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "fallbacktext" | "fallback_text" => FALLBACK_TEXT_ATTR.to_string(),
        "minheight" | "min_height" => MIN_HEIGHT_ATTR.to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_collapses_to_canonical() {
        let attrs = AttributeMap::from_pairs([
            ("lineCount", "7"),
            ("yOffset", "0.2"),
            ("fallbackText", "off"),
            ("min_height", "200px"),
        ]);
        assert_eq!(attrs.get("linecount"), Some("7"));
        assert_eq!(attrs.get("yoffset"), Some("0.2"));
        assert_eq!(attrs.fallback_text(), Some("off"));
        assert_eq!(attrs.min_height(), "200px");
    }

    #[test]
    fn test_empty_value_means_absent() {
        let mut attrs = AttributeMap::new();
        attrs.set("speed", "1.5");
        attrs.set("speed", "");
        assert_eq!(attrs.get("speed"), None);
        assert!(attrs.overrides().is_empty());
    }

    #[test]
    fn test_overrides_exclude_non_parameter_attributes() {
        let attrs = AttributeMap::from_pairs([
            ("preset", "vibrant"),
            ("speed", "2"),
            ("fallback-text", "sorry"),
            ("min-height", "100px"),
        ]);
        let overrides = attrs.overrides();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("speed").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_min_height_default() {
        assert_eq!(AttributeMap::new().min_height(), DEFAULT_MIN_HEIGHT);
    }
}

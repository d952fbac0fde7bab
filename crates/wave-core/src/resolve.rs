use std::collections::BTreeMap;

use crate::color;
use crate::params::{ParameterSet, PartialParameterSet};
use crate::preset::{PresetLibrary, CANONICAL_PRESET};

/// Raw per-instance attribute overrides, keyed by the canonical lowercase
/// field names (`speed`, `linecount`, `col1`, ...). Values are untrusted
/// strings straight from element attributes.
pub type RawOverrides = BTreeMap<String, String>;

/// Merge defaults, builtin preset, user preset, and per-instance overrides
/// into one fully-populated parameter set. Later tiers win; an override only
/// wins if it parses (finite number, or valid 6-digit hex for colors),
/// otherwise resolution falls through to the tier below. Pure and cheap
/// enough to re-run on every attribute-change notification.
pub fn resolve(
    preset_name: &str,
    user: &PresetLibrary,
    builtin: &PresetLibrary,
    defaults: &ParameterSet,
    overrides: &RawOverrides,
) -> ParameterSet {
    let mut params = defaults.clone();

    let base = builtin
        .get(preset_name)
        .or_else(|| builtin.get(CANONICAL_PRESET));
    if let Some(preset) = base {
        params.apply(preset);
    }
    if let Some(preset) = user.get(preset_name) {
        params.apply(preset);
    }

    params.apply(&overrides_as_partial(overrides));

    // Final clamp regardless of which tier supplied the value.
    params.line_count = ParameterSet::clamp_line_count(params.line_count as i64);
    params
}

/// Parse raw attribute strings into a partial set, dropping anything that
/// does not parse. Unparseable attributes behave exactly like absent ones.
fn overrides_as_partial(overrides: &RawOverrides) -> PartialParameterSet {
    let float = |key: &str| overrides.get(key).and_then(|v| parse_finite(v));
    let hex = |key: &str| {
        overrides
            .get(key)
            .filter(|v| color::is_valid_hex(v))
            .cloned()
    };

    PartialParameterSet {
        speed: float("speed"),
        line_count: overrides.get("linecount").and_then(|v| parse_int(v)),
        amplitude: float("amplitude"),
        thickness: float("thickness"),
        y_offset: float("yoffset"),
        line_thickness: float("linethickness"),
        softness_base: float("softnessbase"),
        softness_range: float("softnessrange"),
        amplitude_falloff: float("amplitudefalloff"),
        bokeh_exponent: float("bokehexponent"),
        background_angle: float("bgangle"),
        col1: hex("col1"),
        col2: hex("col2"),
        bg1: hex("bg1"),
        bg2: hex("bg2"),
    }
}

fn parse_finite(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|n| n.is_finite())
}

/// Integer parse with the leniency of the attribute surface: `"12"` and
/// `"12.7"` both resolve, truncating toward zero.
fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::builtin_presets;

    fn raw(pairs: &[(&str, &str)]) -> RawOverrides {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unknown_preset_falls_back_to_calm() {
        let builtin = builtin_presets();
        let user = PresetLibrary::new();
        let p = resolve(
            "no-such-preset",
            &user,
            &builtin,
            &ParameterSet::default(),
            &RawOverrides::new(),
        );
        assert_eq!(p.line_count, 10);
        assert_eq!(p.wave_color1, "#3a80ff");
    }

    #[test]
    fn test_unparseable_override_falls_through() {
        let builtin = builtin_presets();
        let p = resolve(
            "vibrant",
            &PresetLibrary::new(),
            &builtin,
            &ParameterSet::default(),
            &raw(&[("speed", "abc"), ("col1", "#nothex")]),
        );
        // preset values survive the bad overrides
        assert!((p.speed - 1.6).abs() < 1e-6);
        assert_eq!(p.wave_color1, "#00ffc2");
    }

    #[test]
    fn test_line_count_clamp_from_overrides() {
        let builtin = builtin_presets();
        for (input, expected) in [("999", 32), ("0", 1), ("-5", 1), ("3", 3), ("7.9", 7)] {
            let p = resolve(
                "calm",
                &PresetLibrary::new(),
                &builtin,
                &ParameterSet::default(),
                &raw(&[("linecount", input)]),
            );
            assert_eq!(p.line_count, expected, "input {input:?}");
        }
    }

    #[test]
    fn test_user_preset_overlays_builtin_fieldwise() {
        let builtin = builtin_presets();
        let mut user = PresetLibrary::new();
        user.insert(
            "nocturne",
            PartialParameterSet {
                amplitude: Some(0.4),
                ..Default::default()
            },
        );
        let p = resolve(
            "nocturne",
            &user,
            &builtin,
            &ParameterSet::default(),
            &RawOverrides::new(),
        );
        // user field wins, untouched fields keep the builtin values
        assert!((p.amplitude - 0.4).abs() < 1e-6);
        assert_eq!(p.line_count, 12);
        assert_eq!(p.wave_color1, "#4cc9f0");
    }

    #[test]
    fn test_user_preset_applies_even_without_builtin_match() {
        let builtin = builtin_presets();
        let mut user = PresetLibrary::new();
        user.insert(
            "mine",
            PartialParameterSet {
                line_count: Some(5),
                ..Default::default()
            },
        );
        let p = resolve(
            "mine",
            &user,
            &builtin,
            &ParameterSet::default(),
            &RawOverrides::new(),
        );
        // builtin tier fell back to calm, then the user preset narrowed it
        assert_eq!(p.line_count, 5);
        assert_eq!(p.bg_color1, "#331600");
    }
}

use serde::{Deserialize, Serialize};

use crate::color;

pub const MIN_LINE_COUNT: u32 = 1;
/// Hard cap, also enforced as the loop bound inside the fragment shader.
pub const MAX_LINE_COUNT: u32 = 32;

/// The fully resolved configuration driving one rendered instance.
///
/// Every field always holds a concrete value after resolution; missing or
/// invalid inputs fall through to the preset value and then to these defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Animation speed multiplier. Range: 0.5..3.0
    pub speed: f32,
    /// Number of wave lines, clamped to 1..=32.
    pub line_count: u32,
    /// Peak wave amplitude in UV space. Range: 0.0..0.5
    pub amplitude: f32,
    /// Kept for the preset-store schema; line geometry reads `line_thickness`.
    pub thickness: f32,
    /// Vertical offset of the wave band below center.
    pub y_offset: f32,
    /// Per-line vertical thickness. Range: 0.001..0.01
    pub line_thickness: f32,
    /// Softness added to every line regardless of depth. Range: 0.0..0.1
    pub softness_base: f32,
    /// Extra softness scaled by the per-line bokeh factor. Range: 0.0..0.5
    pub softness_range: f32,
    /// Amplitude lost per unit of line interpolation factor. Range: 0.0..0.2
    pub amplitude_falloff: f32,
    /// Exponent shaping the bokeh curve. Range: 1.0..6.0
    pub bokeh_exponent: f32,
    /// Background gradient axis rotation in degrees. Range: 0..360
    pub background_angle_degrees: f32,
    /// Wave gradient endpoint colors, `#rrggbb`.
    pub wave_color1: String,
    pub wave_color2: String,
    /// Background gradient colors, `#rrggbb`.
    pub bg_color1: String,
    pub bg_color2: String,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            speed: 1.0,
            line_count: 10,
            amplitude: 0.15,
            thickness: 0.003,
            y_offset: 0.15,
            line_thickness: 0.003,
            softness_base: 0.0,
            softness_range: 0.2,
            amplitude_falloff: 0.05,
            bokeh_exponent: 3.0,
            background_angle_degrees: 45.0,
            wave_color1: "#3a80ff".into(),
            wave_color2: "#ff66e0".into(),
            bg_color1: "#331600".into(),
            bg_color2: "#330033".into(),
        }
    }
}

impl ParameterSet {
    /// Clamp a raw line count into the renderable range.
    pub fn clamp_line_count(raw: i64) -> u32 {
        raw.clamp(MIN_LINE_COUNT as i64, MAX_LINE_COUNT as i64) as u32
    }

    /// Overlay a partial preset. Absent fields keep their current value;
    /// non-finite numbers and malformed colors are skipped the same way.
    pub fn apply(&mut self, preset: &PartialParameterSet) {
        fn merge(slot: &mut f32, value: Option<f32>) {
            if let Some(v) = value {
                if v.is_finite() {
                    *slot = v;
                }
            }
        }
        fn merge_color(slot: &mut String, value: Option<&String>) {
            if let Some(hex) = value.and_then(|v| color::normalize_hex(v)) {
                *slot = hex;
            }
        }

        merge(&mut self.speed, preset.speed);
        if let Some(n) = preset.line_count {
            self.line_count = Self::clamp_line_count(n);
        }
        merge(&mut self.amplitude, preset.amplitude);
        merge(&mut self.thickness, preset.thickness);
        merge(&mut self.y_offset, preset.y_offset);
        merge(&mut self.line_thickness, preset.line_thickness);
        merge(&mut self.softness_base, preset.softness_base);
        merge(&mut self.softness_range, preset.softness_range);
        merge(&mut self.amplitude_falloff, preset.amplitude_falloff);
        merge(&mut self.bokeh_exponent, preset.bokeh_exponent);
        merge(&mut self.background_angle_degrees, preset.background_angle);
        merge_color(&mut self.wave_color1, preset.col1.as_ref());
        merge_color(&mut self.wave_color2, preset.col2.as_ref());
        merge_color(&mut self.bg_color1, preset.bg1.as_ref());
        merge_color(&mut self.bg_color2, preset.bg2.as_ref());
    }
}

/// A partial or full parameter set as stored in the preset library.
///
/// Field names match the persisted key-value schema (lowercase), with the
/// legacy camelCase spellings accepted on read. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialParameterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(
        default,
        rename = "linecount",
        alias = "lineCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f32>,
    #[serde(
        default,
        rename = "yoffset",
        alias = "yOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub y_offset: Option<f32>,
    #[serde(
        default,
        rename = "linethickness",
        alias = "lineThickness",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_thickness: Option<f32>,
    #[serde(
        default,
        rename = "softnessbase",
        alias = "softnessBase",
        skip_serializing_if = "Option::is_none"
    )]
    pub softness_base: Option<f32>,
    #[serde(
        default,
        rename = "softnessrange",
        alias = "softnessRange",
        skip_serializing_if = "Option::is_none"
    )]
    pub softness_range: Option<f32>,
    #[serde(
        default,
        rename = "amplitudefalloff",
        alias = "amplitudeFalloff",
        skip_serializing_if = "Option::is_none"
    )]
    pub amplitude_falloff: Option<f32>,
    #[serde(
        default,
        rename = "bokehexponent",
        alias = "bokehExponent",
        skip_serializing_if = "Option::is_none"
    )]
    pub bokeh_exponent: Option<f32>,
    #[serde(
        default,
        rename = "bgangle",
        alias = "bgAngle",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg2: Option<String>,
}

impl PartialParameterSet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sanitize values the way the management surface does before persisting:
    /// floor the strictly-positive fields, clamp the angle, drop bad colors.
    pub fn sanitized(mut self) -> Self {
        if let Some(n) = self.line_count {
            self.line_count = Some(n.max(MIN_LINE_COUNT as i64));
        }
        if let Some(v) = self.thickness {
            self.thickness = Some(v.max(0.0001));
        }
        if let Some(v) = self.line_thickness {
            self.line_thickness = Some(v.max(0.0001));
        }
        if let Some(v) = self.softness_base {
            self.softness_base = Some(v.max(0.0));
        }
        if let Some(v) = self.softness_range {
            self.softness_range = Some(v.max(0.0));
        }
        if let Some(v) = self.amplitude_falloff {
            self.amplitude_falloff = Some(v.max(0.0));
        }
        if let Some(v) = self.bokeh_exponent {
            self.bokeh_exponent = Some(v.max(0.1));
        }
        if let Some(v) = self.background_angle {
            self.background_angle = Some(v.clamp(0.0, 360.0));
        }
        self.col1 = self.col1.as_deref().and_then(color::normalize_hex);
        self.col2 = self.col2.as_deref().and_then(color::normalize_hex);
        self.bg1 = self.bg1.as_deref().and_then(color::normalize_hex);
        self.bg2 = self.bg2.as_deref().and_then(color::normalize_hex);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_values() {
        let d = ParameterSet::default();
        assert_eq!(d.line_count, 10);
        assert_eq!(d.wave_color1, "#3a80ff");
        assert_eq!(d.bg_color1, "#331600");
        assert!((d.background_angle_degrees - 45.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamp_line_count() {
        assert_eq!(ParameterSet::clamp_line_count(999), 32);
        assert_eq!(ParameterSet::clamp_line_count(0), 1);
        assert_eq!(ParameterSet::clamp_line_count(-5), 1);
        assert_eq!(ParameterSet::clamp_line_count(16), 16);
    }

    #[test]
    fn test_apply_skips_invalid_values() {
        let mut p = ParameterSet::default();
        p.apply(&PartialParameterSet {
            speed: Some(f32::NAN),
            col1: Some("nonsense".into()),
            amplitude: Some(0.3),
            ..Default::default()
        });
        assert!((p.speed - 1.0).abs() < f32::EPSILON);
        assert_eq!(p.wave_color1, "#3a80ff");
        assert!((p.amplitude - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_apply_normalizes_color_case() {
        let mut p = ParameterSet::default();
        p.apply(&PartialParameterSet {
            bg1: Some("0B132B".into()),
            ..Default::default()
        });
        assert_eq!(p.bg_color1, "#0b132b");
    }

    #[test]
    fn test_partial_accepts_camel_case_aliases() {
        let p: PartialParameterSet =
            serde_json::from_str(r#"{"lineCount": 7, "yOffset": 0.2, "bgAngle": 90}"#).unwrap();
        assert_eq!(p.line_count, Some(7));
        assert_eq!(p.y_offset, Some(0.2));
        assert_eq!(p.background_angle, Some(90.0));
    }

    #[test]
    fn test_partial_ignores_unknown_keys() {
        let p: PartialParameterSet =
            serde_json::from_str(r#"{"speed": 1.5, "bogus": true}"#).unwrap();
        assert_eq!(p.speed, Some(1.5));
    }

    #[test]
    fn test_sanitized() {
        let p = PartialParameterSet {
            line_count: Some(-3),
            thickness: Some(-1.0),
            bokeh_exponent: Some(0.0),
            background_angle: Some(400.0),
            col1: Some("zzz".into()),
            col2: Some("FF66E0".into()),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(p.line_count, Some(1));
        assert_eq!(p.thickness, Some(0.0001));
        assert_eq!(p.bokeh_exponent, Some(0.1));
        assert_eq!(p.background_angle, Some(360.0));
        assert_eq!(p.col1, None);
        assert_eq!(p.col2.as_deref(), Some("#ff66e0"));
    }
}

// ── Wave gradient shaders ───────────────────────────────────────────
//
// Sources carry no `#version` line; the program compiler prepends the
// header for the target dialect so the same body serves desktop GL and
// WebGL2.

/// Shader dialect the GL context speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderTarget {
    /// Desktop OpenGL 3.3 core.
    Gl330Core,
    /// OpenGL ES 3.0 / WebGL2.
    Es300,
}

impl ShaderTarget {
    pub fn prelude(self) -> &'static str {
        match self {
            ShaderTarget::Gl330Core => "#version 330 core\n",
            ShaderTarget::Es300 => "#version 300 es\nprecision mediump float;\n",
        }
    }
}

/// Prepend the dialect header to a shader body.
pub fn versioned(target: ShaderTarget, body: &str) -> String {
    let mut src = String::with_capacity(target.prelude().len() + body.len());
    src.push_str(target.prelude());
    src.push_str(body);
    src
}

/// Fullscreen-quad passthrough: two triangles covering clip space.
pub const WAVE_VERTEX: &str = r#"
layout(location = 0) in vec2 a_pos;

void main() {
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

/// Composites up to 32 animated wave lines over a rotated two-color
/// background gradient. `uLineCount` is a float so it can be compared
/// against the loop index without casts; the cap is the loop bound.
pub const WAVE_FRAGMENT: &str = r#"
uniform vec2 iResolution;
uniform float iTime;
uniform float uSpeed;
uniform float uLineCount;
uniform float uAmplitude;
uniform float uYOffset;
uniform float uLineThickness;
uniform float uSoftnessBase;
uniform float uSoftnessRange;
uniform float uAmplitudeFalloff;
uniform float uBokehExponent;
uniform float uBgAngle;
uniform vec3 uCol1;
uniform vec3 uCol2;
uniform vec3 uBg1;
uniform vec3 uBg2;

out vec4 frag_color;

const float MAX_LINES = 32.0;

float wave_line(vec2 uv, float speed, float amp, float thickness, float softness, float y_off) {
    // taper the wave toward the left/right screen edges
    float falloff = smoothstep(1.0, 0.5, abs(uv.x));
    float y = falloff * sin(iTime * speed + uv.x * 10.0) * amp - y_off;
    return 1.0 - smoothstep(thickness, thickness + softness, abs(uv.y - y));
}

void main() {
    vec2 base_uv = gl_FragCoord.xy / iResolution.y;

    // Background axis rotated about the center of y-normalized UV space;
    // at 0 degrees the mix runs horizontally along x.
    vec2 pivot = vec2(0.5 * iResolution.x / iResolution.y, 0.5);
    vec2 bg_uv = base_uv - pivot;
    float s = sin(uBgAngle);
    float c = cos(uBgAngle);
    bg_uv = mat2(c, -s, s, c) * bg_uv + pivot;

    vec3 col = mix(uBg1, uBg2, clamp(bg_uv.x, 0.0, 1.0));

    vec2 uv = base_uv - vec2(0.5, 0.5);
    float aa_dy = iResolution.y * 0.000005;
    float denom = max(1.0, uLineCount - 1.0);

    for (float i = 0.0; i < MAX_LINES; i += 1.0) {
        if (i <= uLineCount) {
            float t = i / denom;
            vec3 line_col = mix(uCol1, uCol2, t);
            float bokeh = pow(t, max(0.5, uBokehExponent));
            float thickness = max(0.0001, uLineThickness);
            float softness = aa_dy + uSoftnessBase + bokeh * uSoftnessRange;
            float amp = max(0.0, uAmplitude - uAmplitudeFalloff * t);
            float amt = max(0.0, pow(1.0 - bokeh, 2.0) * 0.9);
            col += wave_line(uv, uSpeed * (1.0 + t), amp, thickness, softness, uYOffset)
                * line_col * amt;
        }
    }

    frag_color = vec4(col, 1.0);
}
"#;

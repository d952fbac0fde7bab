use std::fmt;

use glow::HasContext;

use crate::shaders::{self, ShaderTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Compile or link failure. Carries the compiler log and the offending
/// source so the diagnostic the caller logs is actionable. The program
/// sources are static, so the caller must not retry compilation; this is
/// the "WebGL unusable for this instance" signal.
#[derive(Debug)]
pub enum ShaderError {
    /// Object allocation failed (context lost mid-init, typically).
    Create(String),
    Compile {
        stage: ShaderStage,
        log: String,
        source: String,
    },
    Link {
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Create(detail) => write!(f, "GL object creation failed: {detail}"),
            ShaderError::Compile { stage, log, source } => {
                write!(f, "{stage} shader failed to compile: {log}\n--- source ---\n{source}")
            }
            ShaderError::Link { log } => write!(f, "shader program failed to link: {log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Uniform locations for the wave program. Locations are optional so a
/// driver aggressively pruning uniforms cannot turn an upload into a panic;
/// glow treats a `None` location as a no-op.
pub struct WaveUniforms {
    pub resolution: Option<glow::UniformLocation>,
    pub time: Option<glow::UniformLocation>,
    pub speed: Option<glow::UniformLocation>,
    pub line_count: Option<glow::UniformLocation>,
    pub amplitude: Option<glow::UniformLocation>,
    pub y_offset: Option<glow::UniformLocation>,
    pub line_thickness: Option<glow::UniformLocation>,
    pub softness_base: Option<glow::UniformLocation>,
    pub softness_range: Option<glow::UniformLocation>,
    pub amplitude_falloff: Option<glow::UniformLocation>,
    pub bokeh_exponent: Option<glow::UniformLocation>,
    pub bg_angle: Option<glow::UniformLocation>,
    pub col1: Option<glow::UniformLocation>,
    pub col2: Option<glow::UniformLocation>,
    pub bg1: Option<glow::UniformLocation>,
    pub bg2: Option<glow::UniformLocation>,
}

/// The compiled wave program plus its resolved uniform table.
pub struct WaveProgram {
    pub program: glow::Program,
    pub uniforms: WaveUniforms,
}

impl WaveProgram {
    /// Two-stage build: compile each stage, check status, then link.
    /// Any failure yields a diagnostic and no usable handle.
    pub fn compile(gl: &glow::Context, target: ShaderTarget) -> Result<Self, ShaderError> {
        let vertex_src = shaders::versioned(target, shaders::WAVE_VERTEX);
        let fragment_src = shaders::versioned(target, shaders::WAVE_FRAGMENT);

        unsafe {
            let vert = compile_stage(gl, ShaderStage::Vertex, &vertex_src)?;
            let frag = match compile_stage(gl, ShaderStage::Fragment, &fragment_src) {
                Ok(frag) => frag,
                Err(err) => {
                    gl.delete_shader(vert);
                    return Err(err);
                }
            };

            let program = match gl.create_program() {
                Ok(p) => p,
                Err(detail) => {
                    gl.delete_shader(vert);
                    gl.delete_shader(frag);
                    return Err(ShaderError::Create(detail));
                }
            };
            gl.attach_shader(program, vert);
            gl.attach_shader(program, frag);
            gl.link_program(program);

            let linked = gl.get_program_link_status(program);
            let link_log = gl.get_program_info_log(program);
            gl.detach_shader(program, vert);
            gl.detach_shader(program, frag);
            gl.delete_shader(vert);
            gl.delete_shader(frag);
            if !linked {
                gl.delete_program(program);
                return Err(ShaderError::Link { log: link_log });
            }

            let mut missing: Vec<&str> = Vec::new();
            let mut loc = |name: &'static str| {
                let location = gl.get_uniform_location(program, name);
                if location.is_none() {
                    missing.push(name);
                }
                location
            };
            let uniforms = WaveUniforms {
                resolution: loc("iResolution"),
                time: loc("iTime"),
                speed: loc("uSpeed"),
                line_count: loc("uLineCount"),
                amplitude: loc("uAmplitude"),
                y_offset: loc("uYOffset"),
                line_thickness: loc("uLineThickness"),
                softness_base: loc("uSoftnessBase"),
                softness_range: loc("uSoftnessRange"),
                amplitude_falloff: loc("uAmplitudeFalloff"),
                bokeh_exponent: loc("uBokehExponent"),
                bg_angle: loc("uBgAngle"),
                col1: loc("uCol1"),
                col2: loc("uCol2"),
                bg1: loc("uBg1"),
                bg2: loc("uBg2"),
            };
            if !missing.is_empty() {
                log::warn!("wave shader uniforms pruned by the driver: {}", missing.join(", "));
            }

            Ok(Self { program, uniforms })
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

unsafe fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    let kind = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };
    let shader = gl.create_shader(kind).map_err(ShaderError::Create)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ShaderError::Compile {
            stage,
            log,
            source: source.to_string(),
        });
    }
    Ok(shader)
}

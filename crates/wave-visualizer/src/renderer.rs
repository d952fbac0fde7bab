use std::fmt;

use glow::HasContext;
use wave_core::color::hex_to_rgbf;
use wave_core::ParameterSet;

use crate::program::{ShaderError, WaveProgram};
use crate::quad::FullscreenQuad;
use crate::shaders::ShaderTarget;
use crate::viewport::SurfaceSize;

/// Any failure while building the GPU side of an instance.
#[derive(Debug)]
pub enum RenderError {
    Shader(ShaderError),
    Buffer(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Shader(err) => err.fmt(f),
            RenderError::Buffer(detail) => write!(f, "GL buffer setup failed: {detail}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::Shader(err)
    }
}

/// Owns the wave program and the quad it draws with.
///
/// Parameter uniforms are uploaded only when configuration changes;
/// `draw` touches nothing but time and resolution.
pub struct WaveRenderer {
    program: WaveProgram,
    quad: FullscreenQuad,
}

impl WaveRenderer {
    pub fn new(gl: &glow::Context, target: ShaderTarget) -> Result<Self, RenderError> {
        let program = WaveProgram::compile(gl, target)?;
        let quad = match FullscreenQuad::new(gl) {
            Ok(quad) => quad,
            Err(detail) => {
                program.destroy(gl);
                return Err(RenderError::Buffer(detail));
            }
        };
        Ok(Self { program, quad })
    }

    /// Push the resolved parameter set to the GPU.
    pub fn upload_params(&self, gl: &glow::Context, params: &ParameterSet) {
        let u = &self.program.uniforms;
        let col1 = hex_to_rgbf(&params.wave_color1);
        let col2 = hex_to_rgbf(&params.wave_color2);
        let bg1 = hex_to_rgbf(&params.bg_color1);
        let bg2 = hex_to_rgbf(&params.bg_color2);

        unsafe {
            gl.use_program(Some(self.program.program));
            gl.uniform_1_f32(u.speed.as_ref(), params.speed);
            gl.uniform_1_f32(u.line_count.as_ref(), params.line_count as f32);
            gl.uniform_1_f32(u.amplitude.as_ref(), params.amplitude);
            gl.uniform_1_f32(u.y_offset.as_ref(), params.y_offset);
            gl.uniform_1_f32(u.line_thickness.as_ref(), params.line_thickness);
            gl.uniform_1_f32(u.softness_base.as_ref(), params.softness_base);
            gl.uniform_1_f32(u.softness_range.as_ref(), params.softness_range);
            gl.uniform_1_f32(u.amplitude_falloff.as_ref(), params.amplitude_falloff);
            gl.uniform_1_f32(u.bokeh_exponent.as_ref(), params.bokeh_exponent);
            gl.uniform_1_f32(
                u.bg_angle.as_ref(),
                params.background_angle_degrees.to_radians(),
            );
            gl.uniform_3_f32(u.col1.as_ref(), col1[0], col1[1], col1[2]);
            gl.uniform_3_f32(u.col2.as_ref(), col2[0], col2[1], col2[2]);
            gl.uniform_3_f32(u.bg1.as_ref(), bg1[0], bg1[1], bg1[2]);
            gl.uniform_3_f32(u.bg2.as_ref(), bg2[0], bg2[1], bg2[2]);
        }
    }

    /// One frame: set the per-frame uniforms and issue the draw call.
    pub fn draw(&self, gl: &glow::Context, time_secs: f32, surface: SurfaceSize) {
        if surface.is_empty() {
            return;
        }
        let u = &self.program.uniforms;
        unsafe {
            gl.use_program(Some(self.program.program));
            gl.uniform_2_f32(
                u.resolution.as_ref(),
                surface.width as f32,
                surface.height as f32,
            );
            gl.uniform_1_f32(u.time.as_ref(), time_secs);
            self.quad.draw(gl);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        self.program.destroy(gl);
        self.quad.destroy(gl);
    }
}

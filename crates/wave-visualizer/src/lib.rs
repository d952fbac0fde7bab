pub mod program;
pub mod quad;
pub mod render_loop;
pub mod renderer;
pub mod shaders;
pub mod viewport;

pub use program::{ShaderError, ShaderStage, WaveProgram};
pub use render_loop::RenderLoop;
pub use renderer::{RenderError, WaveRenderer};
pub use shaders::ShaderTarget;
pub use viewport::{backing_size, SurfaceSize, ViewportManager, MAX_DEVICE_PIXEL_RATIO};

use crate::renderer::WaveRenderer;
use crate::viewport::SurfaceSize;

/// Animation clock for one instance. Wall-clock driven: visual speed is
/// independent of refresh rate, not deterministic across refresh rates.
///
/// The host owns frame scheduling (requestAnimationFrame or equivalent) and
/// feeds its monotonic clock in as `now_ms`; `tick` reports whether another
/// frame should be scheduled, which is unconditionally true while running.
#[derive(Debug, Default)]
pub struct RenderLoop {
    start_ms: Option<f64>,
    running: bool,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin animating. Resets the clock so time starts at zero.
    pub fn start(&mut self, now_ms: f64) {
        self.start_ms = Some(now_ms);
        self.running = true;
    }

    /// Stop scheduling. The clock origin is kept so a later `start`
    /// decides explicitly whether to rewind.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds since `start`. Clamped at zero against hosts handing back a
    /// timestamp older than the start mark.
    pub fn elapsed_secs(&self, now_ms: f64) -> f32 {
        match self.start_ms {
            Some(start) => (((now_ms - start) / 1000.0).max(0.0)) as f32,
            None => 0.0,
        }
    }

    /// One animation tick: upload time/resolution and draw. Returns whether
    /// the host should schedule the next frame.
    pub fn tick(
        &self,
        gl: &glow::Context,
        renderer: &WaveRenderer,
        surface: SurfaceSize,
        now_ms: f64,
    ) -> bool {
        if !self.running {
            return false;
        }
        renderer.draw(gl, self.elapsed_secs(now_ms), surface);
        true
    }
}

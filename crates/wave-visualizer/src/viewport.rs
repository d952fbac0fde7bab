use glow::HasContext;

/// Device-pixel-ratio cap; anything denser buys nothing for a gradient and
/// quadruples the fill cost.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// Backing-surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// `floor(clientSize * min(dpr, 2))`, never negative.
pub fn backing_size(client_width: f64, client_height: f64, device_pixel_ratio: f64) -> SurfaceSize {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    };
    let dim = |client: f64| (client.max(0.0) * dpr).floor() as u32;
    SurfaceSize::new(dim(client_width), dim(client_height))
}

/// Keeps the GL viewport in sync with element layout. Only touches GL when
/// the computed size actually changed, so callers can invoke it on every
/// layout notification without thrashing.
#[derive(Debug, Default)]
pub struct ViewportManager {
    current: SurfaceSize,
}

impl ViewportManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> SurfaceSize {
        self.current
    }

    /// Returns the new size when it changed, `None` when the call was a
    /// no-op. The host is responsible for resizing its backing canvas to
    /// the returned size before the next draw.
    pub fn resize(
        &mut self,
        gl: &glow::Context,
        client_width: f64,
        client_height: f64,
        device_pixel_ratio: f64,
    ) -> Option<SurfaceSize> {
        let next = backing_size(client_width, client_height, device_pixel_ratio);
        if next == self.current {
            return None;
        }
        self.current = next;
        unsafe {
            gl.viewport(0, 0, next.width as i32, next.height as i32);
        }
        Some(next)
    }
}

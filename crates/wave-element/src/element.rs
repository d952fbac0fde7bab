use wave_core::params::ParameterSet;
use wave_core::preset::PresetLibrary;
use wave_core::resolve::resolve;
use wave_core::RuntimeConfig;
use wave_visualizer::render_loop::RenderLoop;
use wave_visualizer::renderer::WaveRenderer;
use wave_visualizer::shaders::ShaderTarget;
use wave_visualizer::viewport::{SurfaceSize, ViewportManager};

use crate::attrs::AttributeMap;
use crate::fallback::{fallback_style, FallbackRenderer, FallbackStyle, FallbackTarget, StyleTarget};
use crate::lifecycle::{ContextLifecycle, LifecycleState, RetryPolicy};

/// Facts about the surface hosting one instance.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    /// Editor-like surface where WebGL availability can race page setup;
    /// enables bounded init retries.
    pub editor_surface: bool,
    /// Server markup supplied a fallback wrapper; degraded styling goes to
    /// it instead of the element itself.
    pub wrapper_present: bool,
}

/// What the host should do after an initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Rendering is live; schedule animation frames.
    Live,
    /// Initialization failed; try again after this many milliseconds.
    RetryIn(u64),
    /// Initialization failed for good; the fallback stays.
    Fallback,
}

/// Live GPU state for one instance. Dropped wholesale on loss or disposal
/// so no callback can touch an invalidated handle.
struct RenderContext {
    gl: glow::Context,
    renderer: WaveRenderer,
    animation: RenderLoop,
    viewport: ViewportManager,
}

/// One embeddable visual instance.
///
/// The host wires its own observation (attribute mutation, resize events,
/// context loss, frame scheduling, retry timers) to these methods;
/// configuration changes are pushed in, the component never polls.
pub struct WaveElement {
    config: RuntimeConfig,
    attrs: AttributeMap,
    env: HostEnv,
    builtin: PresetLibrary,
    defaults: ParameterSet,
    params: ParameterSet,
    lifecycle: ContextLifecycle,
    fallback: FallbackRenderer,
    ctx: Option<RenderContext>,
}

impl WaveElement {
    /// Resolve parameters and set up bookkeeping. Never fails: bad config
    /// degrades to defaults, not errors.
    pub fn create(config: RuntimeConfig, attrs: AttributeMap, env: HostEnv) -> Self {
        Self::with_retry_policy(config, attrs, env, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        config: RuntimeConfig,
        attrs: AttributeMap,
        env: HostEnv,
        policy: RetryPolicy,
    ) -> Self {
        let builtin = config.builtin_library();
        let defaults = config.global_defaults();
        let lifecycle = ContextLifecycle::new(env.editor_surface, policy);
        let mut element = Self {
            config,
            attrs,
            env,
            builtin,
            defaults,
            params: ParameterSet::default(),
            lifecycle,
            fallback: FallbackRenderer::new(),
            ctx: None,
        };
        element.params = element.resolve_params();
        element
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_live(&self) -> bool {
        self.ctx.is_some()
    }

    pub fn fallback_active(&self) -> bool {
        self.fallback.is_active()
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.ctx
            .as_ref()
            .map(|ctx| ctx.viewport.size())
            .unwrap_or_default()
    }

    /// Instance fallback text, falling back to the site-wide configuration.
    pub fn fallback_text(&self) -> String {
        self.attrs
            .fallback_text()
            .unwrap_or_else(|| self.config.fallback_text())
            .to_string()
    }

    /// Attempt the full WebGL bring-up: compile + viewport + parameter
    /// upload + initial draw. On failure the diagnostic is logged, the
    /// fallback applied, and the outcome says whether to retry.
    pub fn init_gl(
        &mut self,
        gl: glow::Context,
        target: ShaderTarget,
        client_size: (f64, f64),
        device_pixel_ratio: f64,
        now_ms: f64,
        style: &mut dyn StyleTarget,
    ) -> InitOutcome {
        match WaveRenderer::new(&gl, target) {
            Ok(renderer) => {
                let mut viewport = ViewportManager::new();
                viewport.resize(&gl, client_size.0, client_size.1, device_pixel_ratio);
                renderer.upload_params(&gl, &self.params);

                let mut animation = RenderLoop::new();
                animation.start(now_ms);
                renderer.draw(&gl, 0.0, viewport.size());

                self.ctx = Some(RenderContext {
                    gl,
                    renderer,
                    animation,
                    viewport,
                });
                self.lifecycle.activated();
                self.fallback.clear(style);
                InitOutcome::Live
            }
            Err(err) => {
                log::error!("wave renderer initialization failed: {err}");
                self.degrade(style)
            }
        }
    }

    /// The host could not produce a GL context at all (no WebGL support, or
    /// an editor iframe that is not ready yet).
    pub fn context_unavailable(&mut self, style: &mut dyn StyleTarget) -> InitOutcome {
        log::error!("WebGL context unavailable");
        self.degrade(style)
    }

    /// One animation tick. Returns whether the host should schedule the
    /// next frame; a tick arriving after teardown or loss is a no-op.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        match &self.ctx {
            Some(ctx) => ctx
                .animation
                .tick(&ctx.gl, &ctx.renderer, ctx.viewport.size(), now_ms),
            None => false,
        }
    }

    /// Replace the attribute set (the host observed a mutation), re-resolve,
    /// and push the result wherever it is consumed: parameter uniforms when
    /// live, refreshed fallback styling when degraded.
    pub fn update_attributes(&mut self, attrs: AttributeMap, style: &mut dyn StyleTarget) {
        self.attrs = attrs;
        self.params = self.resolve_params();
        if let Some(ctx) = &self.ctx {
            ctx.renderer.upload_params(&ctx.gl, &self.params);
        }
        if self.fallback.is_active() {
            let refreshed = self.current_fallback_style();
            self.fallback.apply(style, &refreshed);
        }
    }

    /// Element layout changed. Returns the new backing size when it
    /// actually changed so the host can resize its canvas.
    pub fn resize(
        &mut self,
        client_width: f64,
        client_height: f64,
        device_pixel_ratio: f64,
    ) -> Option<SurfaceSize> {
        let ctx = self.ctx.as_mut()?;
        ctx.viewport
            .resize(&ctx.gl, client_width, client_height, device_pixel_ratio)
    }

    /// The backing context was lost. Tears down the render state and shows
    /// the fallback; restoration is event-driven, so nothing is scheduled.
    pub fn notify_context_lost(&mut self, style: &mut dyn StyleTarget) {
        // Handles are already invalid; dropping them without GL calls is
        // the only safe teardown here.
        self.ctx = None;
        self.lifecycle.context_lost();
        let current = self.current_fallback_style();
        self.fallback.apply(style, &current);
    }

    /// The environment restored the context: run the full initialization
    /// sequence again.
    pub fn notify_context_restored(
        &mut self,
        gl: glow::Context,
        target: ShaderTarget,
        client_size: (f64, f64),
        device_pixel_ratio: f64,
        now_ms: f64,
        style: &mut dyn StyleTarget,
    ) -> InitOutcome {
        self.lifecycle.context_restored();
        self.init_gl(gl, target, client_size, device_pixel_ratio, now_ms, style)
    }

    /// Synchronous teardown on element disconnect. After this, every entry
    /// point no-ops; the host must also cancel its frame request and
    /// listeners.
    pub fn dispose(&mut self, style: &mut dyn StyleTarget) {
        if let Some(ctx) = self.ctx.take() {
            ctx.renderer.destroy(&ctx.gl);
        }
        self.fallback.clear(style);
    }

    fn degrade(&mut self, style: &mut dyn StyleTarget) -> InitOutcome {
        let current = self.current_fallback_style();
        self.fallback.apply(style, &current);
        match self.lifecycle.init_failed() {
            Some(delay) => InitOutcome::RetryIn(delay),
            None => InitOutcome::Fallback,
        }
    }

    fn resolve_params(&self) -> ParameterSet {
        let preset_name = self
            .attrs
            .preset()
            .unwrap_or(self.config.default_preset.as_str());
        resolve(
            preset_name,
            &self.config.user_presets,
            &self.builtin,
            &self.defaults,
            &self.attrs.overrides(),
        )
    }

    fn current_fallback_style(&self) -> FallbackStyle {
        let target = if self.env.wrapper_present {
            FallbackTarget::Wrapper
        } else {
            FallbackTarget::Element
        };
        fallback_style(
            &self.params,
            &self.fallback_text(),
            target,
            self.attrs.min_height(),
        )
    }
}

use std::collections::BTreeMap;

use wave_core::ParameterSet;

/// Inline-style surface the fallback writes through. The wasm host backs
/// this with a real `CssStyleDeclaration` plus a status node; tests use a
/// plain map. `clear_message` on a target without a message must be a no-op.
pub trait StyleTarget {
    fn style(&self, prop: &str) -> Option<String>;
    fn set_style(&mut self, prop: &str, value: &str);
    fn remove_style(&mut self, prop: &str);
    /// Show the accessible status message.
    fn set_message(&mut self, text: &str);
    fn clear_message(&mut self);
}

/// Where the fallback styles land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTarget {
    /// The bare custom element; layout properties are included so it holds
    /// its box on its own.
    Element,
    /// A server-rendered wrapper that already carries layout; only the
    /// visual properties are written.
    Wrapper,
}

/// A computed fallback: inline style properties plus the status message.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackStyle {
    pub properties: Vec<(&'static str, String)>,
    pub message: String,
}

/// CSS percent with up to three decimals, trailing zeros stripped.
pub fn percent_value(value: f64) -> String {
    let mut formatted = format!("{:.3}", value);
    formatted.truncate(formatted.trim_end_matches('0').trim_end_matches('.').len());
    if formatted.is_empty() {
        formatted.push('0');
    }
    formatted.push('%');
    formatted
}

/// CSS approximation of the shader output: a diagonal two-stop gradient
/// under a repeating accent-stripe layer in `screen` blend, stripe period
/// `100 / lineCount` percent alternating the two wave colors.
pub fn fallback_style(
    params: &ParameterSet,
    message: &str,
    target: FallbackTarget,
    min_height: &str,
) -> FallbackStyle {
    let base = format!(
        "linear-gradient(135deg, {}, {})",
        params.bg_color1, params.bg_color2
    );
    let period = 100.0 / f64::from(params.line_count.max(1));
    let accent = format!(
        "repeating-linear-gradient(90deg, {col1} 0%, {col1} {half}, {col2} {half}, {col2} {step})",
        col1 = params.wave_color1,
        col2 = params.wave_color2,
        half = percent_value(period / 2.0),
        step = percent_value(period),
    );

    let mut properties: Vec<(&'static str, String)> = Vec::new();
    if target == FallbackTarget::Element {
        properties.push(("position", "relative".into()));
        properties.push(("display", "block".into()));
        properties.push(("width", "100%".into()));
        properties.push(("height", "100%".into()));
        properties.push(("min-height", min_height.into()));
    }
    properties.push(("background", params.bg_color1.clone()));
    properties.push(("background-image", format!("{accent}, {base}")));
    properties.push(("background-blend-mode", "screen".into()));
    properties.push(("border-radius", "inherit".into()));
    properties.push(("overflow", "hidden".into()));

    FallbackStyle {
        properties,
        message: message.to_string(),
    }
}

/// Applies a fallback style and remembers exactly what it overwrote, so a
/// later clear restores the host page styling byte for byte. Survives
/// repeated apply/clear cycles (context lost, restored, lost again).
#[derive(Debug, Default)]
pub struct FallbackRenderer {
    saved: BTreeMap<String, Option<String>>,
    active: bool,
}

impl FallbackRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Write the fallback onto the target. Each property's prior value is
    /// recorded once, on first overwrite; re-applying (e.g. after an
    /// attribute change while degraded) refreshes values without touching
    /// the bookkeeping.
    pub fn apply<T: StyleTarget + ?Sized>(&mut self, target: &mut T, style: &FallbackStyle) {
        for (prop, value) in &style.properties {
            if !self.saved.contains_key(*prop) {
                self.saved.insert((*prop).to_string(), target.style(prop));
            }
            target.set_style(prop, value);
        }
        target.set_message(&style.message);
        self.active = true;
    }

    /// Restore every overwritten property to its pre-fallback value, or
    /// remove it if there was none. Idempotent: clearing twice, or without
    /// a prior apply, leaves styling unchanged.
    pub fn clear<T: StyleTarget + ?Sized>(&mut self, target: &mut T) {
        if !self.active {
            return;
        }
        for (prop, previous) in std::mem::take(&mut self.saved) {
            match previous {
                Some(value) => target.set_style(&prop, &value),
                None => target.remove_style(&prop),
            }
        }
        target.clear_message();
        self.active = false;
    }
}

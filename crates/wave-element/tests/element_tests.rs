use std::collections::BTreeMap;

use wave_core::RuntimeConfig;
use wave_element::attrs::AttributeMap;
use wave_element::element::{HostEnv, InitOutcome, WaveElement};
use wave_element::fallback::StyleTarget;
use wave_element::lifecycle::LifecycleState;

// ── Helpers ──────────────────────────────────────────────────────

#[derive(Default)]
struct DomStub {
    props: BTreeMap<String, String>,
    message: Option<String>,
}

impl StyleTarget for DomStub {
    fn style(&self, prop: &str) -> Option<String> {
        self.props.get(prop).cloned()
    }
    fn set_style(&mut self, prop: &str, value: &str) {
        self.props.insert(prop.to_string(), value.to_string());
    }
    fn remove_style(&mut self, prop: &str) {
        self.props.remove(prop);
    }
    fn set_message(&mut self, text: &str) {
        self.message = Some(text.to_string());
    }
    fn clear_message(&mut self) {
        self.message = None;
    }
}

fn element_with(attrs: &[(&str, &str)], env: HostEnv) -> WaveElement {
    WaveElement::create(RuntimeConfig::default(), AttributeMap::from_pairs(attrs.iter().copied()), env)
}

// ── 1. Creation + resolution ─────────────────────────────────────

#[test]
fn create_resolves_preset_and_overrides() {
    let el = element_with(
        &[("preset", "vibrant"), ("linecount", "3")],
        HostEnv::default(),
    );
    assert_eq!(el.params().line_count, 3);
    assert!((el.params().speed - 1.6).abs() < 1e-6);
    assert_eq!(el.params().wave_color1, "#00ffc2");
    assert_eq!(el.state(), LifecycleState::Uninitialized);
    assert!(!el.is_live());
}

#[test]
fn missing_preset_attribute_uses_config_default() {
    let cfg = RuntimeConfig {
        default_preset: "mono".into(),
        ..Default::default()
    };
    let el = WaveElement::create(cfg, AttributeMap::new(), HostEnv::default());
    assert_eq!(el.params().line_count, 9);
    assert_eq!(el.params().wave_color2, "#ffffff");
}

// ── 2. Degradation without WebGL ─────────────────────────────────

#[test]
fn unavailable_context_in_plain_env_is_final() {
    let mut el = element_with(&[("fallback-text", "shader off")], HostEnv::default());
    let mut dom = DomStub::default();

    assert_eq!(el.context_unavailable(&mut dom), InitOutcome::Fallback);
    assert_eq!(el.state(), LifecycleState::FallbackPermanent);
    assert!(el.fallback_active());
    assert_eq!(dom.message.as_deref(), Some("shader off"));
    assert!(dom.props.get("background-image").is_some());
    assert_eq!(
        dom.props.get("background-blend-mode").map(String::as_str),
        Some("screen")
    );
}

#[test]
fn fallback_message_prefers_attribute_then_config() {
    let cfg = RuntimeConfig {
        fallback_text: Some("site message".into()),
        ..Default::default()
    };
    let mut el = WaveElement::create(cfg, AttributeMap::new(), HostEnv::default());
    let mut dom = DomStub::default();
    el.context_unavailable(&mut dom);
    assert_eq!(dom.message.as_deref(), Some("site message"));

    let mut el = element_with(&[], HostEnv::default());
    let mut dom = DomStub::default();
    el.context_unavailable(&mut dom);
    assert_eq!(
        dom.message.as_deref(),
        Some(wave_core::DEFAULT_FALLBACK_TEXT)
    );
}

#[test]
fn editor_env_schedules_bounded_retries() {
    let mut el = element_with(
        &[],
        HostEnv {
            editor_surface: true,
            wrapper_present: false,
        },
    );
    let mut dom = DomStub::default();

    for _ in 0..3 {
        assert_eq!(el.context_unavailable(&mut dom), InitOutcome::RetryIn(300));
        assert_eq!(el.state(), LifecycleState::Retrying);
    }
    assert_eq!(el.context_unavailable(&mut dom), InitOutcome::RetryIn(800));

    // exhaust the budget; the last attempt flips to permanent fallback
    let mut outcome = InitOutcome::RetryIn(0);
    for _ in 0..40 {
        outcome = el.context_unavailable(&mut dom);
        if outcome == InitOutcome::Fallback {
            break;
        }
    }
    assert_eq!(outcome, InitOutcome::Fallback);
    assert_eq!(el.state(), LifecycleState::FallbackPermanent);
}

// ── 3. Live-attribute updates while degraded ─────────────────────

#[test]
fn attribute_update_refreshes_active_fallback() {
    let mut el = element_with(&[("preset", "calm")], HostEnv::default());
    let mut dom = DomStub::default();
    el.context_unavailable(&mut dom);
    let before = dom.props.get("background").cloned();

    el.update_attributes(
        AttributeMap::from_pairs([("preset", "calm"), ("bg1", "#0a0a0a"), ("fallback-text", "new text")]),
        &mut dom,
    );
    assert_eq!(dom.props.get("background").map(String::as_str), Some("#0a0a0a"));
    assert_ne!(dom.props.get("background").cloned(), before);
    assert_eq!(dom.message.as_deref(), Some("new text"));
}

// ── 4. Teardown ──────────────────────────────────────────────────

#[test]
fn frame_after_teardown_is_a_noop() {
    let mut el = element_with(&[], HostEnv::default());
    assert!(!el.frame(16.7));
    let mut dom = DomStub::default();
    el.context_unavailable(&mut dom);
    assert!(!el.frame(33.3));
    assert!(el.resize(800.0, 600.0, 2.0).is_none());
}

#[test]
fn dispose_restores_host_styling() {
    let mut dom = DomStub::default();
    dom.set_style("background", "teal");

    let mut el = element_with(&[], HostEnv::default());
    el.context_unavailable(&mut dom);
    assert_ne!(dom.props.get("background").map(String::as_str), Some("teal"));

    el.dispose(&mut dom);
    assert_eq!(dom.props.get("background").map(String::as_str), Some("teal"));
    assert_eq!(dom.message, None);
    assert!(!el.fallback_active());

    // disposing again changes nothing
    el.dispose(&mut dom);
    assert_eq!(dom.props.get("background").map(String::as_str), Some("teal"));
}

// ── 5. Wrapper-aware fallback ────────────────────────────────────

#[test]
fn wrapper_env_leaves_layout_untouched() {
    let mut el = element_with(
        &[],
        HostEnv {
            editor_surface: false,
            wrapper_present: true,
        },
    );
    let mut dom = DomStub::default();
    el.context_unavailable(&mut dom);
    assert!(!dom.props.contains_key("position"));
    assert!(!dom.props.contains_key("min-height"));
    assert!(dom.props.contains_key("background-image"));
}

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, HtmlCanvasElement, HtmlElement, MutationObserver,
    MutationObserverInit, ResizeObserver, WebGl2RenderingContext, Window,
};

use wave_core::RuntimeConfig;
use wave_element::attrs::AttributeMap;
use wave_element::element::{HostEnv, InitOutcome, WaveElement};
use wave_element::fallback::StyleTarget;
use wave_visualizer::shaders::ShaderTarget;

/// Tag the integration scans for at startup.
pub const ELEMENT_TAG: &str = "gradient-wave";
/// Global the server-rendered page injects its configuration under.
const CONFIG_GLOBAL: &str = "WAVE_CONFIG";
/// Marker carried by server-rendered fallback wrappers.
const WRAPPER_SELECTOR: &str = "[data-wave-fallback-container]";

const CANVAS_CSS: &str = "position:absolute;inset:0;width:100%;height:100%;display:block";
const MESSAGE_CSS: &str = "position:absolute;left:0.75rem;bottom:0.75rem;\
padding:0.25rem 0.5rem;font-size:0.75rem;color:#fff;\
background:rgba(0,0,0,0.35);border-radius:999px;pointer-events:none;\
letter-spacing:0.02em";

thread_local! {
    static INSTANCES: RefCell<Vec<Rc<RefCell<Instance>>>> = RefCell::new(Vec::new());
}

/// One mounted element: the DOM nodes plus the component driving them.
struct Instance {
    element: HtmlElement,
    canvas: HtmlCanvasElement,
    component: WaveElement,
    styles: DomStyleTarget,
    animating: bool,
}

/// Scan the document and mount every wave element.
pub fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = injected_config(&window);

    let nodes = document.query_selector_all(ELEMENT_TAG)?;
    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else { continue };
        let Ok(element) = node.dyn_into::<HtmlElement>() else { continue };
        if let Err(err) = mount(&window, &document, element, config.clone()) {
            log::error!("failed to mount <{ELEMENT_TAG}>: {err:?}");
        }
    }
    Ok(())
}

/// Tear down every mounted instance, restoring host styling.
pub fn unmount_all() {
    INSTANCES.with(|list| {
        for instance in list.borrow_mut().drain(..) {
            let inst = &mut *instance.borrow_mut();
            let Instance {
                component,
                styles,
                canvas,
                ..
            } = inst;
            component.dispose(styles);
            canvas.remove();
        }
    });
}

fn mount(
    window: &Window,
    document: &Document,
    element: HtmlElement,
    config: RuntimeConfig,
) -> Result<(), JsValue> {
    let attrs = read_attributes(&element);

    // The element is the canvas's positioned box; only fill in what page
    // styling left unset.
    let style = element.style();
    ensure_style(&style, "position", "relative");
    ensure_style(&style, "display", "block");
    ensure_style(&style, "width", "100%");
    ensure_style(&style, "min-height", attrs.min_height());

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.style().set_css_text(CANVAS_CSS);
    element.append_child(&canvas)?;

    let env = HostEnv {
        editor_surface: in_editor_frame(window),
        wrapper_present: element.closest(WRAPPER_SELECTOR)?.is_some(),
    };

    let component = WaveElement::create(config, attrs, env);
    let styles = DomStyleTarget::new(document.clone(), element.clone());
    let instance = Rc::new(RefCell::new(Instance {
        element,
        canvas,
        component,
        styles,
        animating: false,
    }));
    INSTANCES.with(|list| list.borrow_mut().push(instance.clone()));

    attach_resize_listener(window, &instance)?;
    attach_resize_observer(&instance)?;
    attach_attribute_observer(&instance)?;
    attach_context_listeners(&instance)?;

    try_init(&instance);
    Ok(())
}

// ── Configuration ────────────────────────────────────────────────

/// Read the page-injected configuration object, if any. Malformed payloads
/// degrade to the compiled-in defaults rather than aborting the mount.
fn injected_config(window: &Window) -> RuntimeConfig {
    let raw = js_sys::Reflect::get(window.as_ref(), &JsValue::from_str(CONFIG_GLOBAL))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null());
    let json = raw
        .and_then(|v| js_sys::JSON::stringify(&v).ok())
        .and_then(|s| s.as_string());
    match json {
        Some(json) => RuntimeConfig::from_json(&json).unwrap_or_else(|err| {
            log::warn!("ignoring malformed {CONFIG_GLOBAL}: {err}");
            RuntimeConfig::default()
        }),
        None => RuntimeConfig::default(),
    }
}

fn read_attributes(element: &HtmlElement) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    for name in element.get_attribute_names().iter() {
        if let Some(name) = name.as_string() {
            if let Some(value) = element.get_attribute(&name) {
                attrs.set(&name, &value);
            }
        }
    }
    attrs
}

fn ensure_style(style: &CssStyleDeclaration, prop: &str, value: &str) {
    let unset = style
        .get_property_value(prop)
        .map(|v| v.is_empty())
        .unwrap_or(true);
    if unset {
        let _ = style.set_property(prop, value);
    }
}

/// Block-editor previews render inside an iframe where WebGL availability
/// can race page setup; that is the environment where retries pay off.
/// Reflect keeps cross-origin frames (where the getter throws) out of the
/// editor path.
fn in_editor_frame(window: &Window) -> bool {
    js_sys::Reflect::get(window.as_ref(), &JsValue::from_str("frameElement"))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

// ── Initialization + retry ───────────────────────────────────────

fn acquire_gl(canvas: &HtmlCanvasElement) -> Option<glow::Context> {
    let ctx = canvas.get_context("webgl2").ok().flatten()?;
    let webgl: WebGl2RenderingContext = ctx.dyn_into().ok()?;
    Some(glow::Context::from_webgl2_context(webgl))
}

fn try_init(instance: &Rc<RefCell<Instance>>) {
    let outcome = {
        let inst = &mut *instance.borrow_mut();
        let client = (
            inst.element.client_width() as f64,
            inst.element.client_height() as f64,
        );
        let gl = acquire_gl(&inst.canvas);
        let Instance {
            component, styles, ..
        } = inst;
        match gl {
            Some(gl) => component.init_gl(
                gl,
                ShaderTarget::Es300,
                client,
                device_pixel_ratio(),
                now_ms(),
                styles,
            ),
            None => component.context_unavailable(styles),
        }
    };
    handle_outcome(instance, outcome);
}

fn handle_outcome(instance: &Rc<RefCell<Instance>>, outcome: InitOutcome) {
    match outcome {
        InitOutcome::Live => {
            sync_canvas_size(instance);
            start_frame_loop(instance);
        }
        InitOutcome::RetryIn(delay_ms) => schedule_retry(instance, delay_ms),
        InitOutcome::Fallback => {}
    }
}

fn schedule_retry(instance: &Rc<RefCell<Instance>>, delay_ms: u64) {
    let inst_rc = instance.clone();
    let closure = Closure::wrap(Box::new(move || {
        try_init(&inst_rc);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web_sys::window() {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
    }
    closure.forget();
}

// ── Frame scheduling ─────────────────────────────────────────────

fn start_frame_loop(instance: &Rc<RefCell<Instance>>) {
    {
        let mut inst = instance.borrow_mut();
        if inst.animating {
            return;
        }
        inst.animating = true;
    }

    // The closure holds a handle to itself so it can keep rescheduling;
    // when the component stops asking for frames the chain simply ends.
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_inner = holder.clone();
    let inst_rc = instance.clone();
    *holder.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let keep_going = inst_rc.borrow_mut().component.frame(timestamp);
        if keep_going {
            if let Some(window) = web_sys::window() {
                if let Some(cb) = holder_inner.borrow().as_ref() {
                    let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
                }
            }
        } else {
            inst_rc.borrow_mut().animating = false;
        }
    }) as Box<dyn FnMut(f64)>));

    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };
    if let Some(cb) = holder.borrow().as_ref() {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// ── Layout ───────────────────────────────────────────────────────

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn resize_now(instance: &Rc<RefCell<Instance>>) {
    let inst = &mut *instance.borrow_mut();
    let client_w = inst.element.client_width() as f64;
    let client_h = inst.element.client_height() as f64;
    if let Some(size) = inst.component.resize(client_w, client_h, device_pixel_ratio()) {
        inst.canvas.set_width(size.width);
        inst.canvas.set_height(size.height);
    }
}

fn sync_canvas_size(instance: &Rc<RefCell<Instance>>) {
    let inst = instance.borrow();
    let size = inst.component.surface_size();
    if !size.is_empty() {
        inst.canvas.set_width(size.width);
        inst.canvas.set_height(size.height);
    }
}

fn attach_resize_listener(
    window: &Window,
    instance: &Rc<RefCell<Instance>>,
) -> Result<(), JsValue> {
    let inst_rc = instance.clone();
    let closure = Closure::wrap(Box::new(move || {
        resize_now(&inst_rc);
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Editor iframes resize independently of the outer window, so the element
/// itself is observed too.
fn attach_resize_observer(instance: &Rc<RefCell<Instance>>) -> Result<(), JsValue> {
    let inst_rc = instance.clone();
    let closure = Closure::wrap(Box::new(
        move |_entries: js_sys::Array, _observer: ResizeObserver| {
            resize_now(&inst_rc);
        },
    ) as Box<dyn FnMut(js_sys::Array, ResizeObserver)>);
    let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
    observer.observe(&instance.borrow().element);
    closure.forget();
    Ok(())
}

// ── Live attributes ──────────────────────────────────────────────

fn attach_attribute_observer(instance: &Rc<RefCell<Instance>>) -> Result<(), JsValue> {
    let inst_rc = instance.clone();
    let closure = Closure::wrap(Box::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            let inst = &mut *inst_rc.borrow_mut();
            let attrs = read_attributes(&inst.element);
            let Instance {
                component, styles, ..
            } = inst;
            component.update_attributes(attrs, styles);
        },
    ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
    let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    observer.observe_with_options(&instance.borrow().element, &init)?;
    closure.forget();
    Ok(())
}

// ── Context loss + restoration ───────────────────────────────────

fn attach_context_listeners(instance: &Rc<RefCell<Instance>>) -> Result<(), JsValue> {
    let canvas = instance.borrow().canvas.clone();

    let inst_rc = instance.clone();
    let lost = Closure::wrap(Box::new(move |event: web_sys::Event| {
        // Without preventDefault the browser never fires the restored event.
        event.prevent_default();
        let inst = &mut *inst_rc.borrow_mut();
        let Instance {
            component, styles, ..
        } = inst;
        component.notify_context_lost(styles);
    }) as Box<dyn FnMut(web_sys::Event)>);
    canvas.add_event_listener_with_callback("webglcontextlost", lost.as_ref().unchecked_ref())?;
    lost.forget();

    let inst_rc = instance.clone();
    let restored = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        restore_context(&inst_rc);
    }) as Box<dyn FnMut(web_sys::Event)>);
    canvas.add_event_listener_with_callback(
        "webglcontextrestored",
        restored.as_ref().unchecked_ref(),
    )?;
    restored.forget();
    Ok(())
}

fn restore_context(instance: &Rc<RefCell<Instance>>) {
    let outcome = {
        let inst = &mut *instance.borrow_mut();
        let client = (
            inst.element.client_width() as f64,
            inst.element.client_height() as f64,
        );
        let gl = acquire_gl(&inst.canvas);
        let Instance {
            component, styles, ..
        } = inst;
        match gl {
            Some(gl) => component.notify_context_restored(
                gl,
                ShaderTarget::Es300,
                client,
                device_pixel_ratio(),
                now_ms(),
                styles,
            ),
            None => component.context_unavailable(styles),
        }
    };
    handle_outcome(instance, outcome);
}

// ── DOM style surface ────────────────────────────────────────────

/// `StyleTarget` over the element's inline style plus a lazily created
/// status node for the fallback message.
struct DomStyleTarget {
    document: Document,
    element: HtmlElement,
    message_node: Option<HtmlElement>,
}

impl DomStyleTarget {
    fn new(document: Document, element: HtmlElement) -> Self {
        Self {
            document,
            element,
            message_node: None,
        }
    }
}

impl StyleTarget for DomStyleTarget {
    fn style(&self, prop: &str) -> Option<String> {
        let value = self.element.style().get_property_value(prop).ok()?;
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn set_style(&mut self, prop: &str, value: &str) {
        let _ = self.element.style().set_property(prop, value);
    }

    fn remove_style(&mut self, prop: &str) {
        let _ = self.element.style().remove_property(prop);
    }

    fn set_message(&mut self, text: &str) {
        if self.message_node.is_none() {
            let node = self
                .document
                .create_element("span")
                .ok()
                .and_then(|node| node.dyn_into::<HtmlElement>().ok());
            if let Some(node) = node {
                let _ = node.set_attribute("role", "status");
                let _ = node.set_attribute("aria-live", "polite");
                node.style().set_css_text(MESSAGE_CSS);
                if self.element.append_child(&node).is_ok() {
                    self.message_node = Some(node);
                }
            }
        }
        if let Some(node) = &self.message_node {
            node.set_text_content(Some(text));
        }
    }

    fn clear_message(&mut self) {
        if let Some(node) = self.message_node.take() {
            node.remove();
        }
    }
}

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Browser host for the wave-gradient element.
//!
//! Mounts a renderer on every `<gradient-wave>` element in the document and
//! wires the observation the component itself never does: attribute
//! mutations, window resize, context loss/restoration, frame scheduling,
//! and retry timers. The component side stays DOM-free; everything here is
//! plumbing between browser events and its `create`/`update`/`resize`/
//! `frame`/`dispose` surface.

#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
mod bindings {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        crate::host::boot()
    }

    /// Tear down every mounted instance, restoring host styling. For hosts
    /// that replace page content without a navigation.
    #[wasm_bindgen]
    pub fn unmount_all() {
        crate::host::unmount_all();
    }
}

// Non-wasm targets get an empty stub so the workspace still builds and
// tests on the host toolchain.
#[cfg(not(target_arch = "wasm32"))]
pub fn start() {}

use hud_core::tier::FidelityTier;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use web_sys as web;

const HANDLE: &str = "__hud";

/// `window.__hud` snapshot for poking at a running HUD from devtools.
/// Cleared when dropped.
pub struct DebugHandle {
    window: web::Window,
    tier: FidelityTier,
}

impl DebugHandle {
    pub fn attach(window: &web::Window, tier: FidelityTier) -> Self {
        let handle = Self {
            window: window.clone(),
            tier,
        };
        handle.update(0.0, 0);
        log::info!("[debug] window.{} attached", HANDLE);
        handle
    }

    pub fn update(&self, level: f32, publications: u64) {
        let obj = Object::new();
        let set = |k: &str, v: JsValue| {
            let _ = Reflect::set(&obj, &JsValue::from_str(k), &v);
        };
        set("tier", JsValue::from_str(self.tier.as_str()));
        set("level", JsValue::from_f64(level as f64));
        set("publications", JsValue::from_f64(publications as f64));
        let _ = Reflect::set(&self.window, &JsValue::from_str(HANDLE), &obj);
    }
}

impl Drop for DebugHandle {
    fn drop(&mut self) {
        let _ = Reflect::set(&self.window, &JsValue::from_str(HANDLE), &JsValue::UNDEFINED);
    }
}

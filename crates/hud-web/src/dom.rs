use hud_core::error::{HudError, HudResult};
use hud_core::tier::FidelityTier;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

#[inline]
pub fn is_visible(document: &web::Document) -> bool {
    document.visibility_state() == web::VisibilityState::Visible
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> HudResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| HudError::MissingSurface(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| HudError::Js(format!("#{} has an unexpected element type", id)))
}

/// Viewport size in CSS pixels; zero when the window reports nothing usable.
pub fn viewport_size(window: &web::Window) -> (f64, f64) {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// CSS size of the canvas as laid out, plus the current pixel ratio.
pub fn canvas_css_size(window: &web::Window, canvas: &web::HtmlCanvasElement) -> (f64, f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (rect.width(), rect.height(), window.device_pixel_ratio())
}

/// `?hud=reduced` / `?hud=standard` forces a tier for the session.
pub fn tier_from_query(window: &web::Window) -> Option<FidelityTier> {
    let search = window.location().search().ok()?;
    search
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| pair.strip_prefix("hud="))
        .and_then(FidelityTier::parse)
}

#![cfg(target_arch = "wasm32")]
mod canvas;
mod debug;
mod dom;
mod env;
mod hud;
mod overlay;
mod prefs;
mod raf;

pub use hud::{Hud, MountOptions, DEFAULT_CANVAS_ID, DEFAULT_ROOT_ID};

use hud_core::prefs::{HudPreference, HUD_TOGGLE_EVENT};
use hud_core::tier::FidelityTier;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

thread_local! {
    static ACTIVE: RefCell<Option<Hud>> = const { RefCell::new(None) };
    static OPTIONS: RefCell<MountOptions> = RefCell::new(MountOptions::default());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hud-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;

    // the host page flips the HUD with `dispatchEvent(new CustomEvent("hud-toggle", { detail: bool }))`
    raf::Listener::new(&window, HUD_TOGGLE_EVENT, |ev: web::Event| {
        let enabled = ev
            .dyn_ref::<web::CustomEvent>()
            .and_then(|ce| ce.detail().as_bool());
        match enabled {
            Some(enabled) => set_enabled(enabled),
            None => log::warn!("[prefs] {} without a boolean detail", HUD_TOGGLE_EVENT),
        }
    })
    .map_err(|e| anyhow::anyhow!("{:?}", e))?
    .forget();

    let pref = prefs::load();
    log::info!("[prefs] hud {}", if pref.is_enabled() { "enabled" } else { "disabled" });
    if pref.is_enabled() {
        mount_active();
    }
    Ok(())
}

fn mount_active() {
    ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return;
        }
        let options = OPTIONS.with(|o| o.borrow().clone());
        match Hud::mount(&options) {
            Ok(hud) => *slot = Some(hud),
            // no host element on this page
            Err(e) => log::warn!("[hud] not mounted: {}", e),
        }
    });
}

fn unmount_active() {
    // drop outside the borrow
    let hud = ACTIVE.with(|slot| slot.borrow_mut().take());
    drop(hud);
}

/// Persist the preference and mount or unmount accordingly.
#[wasm_bindgen]
pub fn set_enabled(enabled: bool) {
    let pref = HudPreference::from(enabled);
    prefs::store(pref);
    if pref.is_enabled() {
        mount_active();
    } else {
        unmount_active();
    }
}

/// Remount with explicit ids, tier and debug handle. `tier` accepts
/// `"standard"` or `"reduced"`; anything else lets the classifier decide.
#[wasm_bindgen]
pub fn configure(root_id: &str, canvas_id: &str, tier: Option<String>, debug: bool) {
    OPTIONS.with(|o| {
        *o.borrow_mut() = MountOptions {
            root_id: root_id.to_string(),
            canvas_id: canvas_id.to_string(),
            tier: tier.as_deref().and_then(FidelityTier::parse),
            debug,
        }
    });
    unmount_active();
    if prefs::load().is_enabled() {
        mount_active();
    }
}

#[wasm_bindgen]
pub fn unmount() {
    unmount_active();
}

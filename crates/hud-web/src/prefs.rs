use hud_core::prefs::{HudPreference, HUD_PREF_KEY};
use web_sys as web;

fn local_storage() -> Option<web::Storage> {
    web::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn load() -> HudPreference {
    let stored = local_storage().and_then(|s| s.get_item(HUD_PREF_KEY).ok().flatten());
    HudPreference::parse(stored.as_deref())
}

pub fn store(pref: HudPreference) {
    if let Some(s) = local_storage() {
        if let Err(e) = s.set_item(HUD_PREF_KEY, pref.as_str()) {
            log::warn!("[prefs] could not persist {}: {:?}", pref.as_str(), e);
        }
    }
}

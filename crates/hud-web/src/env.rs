//! Navigator-backed capability probe. `navigator.connection` and
//! `navigator.deviceMemory` are non-standard, so they are read reflectively.

use hud_core::error::{HudError, HudResult};
use hud_core::tier::{CapabilityProbe, CONNECTION_KEYS};
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys as web;

pub struct NavigatorProbe {
    navigator: JsValue,
}

impl NavigatorProbe {
    pub fn new(window: &web::Window) -> Self {
        Self {
            navigator: window.navigator().into(),
        }
    }

    fn get(target: &JsValue, key: &'static str) -> HudResult<Option<JsValue>> {
        let v = Reflect::get(target, &JsValue::from_str(key)).map_err(|e| HudError::Probe {
            signal: key,
            reason: format!("{:?}", e),
        })?;
        Ok((!v.is_undefined() && !v.is_null()).then_some(v))
    }

    /// First of the standard and vendor-prefixed connection objects.
    fn connection(&self) -> HudResult<Option<JsValue>> {
        for key in CONNECTION_KEYS {
            if let Some(conn) = Self::get(&self.navigator, key)? {
                return Ok(Some(conn));
            }
        }
        Ok(None)
    }

    fn connection_field(&self, key: &'static str) -> HudResult<Option<JsValue>> {
        match self.connection()? {
            Some(conn) => Self::get(&conn, key),
            None => Ok(None),
        }
    }
}

impl CapabilityProbe for NavigatorProbe {
    fn save_data(&self) -> HudResult<Option<bool>> {
        Ok(self.connection_field("saveData")?.and_then(|v| v.as_bool()))
    }

    fn effective_type(&self) -> HudResult<Option<String>> {
        Ok(self
            .connection_field("effectiveType")?
            .and_then(|v| v.as_string()))
    }

    fn device_memory_gb(&self) -> HudResult<Option<f64>> {
        Ok(Self::get(&self.navigator, "deviceMemory")?.and_then(|v| v.as_f64()))
    }
}

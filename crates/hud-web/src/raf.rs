//! Owned browser callbacks. Each guard cancels or unregisters on `Drop`, so
//! tearing down the HUD is just dropping it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request(window: &web::Window, slot: &FrameSlot, handle: &Cell<Option<i32>>) {
    if let Some(cb) = slot.borrow().as_ref() {
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(e) => log::warn!("[raf] request failed: {:?}", e),
        }
    }
}

/// Self-rescheduling requestAnimationFrame loop. The step returns false to
/// stop rescheduling.
pub struct FrameLoop {
    window: web::Window,
    slot: FrameSlot,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(window: &web::Window, mut step: impl FnMut(f64) -> bool + 'static) -> Self {
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let slot_tick = slot.clone();
        let handle_tick = handle.clone();
        let window_tick = window.clone();
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            handle_tick.set(None);
            if step(ts) {
                request(&window_tick, &slot_tick, &handle_tick);
            }
        }) as Box<dyn FnMut(f64)>));

        request(window, &slot, &handle);
        Self {
            window: window.clone(),
            slot,
            handle,
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // breaks the closure -> slot cycle
        self.slot.borrow_mut().take();
    }
}

/// One-shot frame request that can be re-armed; repeated `request` calls
/// before the frame fires collapse into one callback.
pub struct FrameRequest {
    window: web::Window,
    slot: FrameSlot,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameRequest {
    pub fn new(window: &web::Window, mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let handle = Rc::new(Cell::new(None));
        let handle_cb = handle.clone();
        let closure = Closure::wrap(Box::new(move |ts: f64| {
            handle_cb.set(None);
            on_frame(ts);
        }) as Box<dyn FnMut(f64)>);
        Self {
            window: window.clone(),
            slot: Rc::new(RefCell::new(Some(closure))),
            handle,
        }
    }

    pub fn request(&self) {
        if self.handle.get().is_none() {
            request(&self.window, &self.slot, &self.handle);
        }
    }
}

impl Drop for FrameRequest {
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.slot.borrow_mut().take();
    }
}

/// Event listener removed on drop.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(web::Event)>>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Result<Self, wasm_bindgen::JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }

    /// Keep the listener registered for the lifetime of the page.
    pub fn forget(mut self) {
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref());
        }
    }
}

/// `setInterval` handle cleared on drop.
pub struct Interval {
    window: web::Window,
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(
        window: &web::Window,
        period_ms: i32,
        tick: impl FnMut() + 'static,
    ) -> Result<Self, wasm_bindgen::JsValue> {
        let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            window: window.clone(),
            id,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.id);
    }
}

/// `setTimeout` handle cleared on drop. Clearing a timeout that already
/// fired is a no-op.
pub struct Timeout {
    window: web::Window,
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(
        window: &web::Window,
        delay_ms: i32,
        fire: impl FnMut() + 'static,
    ) -> Result<Self, wasm_bindgen::JsValue> {
        let closure = Closure::wrap(Box::new(fire) as Box<dyn FnMut()>);
        let id = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        Ok(Self {
            window: window.clone(),
            id,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.id);
    }
}

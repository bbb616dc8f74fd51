use crate::canvas::CanvasSurface;
use crate::debug::DebugHandle;
use crate::dom;
use crate::env::NavigatorProbe;
use crate::overlay::OverlayDom;
use crate::raf::{FrameLoop, FrameRequest, Interval, Listener, Timeout};
use hud_core::activity::ActivityGenerator;
use hud_core::canvas::CanvasRenderer;
use hud_core::constants::GLITCH_INTERVAL_MS;
use hud_core::error::HudResult;
use hud_core::glitch::GlitchTimer;
use hud_core::overlay::OverlayMarkup;
use hud_core::pointer::PointerTracker;
use hud_core::random::UniformRandom;
use hud_core::scheduler::{TickOutcome, UpdateScheduler};
use hud_core::tier::{classify, FidelityTier};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub const DEFAULT_ROOT_ID: &str = "hud-root";
pub const DEFAULT_CANVAS_ID: &str = "hud-canvas";

#[derive(Clone, Debug)]
pub struct MountOptions {
    pub root_id: String,
    pub canvas_id: String,
    /// Skips the classifier when set.
    pub tier: Option<FidelityTier>,
    pub debug: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            tier: None,
            debug: false,
        }
    }
}

type Scheduler = UpdateScheduler<ActivityGenerator<UniformRandom>>;

struct CanvasLayer {
    renderer: CanvasRenderer,
    surface: CanvasSurface,
}

impl CanvasLayer {
    fn attach(
        window: &web::Window,
        document: &web::Document,
        canvas_id: &str,
        tier: FidelityTier,
    ) -> HudResult<Self> {
        let canvas: web::HtmlCanvasElement = dom::element_by_id(document, canvas_id)?;
        let mut surface = CanvasSurface::attach(canvas)?;
        let mut renderer = CanvasRenderer::new(tier, &mut UniformRandom::from_entropy());
        let (w, h, dpr) = dom::canvas_css_size(window, surface.canvas());
        renderer.resize(w, h, dpr, &mut surface)?;
        Ok(Self { renderer, surface })
    }

    fn resize(&mut self, window: &web::Window) {
        let (w, h, dpr) = dom::canvas_css_size(window, self.surface.canvas());
        if let Err(e) = self.renderer.resize(w, h, dpr, &mut self.surface) {
            log::debug!("[canvas] resize skipped: {}", e);
        }
    }
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// A mounted HUD. Dropping it cancels every loop, timer and listener and
/// removes the overlay from the page.
pub struct Hud {
    tier: FidelityTier,
    scheduler: Rc<RefCell<Scheduler>>,
    overlay: Rc<RefCell<OverlayDom>>,
    glitch: Rc<RefCell<GlitchTimer<UniformRandom>>>,
    canvas: Option<Rc<RefCell<CanvasLayer>>>,
    loops: Vec<FrameLoop>,
    listeners: Vec<Listener>,
    pointer_frame: Option<Rc<FrameRequest>>,
    glitch_interval: Option<Interval>,
    glitch_off: Rc<RefCell<Option<Timeout>>>,
    debug: Option<Rc<DebugHandle>>,
}

impl Hud {
    pub fn mount(options: &MountOptions) -> anyhow::Result<Self> {
        let (window, document) =
            dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
        let host: web::Element = dom::element_by_id(&document, &options.root_id)?;

        let tier = options
            .tier
            .or_else(|| dom::tier_from_query(&window))
            .unwrap_or_else(|| classify(&NavigatorProbe::new(&window)));
        let profile = tier.profile();

        let scheduler = UpdateScheduler::new(
            tier,
            ActivityGenerator::new(profile.band_count, UniformRandom::from_entropy()),
            instant::now(),
        );
        let level = scheduler.level_reader();
        let published = scheduler.subscribe();
        let pointer = PointerTracker::new();
        let glitch = GlitchTimer::new(UniformRandom::from_entropy());

        let markup = OverlayMarkup::build(tier, &options.canvas_id);
        let mut overlay = OverlayDom::inject(
            &document,
            &host,
            &markup,
            scheduler.subscribe(),
            pointer.subscribe(),
            glitch.subscribe(),
        )?;
        overlay.refresh();

        let scheduler = Rc::new(RefCell::new(scheduler));
        let overlay = Rc::new(RefCell::new(overlay));
        let pointer = Rc::new(RefCell::new(pointer));
        let glitch = Rc::new(RefCell::new(glitch));
        let debug = options
            .debug
            .then(|| Rc::new(DebugHandle::attach(&window, tier)));

        let canvas = match CanvasLayer::attach(&window, &document, &options.canvas_id, tier) {
            Ok(layer) => Some(Rc::new(RefCell::new(layer))),
            Err(e) => {
                log::warn!("[canvas] not started: {}", e);
                None
            }
        };

        let mut hud = Self {
            tier,
            scheduler: scheduler.clone(),
            overlay: overlay.clone(),
            glitch: glitch.clone(),
            canvas: canvas.clone(),
            loops: Vec::with_capacity(2),
            listeners: Vec::with_capacity(2),
            pointer_frame: None,
            glitch_interval: None,
            glitch_off: Rc::new(RefCell::new(None)),
            debug: debug.clone(),
        };

        // state update loop
        {
            let scheduler = scheduler.clone();
            let overlay = overlay.clone();
            let document = document.clone();
            hud.loops.push(FrameLoop::start(&window, move |ts| {
                let outcome = scheduler.borrow_mut().tick(ts, dom::is_visible(&document));
                if outcome == TickOutcome::Published {
                    overlay.borrow_mut().refresh();
                    if let Some(d) = &debug {
                        d.update(published.borrow().level, published.revision());
                    }
                }
                outcome.keep_scheduling()
            }));
        }

        // canvas draw loop and its resize hook
        if let Some(layer) = &canvas {
            let draw = layer.clone();
            let document = document.clone();
            hud.loops.push(FrameLoop::start(&window, move |ts| {
                let mut layer = draw.borrow_mut();
                let CanvasLayer { renderer, surface } = &mut *layer;
                renderer.frame(ts, level.get(), dom::is_visible(&document), surface);
                true
            }));

            let resize = layer.clone();
            let w = window.clone();
            hud.listeners.push(
                Listener::new(&window, "resize", move |_| resize.borrow_mut().resize(&w))
                    .map_err(js_err)?,
            );
        }

        // pointer parallax, published at most once per frame
        let pointer_frame = {
            let pointer = pointer.clone();
            let overlay = overlay.clone();
            Rc::new(FrameRequest::new(&window, move |_| {
                if pointer.borrow_mut().on_frame().is_some() {
                    overlay.borrow_mut().refresh();
                }
            }))
        };
        {
            let frame = pointer_frame.clone();
            let w = window.clone();
            hud.listeners.push(
                Listener::new(&window, "pointermove", move |ev: web::Event| {
                    let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                        return;
                    };
                    let (vw, vh) = dom::viewport_size(&w);
                    let wants_frame = pointer.borrow_mut().on_move(
                        ev.client_x() as f64,
                        ev.client_y() as f64,
                        vw,
                        vh,
                    );
                    if wants_frame {
                        frame.request();
                    }
                })
                .map_err(js_err)?,
            );
        }
        hud.pointer_frame = Some(pointer_frame);

        // glitch flicker
        {
            let slot = hud.glitch_off.clone();
            let w = window.clone();
            hud.glitch_interval = Some(
                Interval::new(&window, GLITCH_INTERVAL_MS as i32, move || {
                    let Some(ms) = glitch.borrow_mut().on_interval() else {
                        return;
                    };
                    overlay.borrow_mut().refresh();
                    let (g, o) = (glitch.clone(), overlay.clone());
                    match Timeout::new(&w, ms as i32, move || {
                        g.borrow_mut().on_timeout();
                        o.borrow_mut().refresh();
                    }) {
                        Ok(t) => *slot.borrow_mut() = Some(t),
                        Err(e) => {
                            log::debug!("[glitch] timeout failed: {:?}", e);
                            glitch.borrow_mut().reset();
                            overlay.borrow_mut().refresh();
                        }
                    }
                })
                .map_err(js_err)?,
            );
        }

        log::info!(
            "[hud] mounted {} tier, canvas {}",
            tier.as_str(),
            if canvas.is_some() { "on" } else { "off" }
        );
        Ok(hud)
    }
}

impl Drop for Hud {
    fn drop(&mut self) {
        self.scheduler.borrow_mut().stop();
        self.loops.clear();
        self.listeners.clear();
        self.pointer_frame.take();
        self.glitch_interval.take();
        self.glitch_off.borrow_mut().take();
        self.glitch.borrow_mut().reset();
        if let Some(layer) = self.canvas.take() {
            let mut layer = layer.borrow_mut();
            let CanvasLayer { renderer, surface } = &mut *layer;
            renderer.teardown(surface);
        }
        self.overlay.borrow_mut().remove();
        self.debug.take();
        log::info!(
            "[hud] unmounted {} tier after {} publications",
            self.tier.as_str(),
            self.scheduler.borrow().publications()
        );
    }
}

use fnv::FnvHashMap;
use hud_core::activity::ActivitySample;
use hud_core::overlay::{core_link_patches, OverlayMarkup, OverlayState, Patch, PatchCache, PatchTarget};
use hud_core::pointer::PointerState;
use hud_core::shared::Subscriber;
use hud_core::tier::FidelityTier;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Injected overlay markup plus the patch pipeline that keeps it in step
/// with the published sample, pointer and glitch flag.
pub struct OverlayDom {
    root: web::Element,
    tier: FidelityTier,
    elements: FnvHashMap<String, web::Element>,
    cache: PatchCache,
    sample: Subscriber<ActivitySample>,
    pointer: Subscriber<PointerState>,
    glitch: Subscriber<bool>,
    seen: [u64; 3],
}

impl OverlayDom {
    pub fn inject(
        document: &web::Document,
        host: &web::Element,
        markup: &OverlayMarkup,
        sample: Subscriber<ActivitySample>,
        pointer: Subscriber<PointerState>,
        glitch: Subscriber<bool>,
    ) -> anyhow::Result<Self> {
        let root = document
            .create_element("div")
            .map_err(|e| anyhow::anyhow!("create overlay root: {:?}", e))?;
        root.set_inner_html(&markup.html);
        host.append_child(&root)
            .map_err(|e| anyhow::anyhow!("attach overlay: {:?}", e))?;
        log::debug!(
            "[overlay] injected {} bytes for {} tier",
            markup.html.len(),
            markup.tier.as_str()
        );
        Ok(Self {
            root,
            tier: markup.tier,
            elements: FnvHashMap::default(),
            cache: PatchCache::new(),
            sample,
            pointer,
            glitch,
            // force the first refresh
            seen: [u64::MAX; 3],
        })
    }

    /// Recompose and patch if any input changed since the last call. Returns
    /// the number of writes that landed.
    pub fn refresh(&mut self) -> usize {
        let changed = [
            self.sample.revision(),
            self.pointer.revision(),
            self.glitch.revision(),
        ];
        if changed == self.seen {
            return 0;
        }
        self.seen = changed;

        let state = OverlayState::compose(
            &self.sample.borrow(),
            self.tier,
            self.pointer.get(),
            self.glitch.get(),
        );
        let mut patches = state.patches();
        patches.extend(core_link_patches(self.tier, &state));
        let mut n = 0;
        for p in self.cache.retain_changed(patches) {
            // failed writes stay unrecorded and are retried on the next refresh
            if self.apply(&p) {
                self.cache.record(p);
                n += 1;
            }
        }
        n
    }

    fn lookup(&mut self, id: &str) -> Option<web::Element> {
        if let Some(el) = self.elements.get(id) {
            return Some(el.clone());
        }
        let selector = format!("#{}", id);
        let el = self.root.query_selector(&selector).ok().flatten()?;
        self.elements.insert(id.to_string(), el.clone());
        Some(el)
    }

    fn apply(&mut self, patch: &Patch) -> bool {
        let Some(el) = self.lookup(&patch.id) else {
            log::debug!("[overlay] no element #{}", patch.id);
            return false;
        };
        let res = match patch.target {
            PatchTarget::Attr(name) => el.set_attribute(name, &patch.value),
            PatchTarget::Style(prop) => {
                let style = if let Some(h) = el.dyn_ref::<web::HtmlElement>() {
                    h.style()
                } else if let Some(s) = el.dyn_ref::<web::SvgElement>() {
                    s.style()
                } else {
                    return false;
                };
                style.set_property(prop, &patch.value)
            }
        };
        match res {
            Ok(()) => true,
            Err(e) => {
                log::debug!("[overlay] patch #{} failed: {:?}", patch.id, e);
                false
            }
        }
    }

    pub fn remove(&mut self) {
        self.elements.clear();
        self.cache.clear();
        self.root.remove();
    }
}

use fnv::FnvHashMap;
use std::borrow::Cow;

pub type ElementId = Cow<'static, str>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchTarget {
    Attr(&'static str),
    /// CSS property or custom property (`--name`).
    Style(&'static str),
}

/// One DOM write.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub id: ElementId,
    pub target: PatchTarget,
    pub value: String,
}

impl Patch {
    pub fn attr(id: impl Into<ElementId>, name: &'static str, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: PatchTarget::Attr(name),
            value: value.into(),
        }
    }

    pub fn style(id: impl Into<ElementId>, prop: &'static str, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: PatchTarget::Style(prop),
            value: value.into(),
        }
    }
}

/// Remembers the last value written per (element, target) so unchanged
/// writes never touch the DOM.
#[derive(Default)]
pub struct PatchCache {
    applied: FnvHashMap<(ElementId, PatchTarget), String>,
}

impl PatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only patches whose value differs from what was applied last.
    /// Nothing is recorded until [`PatchCache::record`] confirms the write.
    pub fn retain_changed(&self, patches: Vec<Patch>) -> Vec<Patch> {
        patches
            .into_iter()
            .filter(|p| {
                self.applied
                    .get(&(p.id.clone(), p.target))
                    .map_or(true, |prev| *prev != p.value)
            })
            .collect()
    }

    /// Mark a patch as written to the DOM.
    pub fn record(&mut self, patch: Patch) {
        self.applied.insert((patch.id, patch.target), patch.value);
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

#[inline]
pub(crate) fn num(v: f32) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 {
        // avoid "-0"
        "0".to_string()
    } else {
        format!("{}", r)
    }
}

#[inline]
pub(crate) fn secs(v: f32) -> String {
    format!("{}s", num(v))
}

#[inline]
pub(crate) fn px(v: f32) -> String {
    format!("{}px", num(v))
}

//! Single-writer handles shared between the independent frame loops.
//!
//! Everything runs on one thread, so plain `Rc<Cell>` / `Rc<RefCell>` are
//! enough. The writer halves are deliberately not `Clone`: each published
//! value has exactly one owner that may change it.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

struct Slot<T> {
    value: T,
    revision: u64,
}

/// Sole writer of a published value.
pub struct Publisher<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

/// Read side of a published value. Cheap to clone.
pub struct Subscriber<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

pub fn published<T>(initial: T) -> (Publisher<T>, Subscriber<T>) {
    let slot = Rc::new(RefCell::new(Slot {
        value: initial,
        revision: 0,
    }));
    (Publisher { slot: slot.clone() }, Subscriber { slot })
}

impl<T> Publisher<T> {
    /// Replace the value and bump the revision.
    pub fn publish(&self, value: T) {
        let mut slot = self.slot.borrow_mut();
        slot.value = value;
        slot.revision += 1;
    }

    /// Mutate in place and bump the revision.
    pub fn publish_with(&self, f: impl FnOnce(&mut T)) {
        let mut slot = self.slot.borrow_mut();
        f(&mut slot.value);
        slot.revision += 1;
    }

    pub fn subscribe(&self) -> Subscriber<T> {
        Subscriber {
            slot: self.slot.clone(),
        }
    }

    pub fn revision(&self) -> u64 {
        self.slot.borrow().revision
    }

    pub fn peek(&self) -> Ref<'_, T> {
        Ref::map(self.slot.borrow(), |s| &s.value)
    }
}

impl<T> Subscriber<T> {
    pub fn revision(&self) -> u64 {
        self.slot.borrow().revision
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        Ref::map(self.slot.borrow(), |s| &s.value)
    }

    /// Returns the value only if it changed since `seen`, updating `seen`.
    pub fn changed_since(&self, seen: &mut u64) -> Option<Ref<'_, T>> {
        let slot = self.slot.borrow();
        if slot.revision == *seen {
            return None;
        }
        *seen = slot.revision;
        Some(Ref::map(slot, |s| &s.value))
    }
}

impl<T: Copy> Subscriber<T> {
    pub fn get(&self) -> T {
        self.slot.borrow().value
    }
}

/// Un-throttled activity level: written every computed tick by the
/// scheduler, read every frame by the canvas loop.
pub struct LevelWriter(Rc<Cell<f32>>);

#[derive(Clone)]
pub struct LevelReader(Rc<Cell<f32>>);

pub fn instant_level(initial: f32) -> (LevelWriter, LevelReader) {
    let cell = Rc::new(Cell::new(initial));
    (LevelWriter(cell.clone()), LevelReader(cell))
}

impl LevelWriter {
    #[inline]
    pub fn set(&self, level: f32) {
        self.0.set(level);
    }

    pub fn reader(&self) -> LevelReader {
        LevelReader(self.0.clone())
    }
}

impl LevelReader {
    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_since_reports_each_revision_once() {
        let (tx, rx) = published(1u32);
        let mut seen = rx.revision();
        assert!(rx.changed_since(&mut seen).is_none());
        tx.publish(2);
        assert_eq!(rx.changed_since(&mut seen).map(|v| *v), Some(2));
        assert!(rx.changed_since(&mut seen).is_none());
    }

    #[test]
    fn instant_level_is_visible_to_reader() {
        let (w, r) = instant_level(0.0);
        w.set(0.42);
        assert_eq!(r.get(), 0.42);
        assert_eq!(w.reader().get(), 0.42);
    }
}

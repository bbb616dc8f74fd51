use crate::shared::{published, Publisher, Subscriber};
use glam::Vec2;

/// Normalised pointer position in `[0, 1]²`; (0.5, 0.5) is the centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::CENTER
    }
}

impl PointerState {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Viewport-relative position; a zero-sized viewport maps to the centre.
    #[inline]
    pub fn from_client(client_x: f64, client_y: f64, viewport_w: f64, viewport_h: f64) -> Self {
        if !(viewport_w > 0.0 && viewport_h > 0.0) || !client_x.is_finite() || !client_y.is_finite()
        {
            return Self::CENTER;
        }
        Self {
            x: (client_x / viewport_w).clamp(0.0, 1.0) as f32,
            y: (client_y / viewport_h).clamp(0.0, 1.0) as f32,
        }
    }

    /// Layer offset in px for a per-axis multiplier.
    #[inline]
    pub fn parallax(self, multiplier: Vec2) -> Vec2 {
        Vec2::new(self.x - 0.5, self.y - 0.5) * multiplier
    }
}

/// Coalesces pointer moves to at most one publication per display frame.
pub struct PointerTracker {
    latest: PointerState,
    pending: bool,
    state: Publisher<PointerState>,
}

impl PointerTracker {
    pub fn new() -> Self {
        let (state, _) = published(PointerState::CENTER);
        Self {
            latest: PointerState::CENTER,
            pending: false,
            state,
        }
    }

    pub fn subscribe(&self) -> Subscriber<PointerState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> PointerState {
        *self.state.peek()
    }

    /// Record a move. Returns true when the caller should request a frame;
    /// further moves before that frame only overwrite the stored position.
    pub fn on_move(&mut self, client_x: f64, client_y: f64, viewport_w: f64, viewport_h: f64) -> bool {
        self.latest = PointerState::from_client(client_x, client_y, viewport_w, viewport_h);
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Publish the latest position if a frame was requested and it moved.
    pub fn on_frame(&mut self) -> Option<PointerState> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        if *self.state.peek() == self.latest {
            return None;
        }
        self.state.publish(self.latest);
        Some(self.latest)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

pub mod activity;
pub mod canvas;
pub mod constants;
pub mod error;
pub mod glitch;
pub mod overlay;
pub mod pointer;
pub mod prefs;
pub mod random;
pub mod scheduler;
pub mod shared;
pub mod tier;

pub use activity::{ActivityGenerator, ActivitySample, ActivitySource, Bands};
pub use canvas::{CanvasRenderer, FrameOutcome, Rgba, Surface2d};
pub use error::{HudError, HudResult};
pub use glitch::GlitchTimer;
pub use overlay::{OverlayMarkup, OverlayState, Patch, PatchCache, PatchTarget};
pub use pointer::{PointerState, PointerTracker};
pub use prefs::HudPreference;
pub use random::{RandomSource, UniformRandom};
pub use scheduler::{TickOutcome, UpdateScheduler};
pub use shared::{LevelReader, Subscriber};
pub use tier::{classify, CapabilityProbe, FidelityTier, TierProfile};

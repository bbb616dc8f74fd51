use thiserror::Error;

/// Failures inside the HUD. None of these ever reach the host page: callers
/// log them and fall back to lower fidelity or a no-op.
#[derive(Debug, Error)]
pub enum HudError {
    #[error("capability probe `{signal}` failed: {reason}")]
    Probe {
        signal: &'static str,
        reason: String,
    },
    #[error("drawing surface `{0}` is not attached")]
    MissingSurface(String),
    #[error("could not acquire a 2d context")]
    Context,
    #[error("invalid surface dimensions {width}x{height}")]
    Dimensions { width: f64, height: f64 },
    #[error("js: {0}")]
    Js(String),
}

pub type HudResult<T> = Result<T, HudError>;

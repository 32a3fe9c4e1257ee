//! Error types for screenpilot.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias for screenpilot operations.
pub type PilotResult<T> = std::result::Result<T, PilotError>;

/// Errors surfaced by the locator and input engine.
///
/// Precondition failures (`BadTemplate`, `InvalidThreshold`) are raised
/// immediately and never retried. `ImageNotFound` is the terminal outcome of
/// an exhausted click search; plain `find`/`exists` calls report not-found
/// through their return value instead. `CaptureUnavailable` is fatal to a
/// single attempt and only becomes terminal when no attempt of a search
/// managed to capture a frame.
#[derive(Debug, Error)]
pub enum PilotError {
    /// The template file could not be decoded into a raster.
    #[error("template '{}' could not be decoded: {source}", path.display())]
    BadTemplate {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Similarity threshold outside the accepted (0, 1] range.
    #[error("similarity threshold {0} is outside (0, 1]")]
    InvalidThreshold(f32),
    /// The display could not be captured (headless session, locked screen).
    #[error("screen capture unavailable: {0}")]
    CaptureUnavailable(String),
    /// A click search exhausted its timeout without locating the template.
    #[error("image '{}' not found on screen after {waited:?}", path.display())]
    ImageNotFound { path: PathBuf, waited: Duration },
    /// The synthetic input device rejected an event.
    #[error("input synthesis failed: {0}")]
    Input(String),
}

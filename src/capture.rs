//! # Screen capture
//!
//! Produces a [`Raster`] snapshot of the current display, optionally
//! cropped to a configured search region. The trait is the seam the locator
//! polls through, so tests can substitute a scripted frame source.

use image::RgbaImage;
use xcap::Monitor;

use crate::error::{PilotError, PilotResult};
use crate::geometry::Rectangle;
use crate::raster::Raster;

/// A source of fresh screen frames.
pub trait ScreenCapturer {
    /// Capture the display, cropped to `region` when one is configured.
    ///
    /// Failure means the display is inaccessible (headless or locked
    /// session); that is fatal to the current search attempt, not to the
    /// process.
    fn capture(&mut self, region: Option<&Rectangle>) -> PilotResult<Raster>;
}

/// Captures the primary monitor through xcap.
#[derive(Debug, Default)]
pub struct PrimaryScreenCapturer;

impl PrimaryScreenCapturer {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenCapturer for PrimaryScreenCapturer {
    fn capture(&mut self, region: Option<&Rectangle>) -> PilotResult<Raster> {
        let monitors =
            Monitor::all().map_err(|e| PilotError::CaptureUnavailable(e.to_string()))?;
        let monitor = monitors
            .first()
            .ok_or_else(|| PilotError::CaptureUnavailable("no monitor present".to_string()))?;
        let captured = monitor
            .capture_image()
            .map_err(|e| PilotError::CaptureUnavailable(e.to_string()))?;

        // Rebuild through from_raw so the frame is owned by our image
        // version regardless of what xcap re-exports.
        let (w, h) = (captured.width(), captured.height());
        let image = RgbaImage::from_raw(w, h, captured.into_raw()).ok_or_else(|| {
            PilotError::CaptureUnavailable("captured buffer size mismatch".to_string())
        })?;
        let frame = Raster::from_rgba(image);

        Ok(match region {
            Some(r) => apply_region(&frame, r),
            None => frame,
        })
    }
}

/// Crop a full frame down to the configured search region.
///
/// The region's `x`/`y` skip that many pixels from the screen origin; a
/// non-positive width or height defaults to the frame's own bounds. The
/// result is always clamped inside the frame.
pub fn apply_region(frame: &Raster, region: &Rectangle) -> Raster {
    let width = if region.width > 0 {
        region.width
    } else {
        frame.width()
    };
    let height = if region.height > 0 {
        region.height
    } else {
        frame.height()
    };
    frame.crop(&Rectangle::new(
        region.x.max(0),
        region.y.max(0),
        width,
        height,
    ))
}

//! # Raster
//!
//! The pixel-buffer currency shared by capture, matching, and debug
//! persistence. Every raster is normalized to RGBA8 on entry (both xcap
//! capture and the template loader produce RGBA) and is immutable once
//! built; resampling and cropping return new rasters.

use std::path::Path;

use image::{GrayImage, RgbaImage, imageops};

use crate::error::{PilotError, PilotResult};
use crate::geometry::Rectangle;

/// Pixel layout of a [`Raster`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel.
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Immutable width x height pixel buffer.
#[derive(Debug, Clone)]
pub struct Raster {
    image: RgbaImage,
    format: PixelFormat,
}

impl Raster {
    /// Wrap a decoded RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image,
            format: PixelFormat::Rgba8,
        }
    }

    /// Load and decode a template image from disk.
    ///
    /// Any file that cannot be decoded is a bad-template precondition
    /// failure, distinct from a search that finds nothing.
    pub fn load(path: &Path) -> PilotResult<Self> {
        let decoded = image::open(path).map_err(|source| PilotError::BadTemplate {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Buffer length in bytes; always width * height * bytes-per-pixel.
    pub fn buffer_len(&self) -> usize {
        self.image.as_raw().len()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Grayscale copy used by the correlation matcher.
    pub fn to_gray(&self) -> GrayImage {
        imageops::grayscale(&self.image)
    }

    /// Nearest-neighbor downsample by an integer factor, producing a new
    /// raster. Dimensions are truncated; callers must guard against a
    /// zero-sized result.
    pub fn downsample(&self, factor: u32) -> Raster {
        let w = self.width() / factor;
        let h = self.height() / factor;
        let resized = imageops::resize(&self.image, w, h, imageops::FilterType::Nearest);
        Raster::from_rgba(resized)
    }

    /// Copy of the sub-rectangle, clamped to the raster bounds.
    pub fn crop(&self, region: &Rectangle) -> Raster {
        let x = (region.x.max(0) as u32).min(self.width().saturating_sub(1));
        let y = (region.y.max(0) as u32).min(self.height().saturating_sub(1));
        let w = region.width.min(self.width() - x);
        let h = region.height.min(self.height() - y);
        let cropped = imageops::crop_imm(&self.image, x, y, w, h).to_image();
        Raster::from_rgba(cropped)
    }

    /// Persist as PNG. Used by the debug recorder only; the caller decides
    /// whether the error is worth surfacing.
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        self.image.save(path)
    }
}

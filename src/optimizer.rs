//! # Search optimizer
//!
//! Two-step search strategy over the template matcher: a downsampled fast
//! pre-pass first, full resolution only as a fallback.
//!
//! Full-resolution exhaustive correlation over a whole screen is expensive.
//! Most real targets survive 2x downsampling, so the fast path dominates
//! the common case at a quarter of the area, trading a little positional
//! precision (the consumer only needs a click point) for throughput. Small
//! or subtle templates that vanish at low resolution still get the exact
//! answer from the fallback.

use crate::config::SearchConfig;
use crate::matcher::{self, MatchResult};
use crate::raster::Raster;

/// Integer divisor applied to both rasters in the fast pre-pass.
pub const DOWNSAMPLE_FACTOR: u32 = 2;

/// Locate the best match of `template` within `source`, trying the fast
/// pre-pass first when the config allows it.
pub fn locate(source: &Raster, template: &Raster, config: &SearchConfig) -> Option<MatchResult> {
    if config.fast_pre_pass {
        if let Some(found) = fast_pass(source, template, config.similarity_threshold) {
            log::debug!(
                "fast pre-pass hit at ({}, {}) score {:.3}",
                found.rect.x,
                found.rect.y,
                found.score
            );
            return Some(found);
        }
    }
    full_pass(source, template, config.similarity_threshold)
}

/// Match at 1/DOWNSAMPLE_FACTOR resolution and rescale the winning
/// rectangle back to source coordinates. Returns `None` when nothing
/// reaches the threshold at low resolution, or when either raster would
/// lose a dimension entirely.
fn fast_pass(source: &Raster, template: &Raster, threshold: f32) -> Option<MatchResult> {
    if template.width() < DOWNSAMPLE_FACTOR
        || template.height() < DOWNSAMPLE_FACTOR
        || source.width() < DOWNSAMPLE_FACTOR
        || source.height() < DOWNSAMPLE_FACTOR
    {
        return None;
    }

    let small_source = source.downsample(DOWNSAMPLE_FACTOR);
    let small_template = template.downsample(DOWNSAMPLE_FACTOR);

    let best = matcher::find_matches(&small_source, &small_template, threshold)
        .into_iter()
        .next()?;

    // Position scales by the factor; the reported size is the template's
    // own full-resolution size, since that is what the caller clicks on.
    let mut rect = best.rect;
    rect.x *= DOWNSAMPLE_FACTOR as i32;
    rect.y *= DOWNSAMPLE_FACTOR as i32;
    rect.width = template.width();
    rect.height = template.height();
    Some(MatchResult {
        rect,
        score: best.score,
    })
}

/// Full-resolution match against the original rasters.
fn full_pass(source: &Raster, template: &Raster, threshold: f32) -> Option<MatchResult> {
    matcher::find_matches(source, template, threshold)
        .into_iter()
        .next()
}

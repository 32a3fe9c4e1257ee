//! # Template matching
//!
//! Similarity search for a template raster inside a source raster using
//! NCC (Normalized Cross-Correlation) from imageproc.
//!
//! Both rasters are converted to grayscale before matching; the correlation
//! runs over every candidate top-left alignment and the whole score map is
//! thresholded, so callers get every candidate at or above the threshold,
//! best first. Identical inputs always produce identical output ordering.

use imageproc::template_matching::{MatchTemplateMethod, match_template_parallel};

use crate::geometry::Rectangle;
use crate::raster::Raster;

/// A candidate alignment of the template within the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Location of the match; always fully contained in the source bounds.
    pub rect: Rectangle,
    /// Normalized similarity in [0, 1].
    pub score: f32,
}

/// Find every alignment of `template` within `source` scoring at or above
/// `threshold`, sorted descending by score. Ties keep scan order (row-major
/// from the top-left).
///
/// A template larger than the source in either dimension yields an empty
/// result, not an error.
pub fn find_matches(source: &Raster, template: &Raster, threshold: f32) -> Vec<MatchResult> {
    let tpl_w = template.width();
    let tpl_h = template.height();

    if tpl_w == 0 || tpl_h == 0 {
        return Vec::new();
    }
    if tpl_w > source.width() || tpl_h > source.height() {
        return Vec::new();
    }

    let source_gray = source.to_gray();
    let template_gray = template.to_gray();

    let scores = match_template_parallel(
        &source_gray,
        &template_gray,
        MatchTemplateMethod::CrossCorrelationNormalized,
    );

    let mut results = Vec::new();
    for (x, y, pixel) in scores.enumerate_pixels() {
        let score = pixel[0];
        // NaN (zero-variance alignments) fails the comparison and drops out.
        if score >= threshold {
            results.push(MatchResult {
                rect: Rectangle::new(x as i32, y as i32, tpl_w, tpl_h),
                score: score.min(1.0),
            });
        }
    }

    // Stable sort: equal scores keep row-major scan order.
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Pseudo-random grayscale pattern; windows at different offsets are
    /// decorrelated, so only the exact alignment scores near 1.0.
    fn hashed(w: u32, h: u32) -> Raster {
        let img = RgbaImage::from_fn(w, h, |x, y| {
            let mut v = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
            v ^= v >> 13;
            v = v.wrapping_mul(0xC2B2_AE3D);
            v ^= v >> 16;
            let v = (v & 0xFF) as u8;
            Rgba([v, v, v, 255])
        });
        Raster::from_rgba(img)
    }

    fn crop(source: &Raster, x: i32, y: i32, w: u32, h: u32) -> Raster {
        source.crop(&Rectangle::new(x, y, w, h))
    }

    #[test]
    fn template_larger_than_source_yields_empty() {
        let source = hashed(10, 10);
        let template = hashed(20, 5);
        assert!(find_matches(&source, &template, 0.5).is_empty());
        let template = hashed(5, 20);
        assert!(find_matches(&source, &template, 0.5).is_empty());
    }

    #[test]
    fn exact_subregion_matches_at_full_score() {
        let source = hashed(64, 48);
        let template = crop(&source, 20, 12, 16, 16);
        let matches = find_matches(&source, &template, 0.92);
        let best = matches.first().expect("exact sub-region must match");
        assert_eq!(best.rect, Rectangle::new(20, 12, 16, 16));
        assert!(best.score > 0.999);
    }

    #[test]
    fn template_equal_to_source_matches_at_origin() {
        let source = hashed(32, 32);
        let template = source.clone();
        let matches = find_matches(&source, &template, 0.92);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rect, Rectangle::new(0, 0, 32, 32));
        assert!(matches[0].score > 0.999);
    }

    #[test]
    fn stricter_threshold_yields_subset() {
        let source = hashed(48, 48);
        let template = crop(&source, 8, 8, 12, 12);
        let loose = find_matches(&source, &template, 0.5);
        let strict = find_matches(&source, &template, 0.9);
        assert!(strict.len() <= loose.len());
        for m in &strict {
            assert!(loose.iter().any(|l| l.rect == m.rect));
        }
    }

    #[test]
    fn results_are_ordered_best_first() {
        let source = hashed(48, 48);
        let template = crop(&source, 8, 8, 12, 12);
        let matches = find_matches(&source, &template, 0.3);
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

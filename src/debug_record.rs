//! # Debug recorder
//!
//! Optional side-channel that persists each search attempt for post-mortem
//! diagnosis: the template, the captured frame, and either the matched
//! rectangle drawn onto the frame or a not-found marker.
//!
//! Strictly diagnostic: recording never affects matching results or control
//! flow, and persistence failures are logged and swallowed, never
//! propagated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::Rgba;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use uuid::Uuid;

use crate::geometry::Rectangle;
use crate::raster::Raster;

/// One search attempt as seen by the recorder.
pub struct DebugTrace<'a> {
    pub timestamp: DateTime<Local>,
    pub attempt_index: u32,
    pub source: &'a Raster,
    pub template: &'a Raster,
    /// `Some` with the matched rectangle, `None` when nothing was found.
    pub outcome: Option<Rectangle>,
}

/// Persists attempt traces into a per-run folder under a configured root.
///
/// A recorder without a root directory is a no-op.
pub struct DebugRecorder {
    root: Option<PathBuf>,
    run_dir: Option<PathBuf>,
}

impl DebugRecorder {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            run_dir: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    /// Open a fresh folder for one locator invocation and persist the
    /// template once. Further attempts of the same invocation reuse the
    /// folder. On any filesystem error the run is silently disabled.
    pub fn begin_run(&mut self, template: &Raster) {
        self.run_dir = None;
        let Some(root) = &self.root else {
            return;
        };

        let run_id = Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}_{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            &run_id[..8]
        );
        let dir = root.join(name);

        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("debug recorder: cannot create {}: {}", dir.display(), e);
            return;
        }
        if let Err(e) = template.save(&dir.join("template.png")) {
            log::warn!("debug recorder: cannot persist template: {}", e);
        }
        self.run_dir = Some(dir);
    }

    /// Persist one attempt. No-op unless a run folder is open.
    pub fn record(&mut self, trace: &DebugTrace<'_>) {
        let Some(dir) = &self.run_dir else {
            return;
        };
        if let Err(e) = persist_attempt(dir, trace) {
            log::warn!("debug recorder: attempt {} not persisted: {}", trace.attempt_index, e);
        }
    }
}

fn persist_attempt(dir: &Path, trace: &DebugTrace<'_>) -> Result<(), String> {
    let prefix = format!("attempt_{:03}", trace.attempt_index);

    trace
        .source
        .save(&dir.join(format!("{prefix}_source.png")))
        .map_err(|e| e.to_string())?;

    match trace.outcome {
        Some(rect) => {
            // Matched rectangle drawn on a copy of the frame; the filename
            // carries the coordinates for traceability.
            let mut overlay = trace.source.as_rgba().clone();
            draw_hollow_rect_mut(
                &mut overlay,
                Rect::at(rect.x, rect.y).of_size(rect.width.max(1), rect.height.max(1)),
                Rgba([255, 0, 0, 255]),
            );
            let name = format!(
                "{prefix}_match_x{}_y{}_{}x{}.png",
                rect.x, rect.y, rect.width, rect.height
            );
            overlay.save(dir.join(name)).map_err(|e| e.to_string())
        }
        None => {
            let marker = format!("image not found at {}\n", trace.timestamp.to_rfc3339());
            std::fs::write(dir.join(format!("{prefix}_not_found.txt")), marker)
                .map_err(|e| e.to_string())
        }
    }
}

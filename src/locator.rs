//! # Locator
//!
//! Orchestrates screen capture and the optimized template search in a
//! bounded polling loop, and hands located positions to the input
//! synthesizer.
//!
//! Each call runs on the caller's thread and blocks for up to the
//! configured timeout. Every iteration captures a fresh frame and matches
//! against it atomically; there is no inter-attempt delay beyond the time
//! capture and matching naturally take, and no cancellation beyond the
//! wall-clock deadline. A timeout of zero performs exactly one
//! capture+match cycle.

use std::path::Path;

use chrono::Local;

use crate::capture::{PrimaryScreenCapturer, ScreenCapturer};
use crate::clock::{Clock, SystemClock};
use crate::config::{self, SearchConfig};
use crate::debug_record::{DebugRecorder, DebugTrace};
use crate::error::{PilotError, PilotResult};
use crate::geometry::Point;
use crate::input::{ActionSpec, EnigoDriver, InputDriver, InputSynthesizer};
use crate::matcher::MatchResult;
use crate::optimizer;
use crate::raster::Raster;

/// Finds template images on screen and acts on them.
///
/// The capturer, clock, and input driver are injectable so the polling
/// loop and the click pipeline can run against scripted doubles in tests;
/// [`Locator::live`] wires up the production set.
pub struct Locator<C = PrimaryScreenCapturer, K = SystemClock, D = EnigoDriver> {
    capturer: C,
    clock: K,
    input: InputSynthesizer<D>,
    recorder: DebugRecorder,
}

impl Locator {
    /// Production locator: primary monitor, system clock, enigo input, and
    /// the session-configured debug recorder.
    pub fn live() -> PilotResult<Self> {
        let session = config::session_config();
        Ok(Self::new(
            PrimaryScreenCapturer::new(),
            SystemClock,
            InputSynthesizer::new(EnigoDriver::new()?),
            DebugRecorder::new(session.debug_output_path),
        ))
    }
}

impl<C: ScreenCapturer, K: Clock, D: InputDriver> Locator<C, K, D> {
    pub fn new(
        capturer: C,
        clock: K,
        input: InputSynthesizer<D>,
        recorder: DebugRecorder,
    ) -> Self {
        Self {
            capturer,
            clock,
            input,
            recorder,
        }
    }

    /// Locate the template and return the match's top-left screen point,
    /// or `None` once the timeout is exhausted.
    pub fn find(
        &mut self,
        template_path: &Path,
        config: &SearchConfig,
    ) -> PilotResult<Option<Point>> {
        let template = Raster::load(template_path)?;
        Ok(self.search(&template, config)?.map(|m| m.rect.top_left()))
    }

    /// Like [`Locator::find`] but returns the center of the match.
    pub fn find_center(
        &mut self,
        template_path: &Path,
        config: &SearchConfig,
    ) -> PilotResult<Option<Point>> {
        let template = Raster::load(template_path)?;
        Ok(self.search(&template, config)?.map(|m| m.rect.center()))
    }

    /// Whether the template is currently visible anywhere on screen.
    pub fn exists(&mut self, template_path: &Path, config: &SearchConfig) -> PilotResult<bool> {
        Ok(self.find(template_path, config)?.is_some())
    }

    /// Locate the template and execute `action` at the found position.
    ///
    /// A click with no target is a caller error, so an exhausted search
    /// surfaces [`PilotError::ImageNotFound`] instead of a quiet `None`.
    pub fn click_image(
        &mut self,
        template_path: &Path,
        action: &ActionSpec,
        config: &SearchConfig,
    ) -> PilotResult<()> {
        let template = Raster::load(template_path)?;
        let found =
            self.search(&template, config)?
                .ok_or_else(|| PilotError::ImageNotFound {
                    path: template_path.to_path_buf(),
                    waited: config.wait_timeout(),
                })?;

        let mut spec = *action;
        if spec.click_offset.is_none() {
            // Unspecified offset means the template's own center.
            spec.click_offset = Some(Point::new(
                (template.width() / 2) as i32,
                (template.height() / 2) as i32,
            ));
        }
        self.input.click(found.rect.top_left(), &spec)
    }

    /// Inject text through the synthetic keyboard.
    pub fn type_text(&mut self, text: &str) -> PilotResult<()> {
        self.input.type_text(text)
    }

    /// The bounded polling loop: capture a fresh frame, search it, repeat
    /// until found or the deadline passes. A failed capture counts as a
    /// failed attempt and the loop keeps going; the capture error only
    /// becomes terminal when no attempt produced a frame at all.
    fn search(
        &mut self,
        template: &Raster,
        config: &SearchConfig,
    ) -> PilotResult<Option<MatchResult>> {
        config.validate()?;
        self.recorder.begin_run(template);

        let deadline = self.clock.now() + config.wait_timeout();
        let mut attempt = 0u32;
        let mut captured_any = false;
        let mut last_capture_error = None;

        loop {
            match self.capturer.capture(config.capture_region.as_ref()) {
                Ok(frame) => {
                    captured_any = true;
                    let found = optimizer::locate(&frame, template, config);
                    self.recorder.record(&DebugTrace {
                        timestamp: Local::now(),
                        attempt_index: attempt,
                        source: &frame,
                        template,
                        outcome: found.map(|m| m.rect),
                    });
                    if let Some(found) = found {
                        log::info!(
                            "template found at ({}, {}) score {:.3} on attempt {}",
                            found.rect.x,
                            found.rect.y,
                            found.score,
                            attempt
                        );
                        return Ok(Some(correct_region_offset(found, config.region_offset)));
                    }
                }
                Err(e) => {
                    log::warn!("capture failed on attempt {}: {}", attempt, e);
                    last_capture_error = Some(e);
                }
            }

            attempt += 1;
            if self.clock.now() >= deadline {
                break;
            }
        }

        if !captured_any {
            if let Some(e) = last_capture_error {
                return Err(e);
            }
        }
        log::info!("template not found after {} attempts", attempt);
        Ok(None)
    }
}

/// Translate a cropped-region match back to full-screen coordinates.
///
/// A component is added only when strictly positive; zero and negative
/// offsets are ignored, matching the long-standing reported-coordinate
/// behavior.
fn correct_region_offset(mut found: MatchResult, offset: Option<Point>) -> MatchResult {
    if let Some(offset) = offset {
        if offset.x > 0 {
            found.rect.x += offset.x;
        }
        if offset.y > 0 {
            found.rect.y += offset.y;
        }
    }
    found
}
